// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as threshold ranges, URL schemes, and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::AdpilotConfig;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &AdpilotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // The threshold is a percentage; 0 would auto-apply everything.
    if config.engine.confidence_threshold == 0 || config.engine.confidence_threshold > 100 {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.confidence_threshold must be between 1 and 100, got {}",
                config.engine.confidence_threshold
            ),
        });
    }

    if config.engine.history_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.history_limit must be at least 1".to_string(),
        });
    }

    if !VALID_LOG_LEVELS.contains(&config.engine.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.log_level must be one of {}, got `{}`",
                VALID_LOG_LEVELS.join(", "),
                config.engine.log_level
            ),
        });
    }

    let base_url = config.googleads.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "googleads.base_url must not be empty".to_string(),
        });
    } else if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("googleads.base_url `{base_url}` must start with http:// or https://"),
        });
    }

    let redirect_uri = config.googleads.redirect_uri.trim();
    if !redirect_uri.starts_with("http://") && !redirect_uri.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!(
                "googleads.redirect_uri `{redirect_uri}` must start with http:// or https://"
            ),
        });
    }

    if config.googleads.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "googleads.timeout_secs must be at least 1".to_string(),
        });
    }

    if let Some(token) = &config.googleads.developer_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "googleads.developer_token must not be blank when set".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = AdpilotConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_confidence_threshold_fails_validation() {
        let mut config = AdpilotConfig::default();
        config.engine.confidence_threshold = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("confidence_threshold"))
        ));
    }

    #[test]
    fn threshold_above_hundred_fails_validation() {
        let mut config = AdpilotConfig::default();
        config.engine.confidence_threshold = 150;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("between 1 and 100"))
        ));
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = AdpilotConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn bad_base_url_scheme_fails_validation() {
        let mut config = AdpilotConfig::default();
        config.googleads.base_url = "ftp://ads.example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("base_url"))));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = AdpilotConfig::default();
        config.engine.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))));
    }

    #[test]
    fn blank_developer_token_fails_validation() {
        let mut config = AdpilotConfig::default();
        config.googleads.developer_token = Some("   ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("developer_token"))));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = AdpilotConfig::default();
        config.engine.confidence_threshold = 100;
        config.engine.revert_compensates = true;
        config.googleads.base_url = "https://ads.example.com/v1".to_string();
        config.googleads.developer_token = Some("dev-token-123".to_string());
        config.storage.database_path = "/tmp/adpilot-test.db".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn partial_engine_section_fills_defaults() {
        let toml_str = r#"
[engine]
confidence_threshold = 80
"#;
        let config: AdpilotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.confidence_threshold, 80);
        assert!(!config.engine.revert_compensates);
        assert_eq!(config.engine.history_limit, 50);
        assert_eq!(config.engine.log_level, "info");
    }

    #[test]
    fn engine_deny_unknown_fields() {
        let toml_str = r#"
[engine]
confidense_threshold = 80
"#;
        let result = toml::from_str::<AdpilotConfig>(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn googleads_section_deserializes() {
        let toml_str = r#"
[googleads]
base_url = "https://ads.example.com/v1"
client_id = "client-123.apps.googleusercontent.com"
developer_token = "dev-token-123"
"#;
        let config: AdpilotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.googleads.base_url, "https://ads.example.com/v1");
        assert_eq!(
            config.googleads.client_id.as_deref(),
            Some("client-123.apps.googleusercontent.com")
        );
        // Unspecified keys keep their compiled defaults.
        assert_eq!(config.googleads.timeout_secs, 30);
        assert_eq!(config.googleads.scope, "https://www.googleapis.com/auth/adwords");
    }
}
