// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confidence gate for auto-apply decisions.

use adpilot_config::model::EngineConfig;
use adpilot_core::AdpilotError;

/// Decides whether a recommendation's confidence clears the auto-apply bar.
///
/// The threshold comes from configuration alone; callers cannot vary it per
/// call. Every mutation path runs through [`check`](Self::check) before any
/// network traffic.
#[derive(Debug, Clone, Copy)]
pub struct ConfidencePolicy {
    threshold: u8,
}

impl ConfidencePolicy {
    /// Create a policy with the given threshold in percent.
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.confidence_threshold)
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Check a confidence score against the threshold.
    ///
    /// Scores above 100 are malformed input, not low confidence, and fail
    /// with `Internal` instead of the gate message.
    pub fn check(&self, confidence: u8) -> Result<(), AdpilotError> {
        if confidence > 100 {
            return Err(AdpilotError::Internal(format!(
                "confidence {confidence}% is outside the 0-100 range"
            )));
        }
        if confidence < self.threshold {
            return Err(AdpilotError::ConfidenceTooLow {
                confidence,
                required: self.threshold,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn full_confidence_passes_the_default_gate() {
        let gate = ConfidencePolicy::new(100);
        assert!(gate.check(100).is_ok());
    }

    #[test]
    fn rejection_message_names_both_percentages() {
        let gate = ConfidencePolicy::new(100);
        let err = gate.check(87).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot apply change: Confidence is 87%, must be 100% to auto-apply changes."
        );
    }

    #[test]
    fn custom_threshold_moves_the_bar() {
        let gate = ConfidencePolicy::new(90);
        assert!(gate.check(90).is_ok());
        assert!(gate.check(95).is_ok());
        let err = gate.check(89).unwrap_err();
        assert!(matches!(
            err,
            AdpilotError::ConfidenceTooLow {
                confidence: 89,
                required: 90
            }
        ));
    }

    #[test]
    fn scores_above_one_hundred_are_malformed() {
        let gate = ConfidencePolicy::new(100);
        let err = gate.check(101).unwrap_err();
        assert!(matches!(err, AdpilotError::Internal(_)));
        assert!(!err.to_string().contains("Cannot apply change"));
    }

    proptest! {
        #[test]
        fn every_score_below_the_threshold_is_rejected_with_its_value(confidence in 0u8..100) {
            let gate = ConfidencePolicy::new(100);
            let err = gate.check(confidence).unwrap_err();
            let needle = format!("Confidence is {confidence}%");
            prop_assert!(err.to_string().contains(&needle));
        }
    }
}
