// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adpilot -- AI copilot for Google Ads campaign optimization.
//!
//! Binary entry point. Every command loads configuration, wires the engine
//! services over SQLite and the Google Ads gateway, runs one operation, and
//! prints either human-readable text or a JSON envelope (`--json`).

mod accounts;
mod apply;
mod connect;
mod history;
mod output;
mod status;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use adpilot_config::AdpilotConfig;
use adpilot_core::{AdpilotError, AdsGateway, NotificationSink};
use adpilot_engine::AdsEngine;
use adpilot_googleads::GoogleAdsClient;
use adpilot_store::Database;

use crate::output::TerminalNotifier;

/// Adpilot -- AI copilot for Google Ads campaign optimization.
#[derive(Parser, Debug)]
#[command(name = "adpilot", version, about, long_about = None)]
struct Cli {
    /// Print results as a JSON envelope instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect to Google Ads (prints the OAuth URL, or exchanges a code).
    Connect {
        /// Authorization code from the OAuth redirect. Omit to print the
        /// authorization URL first.
        #[arg(long)]
        code: Option<String>,
    },
    /// Disconnect from Google Ads and discard the stored session.
    Disconnect,
    /// Manage linked Google Ads accounts.
    Accounts {
        #[command(subcommand)]
        command: accounts::AccountsCommand,
    },
    /// Apply a campaign change through the confidence gate.
    Apply {
        #[command(subcommand)]
        command: apply::ApplyCommand,
    },
    /// Apply an AI recommendation from a JSON document.
    Recommend {
        /// Path to the recommendation JSON. Reads stdin when omitted.
        #[arg(long)]
        file: Option<std::path::PathBuf>,
    },
    /// Revert a recorded change.
    Revert {
        /// Change id, as shown by `adpilot history`.
        change_id: String,
    },
    /// Show recorded changes, newest first.
    History {
        /// Maximum number of rows to show (defaults to engine.history_limit).
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show connection, account, and ledger state.
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match adpilot_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            adpilot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.engine.log_level);

    let Some(command) = cli.command else {
        println!("adpilot: use --help for available commands");
        return;
    };

    if let Err(e) = run(command, &config, cli.json).await {
        if cli.json {
            output::emit_failure(&e.to_string());
        } else {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}

/// Wires the engine from configuration and dispatches one command.
async fn run(command: Commands, config: &AdpilotConfig, json: bool) -> Result<(), AdpilotError> {
    let db = Database::open_with_config(&config.storage).await?;
    let gateway: Arc<dyn AdsGateway> = Arc::new(GoogleAdsClient::new(&config.googleads)?);
    let notifier: Arc<dyn NotificationSink> = Arc::new(TerminalNotifier::new(json));
    let engine = AdsEngine::new(config, db, gateway, notifier);
    debug!(database_path = %config.storage.database_path, "engine wired");

    match command {
        Commands::Connect { code } => connect::run_connect(&engine, code.as_deref(), json).await,
        Commands::Disconnect => connect::run_disconnect(&engine, json).await,
        Commands::Accounts { command } => accounts::run_accounts(&engine, command, json).await,
        Commands::Apply { command } => apply::run_apply(&engine, command, json).await,
        Commands::Recommend { file } => apply::run_recommend(&engine, file.as_deref(), json).await,
        Commands::Revert { change_id } => apply::run_revert(&engine, &change_id, json).await,
        Commands::History { limit } => {
            history::run_history(&engine, limit.unwrap_or(config.engine.history_limit), json).await
        }
        Commands::Status => status::run_status(&engine, config, json).await,
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to the
/// adpilot crates and everything else stays at `warn`. Logs go to stderr so
/// `--json` keeps stdout as a single JSON document.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "adpilot={log_level},adpilot_engine={log_level},adpilot_googleads={log_level},\
             adpilot_ledger={log_level},adpilot_store={log_level},warn"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_the_documented_commands() {
        let cli = Cli::try_parse_from(["adpilot", "accounts", "select", "acct-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Accounts {
                command: accounts::AccountsCommand::Select { .. }
            })
        ));

        let cli = Cli::try_parse_from([
            "adpilot",
            "--json",
            "apply",
            "budget",
            "camp-1",
            "50000000",
            "--confidence",
            "92",
            "--reason",
            "scale the winner",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::Apply { .. })));
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::try_parse_from(["adpilot", "status", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed)
        let config =
            adpilot_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.engine.confidence_threshold, 100);
    }
}
