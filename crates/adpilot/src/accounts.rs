// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `adpilot accounts` subcommand implementations.
//!
//! `list` works offline against the registry; `accessible` and `link` reach
//! the platform through the active session. Selection determines which
//! customer id campaign changes run against.

use std::io::IsTerminal;

use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;

use adpilot_core::types::{AccountId, LinkedAccount};
use adpilot_core::AdpilotError;
use adpilot_engine::AdsEngine;

use crate::output;

/// Account management subcommands.
#[derive(Subcommand, Debug)]
pub enum AccountsCommand {
    /// List linked accounts; `*` marks the selected one.
    List,
    /// List every account reachable with the connected credentials.
    Accessible,
    /// Link an account into the registry by customer id.
    Link {
        /// Customer id as displayed, e.g. 999-000-1111.
        customer_id: String,
    },
    /// Remove a linked account.
    Unlink {
        /// Account id, as shown by `adpilot accounts list`.
        id: String,
    },
    /// Select the account that campaign changes run against.
    Select {
        /// Account id, as shown by `adpilot accounts list`.
        id: String,
    },
}

/// Structured output for `adpilot accounts list`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountListResponse {
    accounts: Vec<LinkedAccount>,
    selected_id: Option<AccountId>,
}

/// Runs an `adpilot accounts` subcommand.
pub async fn run_accounts(
    engine: &AdsEngine,
    command: AccountsCommand,
    json: bool,
) -> Result<(), AdpilotError> {
    match command {
        AccountsCommand::List => run_list(engine, json).await,
        AccountsCommand::Accessible => run_accessible(engine, json).await,
        AccountsCommand::Link { customer_id } => run_link(engine, &customer_id, json).await,
        AccountsCommand::Unlink { id } => run_unlink(engine, &id, json).await,
        AccountsCommand::Select { id } => run_select(engine, &id, json).await,
    }
}

async fn run_list(engine: &AdsEngine, json: bool) -> Result<(), AdpilotError> {
    let accounts = engine.registry().list_linked_accounts().await?;
    let selected_id = engine.registry().selected_account().await?.map(|a| a.id);

    if json {
        output::emit_ok(&AccountListResponse {
            accounts,
            selected_id,
        });
        return Ok(());
    }
    if accounts.is_empty() {
        println!("No linked accounts. Run `adpilot accounts link <customer-id>` after connecting.");
        return Ok(());
    }
    let use_color = std::io::stdout().is_terminal();
    for account in &accounts {
        let selected = selected_id.as_ref() == Some(&account.id);
        let marker = if selected { "*" } else { " " };
        let line = format!(
            "{marker} {}  {}  {} ({}, {})",
            account.id,
            account.customer_id,
            account.descriptive_name,
            account.currency_code,
            account.status
        );
        if selected && use_color {
            println!("{}", line.green());
        } else {
            println!("{line}");
        }
    }
    Ok(())
}

async fn run_accessible(engine: &AdsEngine, json: bool) -> Result<(), AdpilotError> {
    let accounts = engine.registry().fetch_accessible_accounts().await?;
    if json {
        output::emit_ok(&accounts);
        return Ok(());
    }
    if accounts.is_empty() {
        println!("No accounts are accessible with the connected credentials.");
        return Ok(());
    }
    for account in &accounts {
        let role = if account.is_manager { "manager" } else { "client" };
        println!(
            "  {}  {} ({}, {role})",
            account.customer_id, account.descriptive_name, account.currency_code
        );
    }
    Ok(())
}

async fn run_link(engine: &AdsEngine, customer_id: &str, json: bool) -> Result<(), AdpilotError> {
    let account = engine.registry().link_account(customer_id).await?;
    if json {
        output::emit_ok(&account);
        return Ok(());
    }
    println!("  id: {}", account.id);
    println!("  Select it with `adpilot accounts select {}`.", account.id);
    Ok(())
}

async fn run_unlink(engine: &AdsEngine, id: &str, json: bool) -> Result<(), AdpilotError> {
    engine.registry().unlink_account(id).await?;
    if json {
        output::emit_ok(&serde_json::json!({ "unlinked": true }));
    }
    Ok(())
}

async fn run_select(engine: &AdsEngine, id: &str, json: bool) -> Result<(), AdpilotError> {
    let account = engine.registry().select_account(id).await?;
    if json {
        output::emit_ok(&account);
    }
    Ok(())
}
