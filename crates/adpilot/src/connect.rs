// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `adpilot connect` and `adpilot disconnect` command implementations.
//!
//! Connecting is a two-step flow: `adpilot connect` prints the OAuth
//! authorization URL, and `adpilot connect --code <code>` exchanges the
//! redirect code, persists the session, and lists the accessible accounts.

use serde::Serialize;

use adpilot_core::types::AccountSummary;
use adpilot_core::AdpilotError;
use adpilot_engine::AdsEngine;

use crate::output;

/// Structured output for the URL step of `adpilot connect`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizeResponse {
    authorize_url: String,
    state: String,
}

/// Structured output for the exchange step of `adpilot connect`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectResponse {
    accounts_accessible: usize,
    accounts: Vec<AccountSummary>,
}

/// Runs `adpilot connect`.
pub async fn run_connect(
    engine: &AdsEngine,
    code: Option<&str>,
    json: bool,
) -> Result<(), AdpilotError> {
    let Some(code) = code else {
        let auth = engine.session().authorize_url()?;
        if json {
            output::emit_ok(&AuthorizeResponse {
                authorize_url: auth.url.to_string(),
                state: auth.state,
            });
        } else {
            println!("Open this URL in a browser to authorize Adpilot:");
            println!();
            println!("  {}", auth.url);
            println!();
            println!("Then finish connecting with:");
            println!("  adpilot connect --code <AUTHORIZATION_CODE>");
        }
        return Ok(());
    };

    let accounts = engine.session().connect(code).await?;
    if json {
        output::emit_ok(&ConnectResponse {
            accounts_accessible: accounts.len(),
            accounts,
        });
    } else {
        for account in &accounts {
            println!(
                "  {}  {} ({})",
                account.customer_id, account.descriptive_name, account.currency_code
            );
        }
        println!();
        println!("Link an account with `adpilot accounts link <customer-id>`.");
    }
    Ok(())
}

/// Runs `adpilot disconnect`. Disconnecting twice succeeds quietly.
pub async fn run_disconnect(engine: &AdsEngine, json: bool) -> Result<(), AdpilotError> {
    engine.session().disconnect().await?;
    if json {
        output::emit_ok(&serde_json::json!({ "disconnected": true }));
    }
    Ok(())
}
