// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only change history for the Adpilot change engine.
//!
//! This crate provides:
//! - **Change ledger**: Persistent recording of every applied campaign change
//!   with confidence, reasoning, and the replaced value
//! - **Revert marking**: In-place `applied -> reverted` status transitions
//!   that never rewrite history

pub mod ledger;

pub use ledger::ChangeLedger;
