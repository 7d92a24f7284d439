// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test utilities for Adpilot integration tests.
//!
//! Provides mock implementations of the platform gateway and notification
//! ports plus a harness that wires a complete engine around a temp SQLite
//! database.

pub mod harness;
pub mod mock_gateway;
pub mod mock_notifier;

pub use harness::{EngineHarness, EngineHarnessBuilder};
pub use mock_gateway::{sample_accounts, MockAdsGateway, RecordedMutation};
pub use mock_notifier::RecordingNotifier;
