// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port trait definitions for the Adpilot engine.
//!
//! The engine services depend on these traits rather than on concrete
//! implementations. Production wiring injects the HTTP platform client and a
//! real notification sink; tests inject mocks. All ports use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod gateway;
pub mod notify;

pub use gateway::AdsGateway;
pub use notify::NotificationSink;
