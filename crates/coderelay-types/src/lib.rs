//! Shared domain types for coderelay.
//!
//! Chats, messages, bot configurations, gateway parameters, diagnostics
//! reports and the error enums used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod bot;
pub mod chat;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gateway;
