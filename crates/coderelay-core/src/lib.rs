//! Business logic and trait definitions for coderelay.
//!
//! This crate defines the "ports" (repository and gateway traits) that the
//! infrastructure layer implements, plus everything that happens between an
//! incoming chat turn and the stored reply. It depends only on
//! `coderelay-types` -- never on `coderelay-infra` or any database/IO crate.

pub mod chat;
pub mod diagnostics;
pub mod gateway;
pub mod registry;
