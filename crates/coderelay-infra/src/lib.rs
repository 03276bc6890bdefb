//! Infrastructure layer for coderelay.
//!
//! Contains implementations of the traits defined in `coderelay-core`:
//! SQLite chat storage and the Hugging Face inference gateway, plus the
//! tuning-file loader and API key lookup used at startup.

pub mod config;
pub mod credentials;
pub mod huggingface;
pub mod sqlite;
