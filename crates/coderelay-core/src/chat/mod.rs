//! Chat persistence abstraction and per-turn orchestration.
//!
//! - `repository`: the `ChatRepository` trait implemented by the infra layer
//! - `prompt`: transcript assembly from stored history
//! - `cleaner`: post-processing of generated text
//! - `fallback`: canned replies used when the model call fails
//! - `service`: the `ChatService` tying them together

pub mod cleaner;
pub mod fallback;
pub mod prompt;
pub mod repository;
pub mod service;
