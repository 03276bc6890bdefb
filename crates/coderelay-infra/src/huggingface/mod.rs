//! Hugging Face Inference API gateway.

pub mod client;
pub mod types;

pub use client::HuggingFaceGateway;
