//! Remote inference abstractions for coderelay.
//!
//! - `ModelGateway`: RPITIT trait for concrete inference backends
//! - `BoxModelGateway`: object-safe, cloneable wrapper for dynamic dispatch
//! - `RetryPolicy`: attempt budget and backoff delays for transient failures

pub mod box_gateway;
pub mod provider;
pub mod retry;
