//! HTTP layer: JSON API under `/api`, landing page at `/`, diagnostics at `/test`.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
