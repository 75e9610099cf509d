//! HTTP handlers.
//!
//! - [`receipts`] - process a receipt, look up its points or the full record
//! - [`health`] - liveness and readiness probes

pub mod health;
pub mod receipts;
