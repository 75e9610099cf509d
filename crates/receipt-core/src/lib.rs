//! # receipt-core: Pure Business Logic for Receipt Points
//!
//! This crate is the **heart** of the receipt points service. It turns a
//! submitted receipt into a validated [`Receipt`] and scores it with the
//! points rule engine, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Receipt Points Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    receipt-api (axum)                           │   │
//! │  │    POST /receipts/process      GET /receipts/{id}/points        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ receipt-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ validation│  │  points   │  │   │
//! │  │   │  Receipt  │  │   Money   │  │  fields   │  │  7 rules  │  │   │
//! │  │   │   Item    │  │  "12.34"  │  │  parsing  │  │  summed   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    receipt-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types (submissions) and validated domain types
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation, the only way to build a [`Receipt`]
//! - [`points`] - The points rule engine
//!
//! ## Example Usage
//!
//! ```rust
//! use receipt_core::{calculate_points, validate_receipt, ItemSubmission, ReceiptSubmission};
//!
//! let submission = ReceiptSubmission {
//!     retailer: "M&M Corner Market".to_string(),
//!     purchase_date: "2022-03-20".to_string(),
//!     purchase_time: "14:33".to_string(),
//!     total: "9.00".to_string(),
//!     items: vec![
//!         ItemSubmission::new("Gatorade", "2.25"),
//!         ItemSubmission::new("Gatorade", "2.25"),
//!         ItemSubmission::new("Gatorade", "2.25"),
//!         ItemSubmission::new("Gatorade", "2.25"),
//!     ],
//! };
//!
//! let receipt = validate_receipt(&submission).unwrap();
//! assert_eq!(calculate_points(&receipt), 109);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod points;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use points::{calculate_points, PointsBreakdown};
pub use types::*;
pub use validation::validate_receipt;
