//! # Error Types
//!
//! Domain-specific error types for receipt-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  receipt-core errors (this file)                                       │
//! │  ├── CoreError        - Money parsing, rejected receipts               │
//! │  └── ValidationError  - One failed field check                         │
//! │                                                                         │
//! │  receipt-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  receipt-api errors (in app)                                           │
//! │  └── ApiError         - What HTTP clients see (status + JSON)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Client                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field in every validation error
//! 3. Errors are enum variants, never String
//! 4. Each validation variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A monetary string is not in the `digits.two-digits` form.
    ///
    /// ## When This Occurs
    /// - `"12.3"`, `"12"`, `"-1.00"`, `"1,000.00"`
    #[error("Invalid amount '{input}': {reason}")]
    InvalidMoney { input: String, reason: String },

    /// A well-formed amount above `i64::MAX` cents (about 92 quadrillion).
    #[error("Amount '{input}' is too large")]
    MoneyOverflow { input: String },

    /// A receipt submission failed one or more field checks.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /receipts/process
    ///      │
    ///      ▼
    /// validate_receipt() → 2 field errors
    ///      │
    ///      ▼
    /// InvalidReceipt { errors: [retailer, total] }
    ///      │
    ///      ▼
    /// 400 { "errors": [ {field, message}, ... ] }
    /// ```
    #[error("Receipt failed validation with {} error(s)", errors.len())]
    InvalidReceipt { errors: Vec<ValidationError> },
}

impl From<Vec<ValidationError>> for CoreError {
    fn from(errors: Vec<ValidationError>) -> Self {
        CoreError::InvalidReceipt { errors }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// One value per failed field check. `field` uses the JSON field names of the
/// submission, with an index for items (`items[2].price`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A collection that needs at least one entry is empty.
    #[error("At least one entry is required in {field}")]
    Empty { field: String },

    /// Text contains characters outside the allowed set.
    #[error("{field} must contain only {allowed}")]
    InvalidCharacters { field: String, allowed: String },

    /// Invalid format (date, time, amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Returns the name of the field that failed.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::Empty { field }
            | ValidationError::InvalidCharacters { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
