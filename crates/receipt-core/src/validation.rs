//! # Validation Module
//!
//! Turns an untrusted [`ReceiptSubmission`] into a typed [`Receipt`].
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json)                                   │
//! │  ├── Body must be JSON with the expected shape                         │
//! │  └── Failure → 400 "Invalid JSON format"                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: validate_receipt (THIS MODULE)                               │
//! │  ├── Character sets for retailer and item descriptions                 │
//! │  ├── Date, time and amount parsing                                     │
//! │  └── Failure → 400 with every failed field                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checks do not stop at the first failure: a submission with a bad retailer
//! and a bad total reports both.
//!
//! ## Usage
//! ```rust
//! use receipt_core::validation::validate_retailer;
//!
//! assert!(validate_retailer("M&M Corner Market").is_ok());
//! assert!(validate_retailer("Bob's Diner").is_err());
//! ```

use chrono::{NaiveDate, NaiveTime};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    Item, ItemSubmission, Receipt, ReceiptSubmission, PURCHASE_DATE_FORMAT, PURCHASE_TIME_FORMAT,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const RETAILER_ALLOWED: &str = "letters, numbers, spaces, hyphens, and ampersands";
const DESCRIPTION_ALLOWED: &str = "letters, numbers, spaces, and hyphens";
const AMOUNT_FORMAT: &str = "expected a decimal number with exactly two decimal places";
const AMOUNT_TOO_LARGE: &str = "amount is too large";
const DATE_FORMAT: &str = "expected a date in YYYY-MM-DD format";
const TIME_FORMAT: &str = "expected a 24-hour time in HH:MM format";

/// `purchaseDate` layout; `d` is one ASCII digit.
const DATE_LAYOUT: &str = "dddd-dd-dd";

/// `purchaseTime` layouts: the hour may drop its leading zero, minutes may not.
const TIME_LAYOUTS: [&str; 2] = ["dd:dd", "d:dd"];

// =============================================================================
// Receipt Validator
// =============================================================================

/// Validates a whole submission and builds the typed receipt.
///
/// ## Returns
/// - `Ok(Receipt)` when every field passes
/// - `Err(errors)` with one entry per failed check, in field order
///
/// ## Example
/// ```rust
/// use receipt_core::{validate_receipt, ItemSubmission, ReceiptSubmission};
///
/// let submission = ReceiptSubmission {
///     retailer: "Target".to_string(),
///     purchase_date: "2022-13-01".to_string(),
///     purchase_time: "13:01".to_string(),
///     total: "1.2".to_string(),
///     items: vec![ItemSubmission::new("Emils", "1.20")],
/// };
///
/// let errors = validate_receipt(&submission).unwrap_err();
/// let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
/// assert_eq!(fields, ["purchaseDate", "total"]);
/// ```
pub fn validate_receipt(submission: &ReceiptSubmission) -> Result<Receipt, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let retailer = keep(validate_retailer(&submission.retailer), &mut errors);
    let purchase_date = keep(validate_purchase_date(&submission.purchase_date), &mut errors);
    let purchase_time = keep(validate_purchase_time(&submission.purchase_time), &mut errors);
    let total = keep(validate_amount("total", &submission.total), &mut errors);

    if submission.items.is_empty() {
        errors.push(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    let mut items = Vec::with_capacity(submission.items.len());
    for (index, item) in submission.items.iter().enumerate() {
        match validate_item(index, item) {
            Ok(item) => items.push(item),
            Err(mut item_errors) => errors.append(&mut item_errors),
        }
    }

    match (retailer, purchase_date, purchase_time, total) {
        (Some(retailer), Some(purchase_date), Some(purchase_time), Some(total))
            if errors.is_empty() =>
        {
            Ok(Receipt {
                retailer: retailer.to_string(),
                purchase_date,
                purchase_time,
                total,
                items,
            })
        }
        _ => Err(errors),
    }
}

/// Moves a failed check into `errors`, passing a success through.
fn keep<T>(result: ValidationResult<T>, errors: &mut Vec<ValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

/// Validates one line item; `index` is its position in `items`.
fn validate_item(index: usize, item: &ItemSubmission) -> Result<Item, Vec<ValidationError>> {
    let description_field = format!("items[{index}].shortDescription");
    let price_field = format!("items[{index}].price");

    let description = validate_description(&description_field, &item.short_description);
    let price = validate_amount(&price_field, &item.price);

    match (description, price) {
        (Ok(description), Ok(price)) => Ok(Item {
            short_description: description.to_string(),
            price,
        }),
        (description, price) => Err(description
            .err()
            .into_iter()
            .chain(price.err())
            .collect()),
    }
}

/// `validate_receipt` with the errors folded into a [`CoreError`].
impl TryFrom<&ReceiptSubmission> for Receipt {
    type Error = CoreError;

    fn try_from(submission: &ReceiptSubmission) -> CoreResult<Receipt> {
        validate_receipt(submission).map_err(CoreError::from)
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a retailer name.
///
/// ## Rules
/// - Must not be empty
/// - Only ASCII letters, digits, `_`, whitespace, `-` and `&`
///
/// The name is returned untouched: surrounding spaces are kept, since the
/// alphanumeric rule ignores them anyway.
pub fn validate_retailer(retailer: &str) -> ValidationResult<&str> {
    if retailer.is_empty() {
        return Err(ValidationError::Required {
            field: "retailer".to_string(),
        });
    }

    if !retailer.chars().all(|c| is_word_or_space(c) || c == '-' || c == '&') {
        return Err(ValidationError::InvalidCharacters {
            field: "retailer".to_string(),
            allowed: RETAILER_ALLOWED.to_string(),
        });
    }

    Ok(retailer)
}

/// Validates an item description.
///
/// ## Rules
/// - Must not be empty
/// - Only ASCII letters, digits, `_`, whitespace and `-`
///
/// A description of only spaces passes; it simply earns no description
/// points.
pub fn validate_description<'a>(field: &str, description: &'a str) -> ValidationResult<&'a str> {
    if description.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if !description.chars().all(|c| is_word_or_space(c) || c == '-') {
        return Err(ValidationError::InvalidCharacters {
            field: field.to_string(),
            allowed: DESCRIPTION_ALLOWED.to_string(),
        });
    }

    Ok(description)
}

/// ASCII word characters and ASCII whitespace.
fn is_word_or_space(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c.is_ascii_whitespace()
}

// =============================================================================
// Format Validators
// =============================================================================

/// Validates `purchaseDate` as a calendar date in `YYYY-MM-DD` form.
///
/// ## Example
/// ```rust
/// use receipt_core::validation::validate_purchase_date;
///
/// assert!(validate_purchase_date("2022-03-20").is_ok());
/// assert!(validate_purchase_date("2022-02-30").is_err());
/// assert!(validate_purchase_date("03/20/2022").is_err());
/// ```
pub fn validate_purchase_date(date: &str) -> ValidationResult<NaiveDate> {
    if date.is_empty() {
        return Err(ValidationError::Required {
            field: "purchaseDate".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "purchaseDate".to_string(),
        reason: DATE_FORMAT.to_string(),
    };

    // chrono alone also takes "2022-1-1", "+2022-01-01" and " 2022-01-01"
    if !matches_layout(date, DATE_LAYOUT) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(date, PURCHASE_DATE_FORMAT).map_err(|_| invalid())
}

/// Validates `purchaseTime` as a 24-hour `HH:MM` clock time.
///
/// ## Example
/// ```rust
/// use receipt_core::validation::validate_purchase_time;
///
/// assert!(validate_purchase_time("14:33").is_ok());
/// assert!(validate_purchase_time("24:00").is_err());
/// assert!(validate_purchase_time("2:33 PM").is_err());
/// ```
pub fn validate_purchase_time(time: &str) -> ValidationResult<NaiveTime> {
    if time.is_empty() {
        return Err(ValidationError::Required {
            field: "purchaseTime".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "purchaseTime".to_string(),
        reason: TIME_FORMAT.to_string(),
    };

    if !TIME_LAYOUTS.iter().any(|layout| matches_layout(time, layout)) {
        return Err(invalid());
    }

    NaiveTime::parse_from_str(time, PURCHASE_TIME_FORMAT).map_err(|_| invalid())
}

/// True when `input` has exactly the shape of `layout`: each `d` matches one
/// ASCII digit, every other byte matches itself.
fn matches_layout(input: &str, layout: &str) -> bool {
    input.len() == layout.len()
        && input.bytes().zip(layout.bytes()).all(|(byte, expected)| match expected {
            b'd' => byte.is_ascii_digit(),
            _ => byte == expected,
        })
}

/// Validates a monetary field (`total` or an item price).
pub fn validate_amount(field: &str, amount: &str) -> ValidationResult<Money> {
    if amount.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    amount.parse().map_err(|err| {
        let reason = match err {
            CoreError::MoneyOverflow { .. } => AMOUNT_TOO_LARGE,
            _ => AMOUNT_FORMAT,
        };
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
