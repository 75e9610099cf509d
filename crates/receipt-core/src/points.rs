//! # Points Rule Engine
//!
//! Scores a validated [`Receipt`] with seven independent rules whose awards
//! are summed.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Points Rules                                    │
//! │                                                                         │
//! │  1. Retailer      +1 per ASCII letter or digit in the name             │
//! │  2. Round dollar  +50 if total has no cents                            │
//! │  3. Quarter       +25 if total is a multiple of 0.25                   │
//! │  4. Item pairs    +5 per two items                                     │
//! │  5. Description   ceil(price × 0.2) per item whose trimmed             │
//! │                   description length is a multiple of 3               │
//! │  6. Odd day       +6 if the purchase day is odd                        │
//! │  7. Afternoon     +10 if 14:00 <= time < 16:00                         │
//! │                                                                         │
//! │  Total = 1 + 2 + 3 + 4 + 5 + 6 + 7                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rule works on integer cents, so `ceil(price × 0.2)` is the exact
//! `ceil(cents / 500)` and never lands one point off from float error.
//!
//! The engine is pure: same receipt, same points, on any thread.
//!
//! ## Usage
//! ```rust
//! use receipt_core::{validate_receipt, ItemSubmission, PointsBreakdown, ReceiptSubmission};
//!
//! let receipt = validate_receipt(&ReceiptSubmission {
//!     retailer: "Target".to_string(),
//!     purchase_date: "2022-01-01".to_string(),
//!     purchase_time: "13:01".to_string(),
//!     total: "1.25".to_string(),
//!     items: vec![ItemSubmission::new("Pepsi - 12-oz", "1.25")],
//! })
//! .unwrap();
//!
//! let breakdown = PointsBreakdown::for_receipt(&receipt);
//! assert_eq!(breakdown.retailer_name, 6);
//! assert_eq!(breakdown.quarter_multiple, 25);
//! assert_eq!(breakdown.odd_day, 6);
//! assert_eq!(breakdown.total(), 37);
//! ```

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::Serialize;

use crate::money::Money;
use crate::types::{Item, Receipt};

/// Points for a total with no cents.
pub const ROUND_DOLLAR_POINTS: i64 = 50;

/// Points for a total that is a multiple of 0.25.
pub const QUARTER_MULTIPLE_POINTS: i64 = 25;

/// Points per two items.
pub const ITEM_PAIR_POINTS: i64 = 5;

/// Points for an odd purchase day.
pub const ODD_DAY_POINTS: i64 = 6;

/// Points for a purchase between 14:00 and 16:00.
pub const AFTERNOON_POINTS: i64 = 10;

/// Afternoon bonus window in hours: 14:00 inclusive to 16:00 exclusive.
const AFTERNOON_HOURS: std::ops::Range<u32> = 14..16;

/// Description points are `ceil(price × 0.2)`; in cents that is
/// `ceil(cents / 500)`.
const DESCRIPTION_PRICE_DIVISOR: i64 = 500;

const QUARTER: Money = Money::from_cents(25);

// =============================================================================
// Points Breakdown
// =============================================================================

/// Per-rule awards for one receipt.
///
/// ## Example
/// ```text
/// Target, 2022-01-01 13:01, 35.35, 5 items
/// ┌─────────────────────┬────────┐
/// │ retailer_name       │      6 │
/// │ round_dollar        │      0 │
/// │ quarter_multiple    │      0 │
/// │ item_pairs          │     10 │
/// │ item_descriptions   │      3 │
/// │ odd_day             │      6 │
/// │ afternoon           │      0 │
/// ├─────────────────────┼────────┤
/// │ total()             │     25 │
/// └─────────────────────┴────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PointsBreakdown {
    pub retailer_name: i64,
    pub round_dollar: i64,
    pub quarter_multiple: i64,
    pub item_pairs: i64,
    pub item_descriptions: i64,
    pub odd_day: i64,
    pub afternoon: i64,
}

impl PointsBreakdown {
    /// Applies every rule to `receipt`.
    pub fn for_receipt(receipt: &Receipt) -> Self {
        PointsBreakdown {
            retailer_name: retailer_name_points(&receipt.retailer),
            round_dollar: round_dollar_points(receipt.total),
            quarter_multiple: quarter_multiple_points(receipt.total),
            item_pairs: item_pair_points(receipt.items.len()),
            item_descriptions: receipt
                .items
                .iter()
                .map(item_description_points)
                .fold(0, i64::saturating_add),
            odd_day: odd_day_points(receipt.purchase_date),
            afternoon: afternoon_points(receipt.purchase_time),
        }
    }

    /// Sum of all rule awards.
    pub fn total(&self) -> i64 {
        [
            self.retailer_name,
            self.round_dollar,
            self.quarter_multiple,
            self.item_pairs,
            self.item_descriptions,
            self.odd_day,
            self.afternoon,
        ]
        .into_iter()
        .fold(0, i64::saturating_add)
    }
}

/// Computes the points for a validated receipt.
///
/// Never fails and has no side effects.
pub fn calculate_points(receipt: &Receipt) -> i64 {
    PointsBreakdown::for_receipt(receipt).total()
}

// =============================================================================
// Rules
// =============================================================================

/// Rule 1: one point per ASCII letter or digit in the retailer name.
///
/// ```rust
/// use receipt_core::points::retailer_name_points;
///
/// assert_eq!(retailer_name_points("M&M Corner Market"), 14);
/// ```
pub fn retailer_name_points(retailer: &str) -> i64 {
    retailer.chars().filter(char::is_ascii_alphanumeric).count() as i64
}

/// Rule 2: 50 points if the total is a round dollar amount.
pub fn round_dollar_points(total: Money) -> i64 {
    if total.is_whole_dollars() {
        ROUND_DOLLAR_POINTS
    } else {
        0
    }
}

/// Rule 3: 25 points if the total is a multiple of 0.25.
pub fn quarter_multiple_points(total: Money) -> i64 {
    if total.is_multiple_of(QUARTER) {
        QUARTER_MULTIPLE_POINTS
    } else {
        0
    }
}

/// Rule 4: 5 points for every two items.
pub fn item_pair_points(item_count: usize) -> i64 {
    (item_count / 2) as i64 * ITEM_PAIR_POINTS
}

/// Rule 5: `ceil(price × 0.2)` if the trimmed description length is a
/// positive multiple of 3.
///
/// Length counts characters, not bytes. A blank description has length 0
/// and earns nothing.
///
/// ```rust
/// use receipt_core::points::item_description_points;
/// use receipt_core::{Item, Money};
///
/// let item = Item {
///     short_description: "Emils Cheese Pizza".to_string(),
///     price: Money::from_cents(1225),
/// };
/// assert_eq!(item_description_points(&item), 3);
/// ```
pub fn item_description_points(item: &Item) -> i64 {
    let length = item.short_description.trim().chars().count();
    if length == 0 || length % 3 != 0 {
        return 0;
    }
    ceil_div(item.price.cents(), DESCRIPTION_PRICE_DIVISOR)
}

/// Rule 6: 6 points if the day of the month is odd.
pub fn odd_day_points(date: NaiveDate) -> i64 {
    if date.day() % 2 == 1 {
        ODD_DAY_POINTS
    } else {
        0
    }
}

/// Rule 7: 10 points if the hour is 14 or 15.
pub fn afternoon_points(time: NaiveTime) -> i64 {
    if AFTERNOON_HOURS.contains(&time.hour()) {
        AFTERNOON_POINTS
    } else {
        0
    }
}

/// Ceiling division for a positive divisor.
fn ceil_div(value: i64, divisor: i64) -> i64 {
    if value > 0 {
        (value - 1) / divisor + 1
    } else {
        // Truncation already rounds toward zero, which is up for negatives
        value / divisor
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
