//! # Domain Types
//!
//! Wire types and validated domain types for receipts.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  WIRE (untrusted strings)            VALIDATED (parsed, typed)          │
//! │  ┌──────────────────────┐            ┌──────────────────────┐           │
//! │  │  ReceiptSubmission   │ validate   │       Receipt        │           │
//! │  │  retailer: String    │──────────► │  retailer: String    │           │
//! │  │  purchaseDate: Str   │ _receipt() │  purchase_date: Date │           │
//! │  │  purchaseTime: Str   │            │  purchase_time: Time │           │
//! │  │  total: String       │            │  total: Money        │           │
//! │  │  items: [ItemSub..]  │            │  items: [Item]       │           │
//! │  └──────────────────────┘            └──────────┬───────────┘           │
//! │                                                 │ calculate_points()    │
//! │                                                 ▼                       │
//! │                                      ┌──────────────────────┐           │
//! │                                      │    ScoredReceipt     │           │
//! │                                      │  id, receipt, points │           │
//! │                                      │  created_at          │           │
//! │                                      └──────────────────────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// `chrono` format of `purchaseDate` (`2022-01-01`).
pub const PURCHASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// `chrono` format of `purchaseTime` (`13:01`, 24-hour, no seconds).
pub const PURCHASE_TIME_FORMAT: &str = "%H:%M";

// =============================================================================
// Submissions (wire form)
// =============================================================================

/// A receipt as submitted by a client, before validation.
///
/// Every field is kept as the raw string the client sent so that
/// validation can report each bad field by name. A missing field
/// deserializes as empty and is then reported as required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct ReceiptSubmission {
    pub retailer: String,
    pub purchase_date: String,
    pub purchase_time: String,
    pub items: Vec<ItemSubmission>,
    pub total: String,
}

/// One line item as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemSubmission {
    pub short_description: String,
    pub price: String,
}

impl ItemSubmission {
    /// Creates an item submission from its description and price strings.
    pub fn new(short_description: impl Into<String>, price: impl Into<String>) -> Self {
        ItemSubmission {
            short_description: short_description.into(),
            price: price.into(),
        }
    }
}

// =============================================================================
// Receipt (validated form)
// =============================================================================

/// A validated receipt: the input of the points calculator.
///
/// Built by [`crate::validation::validate_receipt`]; every field is already
/// parsed, so scoring cannot hit a malformed date, time or amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub retailer: String,

    #[ts(as = "String")]
    pub purchase_date: NaiveDate,

    #[ts(as = "String")]
    #[serde(with = "hhmm")]
    pub purchase_time: NaiveTime,

    #[ts(as = "String")]
    pub total: Money,

    /// Line items in submission order.
    pub items: Vec<Item>,
}

/// A validated line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub short_description: String,

    #[ts(as = "String")]
    pub price: Money,
}

// =============================================================================
// Scored Receipt
// =============================================================================

/// A receipt after scoring: the unit written to and read from the store.
///
/// `points` is computed once from `receipt` and never changes. `id` and
/// `created_at` are bookkeeping and play no part in scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScoredReceipt {
    /// Opaque identifier (UUID v4), assigned at creation.
    pub id: String,

    #[serde(flatten)]
    pub receipt: Receipt,

    pub points: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Serde helpers
// =============================================================================

/// `HH:MM` serde for [`NaiveTime`] (chrono's default adds seconds).
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::PURCHASE_TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(PURCHASE_TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, PURCHASE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_receipt() -> Receipt {
        Receipt {
            retailer: "Target".to_string(),
            purchase_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            purchase_time: NaiveTime::from_hms_opt(13, 1, 0).unwrap(),
            total: Money::from_cents(3535),
            items: vec![Item {
                short_description: "Emils".to_string(),
                price: Money::from_cents(1225),
            }],
        }
    }

    #[test]
    fn test_submission_uses_camel_case() {
        let json = r#"{
            "retailer": "Target",
            "purchaseDate": "2022-01-01",
            "purchaseTime": "13:01",
            "items": [{"shortDescription": "Emils", "price": "12.25"}],
            "total": "12.25"
        }"#;

        let submission: ReceiptSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.purchase_date, "2022-01-01");
        assert_eq!(submission.items, vec![ItemSubmission::new("Emils", "12.25")]);
    }

    #[test]
    fn test_missing_fields_deserialize_empty() {
        let json = r#"{"retailer":"A","purchaseDate":"2022-01-01","purchaseTime":"13:01"}"#;
        let submission: ReceiptSubmission = serde_json::from_str(json).unwrap();
        assert!(submission.items.is_empty());
        assert_eq!(submission.total, "");
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let json = r#"{"retailer":"A","total":9.00}"#;
        assert!(serde_json::from_str::<ReceiptSubmission>(json).is_err());
    }

    #[test]
    fn test_receipt_serializes_wire_formats() {
        let value = serde_json::to_value(sample_receipt()).unwrap();
        assert_eq!(value["purchaseDate"], "2022-01-01");
        assert_eq!(value["purchaseTime"], "13:01");
        assert_eq!(value["total"], "35.35");
        assert_eq!(value["items"][0]["shortDescription"], "Emils");
        assert_eq!(value["items"][0]["price"], "12.25");
    }

    #[test]
    fn test_scored_receipt_flattens_receipt() {
        let scored = ScoredReceipt {
            id: "abc".to_string(),
            receipt: sample_receipt(),
            points: 6,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["retailer"], "Target");
        assert_eq!(value["points"], 6);
        assert!(value.get("receipt").is_none());

        let back: ScoredReceipt = serde_json::from_value(value).unwrap();
        assert_eq!(back, scored);
    }
}
