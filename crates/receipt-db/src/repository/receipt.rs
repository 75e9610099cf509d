//! # Receipt Repository
//!
//! Database operations for receipts and their line items.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       insert(&ScoredReceipt)                            │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    INSERT INTO receipts       (id, retailer, date, time, total, points)│
//! │    INSERT INTO receipt_items  (receipt_id, position 0, ...)            │
//! │    INSERT INTO receipt_items  (receipt_id, position 1, ...)            │
//! │    ...                                                                 │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Any failure → transaction dropped → ROLLBACK, nothing is visible      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Row Format
//! Money is stored as integer cents, dates as `YYYY-MM-DD`, times as `HH:MM`.
//! Rows are read back through [`ReceiptRecord`] / [`ItemRecord`] and parsed
//! into domain types; text that no longer parses is reported as
//! [`DbError::DataCorruption`].

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use receipt_core::{
    Item, Money, Receipt, ScoredReceipt, PURCHASE_DATE_FORMAT, PURCHASE_TIME_FORMAT,
};

/// Repository for receipt database operations.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: SqlitePool,
}

impl ReceiptRepository {
    /// Creates a new ReceiptRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptRepository { pool }
    }

    /// Inserts a scored receipt and all of its items in one transaction.
    ///
    /// ## Errors
    /// - [`DbError::UniqueViolation`] if the id is already taken
    pub async fn insert(&self, scored: &ScoredReceipt) -> DbResult<()> {
        let receipt = &scored.receipt;
        debug!(
            id = %scored.id,
            items = receipt.items.len(),
            points = scored.points,
            "Inserting receipt"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO receipts (
                id, retailer, purchase_date, purchase_time,
                total_cents, points, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&scored.id)
        .bind(&receipt.retailer)
        .bind(receipt.purchase_date.format(PURCHASE_DATE_FORMAT).to_string())
        .bind(receipt.purchase_time.format(PURCHASE_TIME_FORMAT).to_string())
        .bind(receipt.total.cents())
        .bind(scored.points)
        .bind(scored.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| with_duplicate_value(e.into(), &scored.id))?;

        for (position, item) in receipt.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO receipt_items (
                    receipt_id, position, short_description, price_cents
                ) VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(&scored.id)
            .bind(position as i64)
            .bind(&item.short_description)
            .bind(item.price.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Gets a receipt with its items by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ScoredReceipt>> {
        debug!(id = %id, "Fetching receipt");

        let record = sqlx::query_as::<_, ReceiptRecord>(
            r#"
            SELECT
                id, retailer, purchase_date, purchase_time,
                total_cents, points, created_at
            FROM receipts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(record) = record else {
            return Ok(None);
        };

        let items = self.get_items(id).await?;
        record.into_scored(items).map(Some)
    }

    /// Gets the items of a receipt in submission order.
    pub async fn get_items(&self, receipt_id: &str) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, ItemRecord>(
            r#"
            SELECT short_description, price_cents
            FROM receipt_items
            WHERE receipt_id = ?1
            ORDER BY position
            "#,
        )
        .bind(receipt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items.into_iter().map(Item::from).collect())
    }

    /// Gets only the stored points of a receipt.
    pub async fn get_points(&self, id: &str) -> DbResult<Option<i64>> {
        let points: Option<i64> = sqlx::query_scalar("SELECT points FROM receipts WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(points)
    }

    /// Counts stored receipts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Checks that the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

/// Fills in the offending id on a unique violation.
fn with_duplicate_value(err: DbError, id: &str) -> DbError {
    match err {
        DbError::UniqueViolation { field, .. } => DbError::duplicate(field, id),
        other => other,
    }
}

// =============================================================================
// Records
// =============================================================================

/// Row of the `receipts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReceiptRecord {
    pub id: String,
    pub retailer: String,
    pub purchase_date: String,
    pub purchase_time: String,
    pub total_cents: i64,
    pub points: i64,
    pub created_at: DateTime<Utc>,
}

impl ReceiptRecord {
    /// Parses the row back into a [`ScoredReceipt`].
    fn into_scored(self, items: Vec<Item>) -> DbResult<ScoredReceipt> {
        let purchase_date = NaiveDate::parse_from_str(&self.purchase_date, PURCHASE_DATE_FORMAT)
            .map_err(|e| {
                DbError::corrupt("receipt", &self.id, format!("purchase_date: {e}"))
            })?;
        let purchase_time = NaiveTime::parse_from_str(&self.purchase_time, PURCHASE_TIME_FORMAT)
            .map_err(|e| {
                DbError::corrupt("receipt", &self.id, format!("purchase_time: {e}"))
            })?;

        Ok(ScoredReceipt {
            id: self.id,
            receipt: Receipt {
                retailer: self.retailer,
                purchase_date,
                purchase_time,
                total: Money::from_cents(self.total_cents),
                items,
            },
            points: self.points,
            created_at: self.created_at,
        })
    }
}

/// Row of the `receipt_items` table (the columns the domain needs).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemRecord {
    pub short_description: String,
    pub price_cents: i64,
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        Item {
            short_description: record.short_description,
            price: Money::from_cents(record.price_cents),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
