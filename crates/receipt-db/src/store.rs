//! # Receipt Store
//!
//! The storage port the HTTP layer is written against, and its two
//! implementations.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ReceiptStore (port)                              │
//! │           save · get_by_id · get_points · count · health_check          │
//! │                                                                         │
//! │        ┌──────────────────────┐        ┌──────────────────────┐         │
//! │        │  ReceiptRepository   │        │  InMemoryReceiptStore│         │
//! │        │  SQLite (sqlx)       │        │  RwLock<HashMap>     │         │
//! │        │  server default      │        │  tests, ephemeral    │         │
//! │        └──────────────────────┘        └──────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Receipts are immutable once saved: there is no update or delete.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::receipt::ReceiptRepository;
use receipt_core::ScoredReceipt;

/// Generates a new receipt identifier (UUID v4).
pub fn generate_receipt_id() -> String {
    Uuid::new_v4().to_string()
}

/// Storage for scored receipts.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Saves a receipt with its items. Fails on a duplicate id.
    async fn save(&self, receipt: &ScoredReceipt) -> DbResult<()>;

    /// Finds a receipt by id.
    async fn get_by_id(&self, id: &str) -> DbResult<Option<ScoredReceipt>>;

    /// Finds only the points of a receipt.
    async fn get_points(&self, id: &str) -> DbResult<Option<i64>> {
        Ok(self.get_by_id(id).await?.map(|receipt| receipt.points))
    }

    /// Counts stored receipts.
    async fn count(&self) -> DbResult<i64>;

    /// Returns true when the store can serve requests.
    async fn health_check(&self) -> bool;
}

// =============================================================================
// SQLite
// =============================================================================

#[async_trait]
impl ReceiptStore for ReceiptRepository {
    async fn save(&self, receipt: &ScoredReceipt) -> DbResult<()> {
        self.insert(receipt).await
    }

    async fn get_by_id(&self, id: &str) -> DbResult<Option<ScoredReceipt>> {
        ReceiptRepository::get_by_id(self, id).await
    }

    async fn get_points(&self, id: &str) -> DbResult<Option<i64>> {
        ReceiptRepository::get_points(self, id).await
    }

    async fn count(&self) -> DbResult<i64> {
        ReceiptRepository::count(self).await
    }

    async fn health_check(&self) -> bool {
        ReceiptRepository::health_check(self).await
    }
}

// =============================================================================
// In-Memory
// =============================================================================

/// Process-local store; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryReceiptStore {
    receipts: RwLock<HashMap<String, ScoredReceipt>>,
}

impl InMemoryReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReceiptStore for InMemoryReceiptStore {
    async fn save(&self, receipt: &ScoredReceipt) -> DbResult<()> {
        let mut receipts = self.receipts.write().await;
        if receipts.contains_key(&receipt.id) {
            return Err(DbError::duplicate("receipts.id", &receipt.id));
        }

        debug!(id = %receipt.id, points = receipt.points, "Storing receipt in memory");
        receipts.insert(receipt.id.clone(), receipt.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> DbResult<Option<ScoredReceipt>> {
        Ok(self.receipts.read().await.get(id).cloned())
    }

    async fn count(&self) -> DbResult<i64> {
        Ok(self.receipts.read().await.len() as i64)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::pool::{Database, DbConfig};
    use receipt_core::{calculate_points, validate_receipt, ItemSubmission, ReceiptSubmission};

    fn scored(id: &str) -> ScoredReceipt {
        let receipt = validate_receipt(&ReceiptSubmission {
            retailer: "M&M Corner Market".to_string(),
            purchase_date: "2022-03-20".to_string(),
            purchase_time: "14:33".to_string(),
            total: "9.00".to_string(),
            items: vec![ItemSubmission::new("Gatorade", "2.25"); 4],
        })
        .unwrap();

        ScoredReceipt {
            id: id.to_string(),
            points: calculate_points(&receipt),
            receipt,
            created_at: Utc::now(),
        }
    }

    async fn stores() -> Vec<Arc<dyn ReceiptStore>> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        vec![Arc::new(InMemoryReceiptStore::new()), Arc::new(db.receipts())]
    }

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let a = generate_receipt_id();
        let b = generate_receipt_id();

        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[tokio::test]
    async fn test_save_then_get() {
        for store in stores().await {
            store.save(&scored("r-1")).await.unwrap();

            let loaded = store.get_by_id("r-1").await.unwrap().unwrap();
            assert_eq!(loaded.points, 109);
            assert_eq!(loaded.receipt.items.len(), 4);
            assert_eq!(store.get_points("r-1").await.unwrap(), Some(109));
            assert_eq!(store.count().await.unwrap(), 1);
            assert!(store.health_check().await);
        }
    }

    #[tokio::test]
    async fn test_unknown_id() {
        for store in stores().await {
            assert!(store.get_by_id("nope").await.unwrap().is_none());
            assert!(store.get_points("nope").await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        for store in stores().await {
            store.save(&scored("r-1")).await.unwrap();

            let err = store.save(&scored("r-1")).await.unwrap_err();
            assert!(matches!(err, DbError::UniqueViolation { .. }));
            assert_eq!(store.count().await.unwrap(), 1);
        }
    }
}
