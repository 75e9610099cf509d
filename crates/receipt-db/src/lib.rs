//! # receipt-db: Storage Layer for the Receipt Points Service
//!
//! Persists scored receipts in SQLite with sqlx, and defines the
//! [`ReceiptStore`] port the HTTP layer depends on.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Receipt Data Flow                                │
//! │                                                                         │
//! │  receipt-api handler (POST /receipts/process)                          │
//! │       │  Arc<dyn ReceiptStore>                                          │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    receipt-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (receipt.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ReceiptRepo   │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │ impl                           │   │
//! │  │   ┌────────────────────────────▼──────────────────────────┐    │   │
//! │  │   │ ReceiptStore (store.rs)   + InMemoryReceiptStore       │    │   │
//! │  │   └────────────────────────────────────────────────────────┘    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (RECEIPT_DATABASE_PATH, default ./receipts.db)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - SQLite repositories
//! - [`store`] - The storage port and the in-memory store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use receipt_db::{Database, DbConfig, ReceiptStore};
//!
//! let db = Database::new(DbConfig::new("./receipts.db")).await?;
//! let store: Arc<dyn ReceiptStore> = Arc::new(db.receipts());
//!
//! store.save(&scored).await?;
//! let points = store.get_points(&scored.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::receipt::ReceiptRepository;
pub use store::{generate_receipt_id, InMemoryReceiptStore, ReceiptStore};
