//! # Repository Module
//!
//! SQLite repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  state.store.get_points(&id)      (ReceiptStore port)          │
//! │       ▼                                                                 │
//! │  ReceiptRepository                                                     │
//! │  ├── insert(&self, scored)      one transaction, receipt + items       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── get_items(&self, id)                                              │
//! │  ├── get_points(&self, id)                                             │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod receipt;
