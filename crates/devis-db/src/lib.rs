//! # devis-db: Snapshot Store for Devis
//!
//! Persists clients, catalog items and quotes in a local SQLite database,
//! one JSON snapshot per collection.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Devis Data Flow                                │
//! │                                                                         │
//! │  Command (save_quote)                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     devis-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │ SnapshotStore │───►│ SnapshotRepo   │───►│   Database   │  │   │
//! │  │   │  (store.rs)   │    │ (repository/)  │    │  (pool.rs)   │  │   │
//! │  │   │ typed records │    │ JSON per key   │    │  SqlitePool  │  │   │
//! │  │   └───────┬───────┘    └────────────────┘    └──────┬───────┘  │   │
//! │  │           │ first open                              │          │   │
//! │  │   ┌───────▼───────┐                         ┌───────▼──────┐   │   │
//! │  │   │   fixtures    │                         │  migrations  │   │   │
//! │  │   └───────────────┘                         └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file in the platform data directory                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use devis_db::{Database, DbConfig, SnapshotStore};
//!
//! let db = Database::new(DbConfig::new("devis.db")).await?;
//! let mut store = SnapshotStore::open(db).await?;
//!
//! let number = store.next_quote_number(2026);
//! let saved = store.save_quote(quote).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fixtures;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::snapshot::{Snapshot, SnapshotRepository};
pub use store::{Record, SnapshotStore};
