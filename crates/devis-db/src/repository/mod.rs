//! # Repository Module
//!
//! SQL access for the snapshot store.
//!
//! ```text
//! SnapshotStore (typed records)
//!      │  db.snapshots().save("quotes", json)
//!      ▼
//! SnapshotRepository (raw JSON text per collection)
//!      │  INSERT ... ON CONFLICT(collection) DO UPDATE
//!      ▼
//! SQLite `snapshots` table
//! ```

pub mod snapshot;
