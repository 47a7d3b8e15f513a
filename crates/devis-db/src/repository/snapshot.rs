//! # Snapshot Repository
//!
//! Reads and writes whole-collection JSON payloads.
//!
//! ## Table Layout
//! ```text
//! ┌──────────────┬──────────────────────────────────┬──────────────────────┐
//! │ collection   │ payload                          │ updated_at           │
//! ├──────────────┼──────────────────────────────────┼──────────────────────┤
//! │ clients      │ [{"id":"1","name":"Martin…"},…]  │ 2026-03-01T09:00:00Z │
//! │ catalogItems │ [{"id":"1","description":…},…]   │ 2026-03-01T09:00:00Z │
//! │ quotes       │ []                               │ 2026-03-01T09:00:00Z │
//! └──────────────┴──────────────────────────────────┴──────────────────────┘
//! ```
//!
//! A save replaces the row for its collection. There is no merge: the last
//! write wins.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// A stored payload with its last write time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub collection: String,
    pub payload: String,
    pub updated_at: DateTime<Utc>,
}

/// Repository for the `snapshots` table.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    /// Creates a new SnapshotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Loads the snapshot of `collection`, or `None` if it was never saved.
    pub async fn load(&self, collection: &str) -> DbResult<Option<Snapshot>> {
        let row = sqlx::query(
            r#"
            SELECT collection, payload, updated_at
            FROM snapshots
            WHERE collection = ?1
            "#,
        )
        .bind(collection)
        .fetch_optional(&self.pool)
        .await?;

        let snapshot = match row {
            Some(row) => Some(Snapshot {
                collection: row.try_get("collection")?,
                payload: row.try_get("payload")?,
                updated_at: row.try_get("updated_at")?,
            }),
            None => None,
        };

        debug!(collection, found = snapshot.is_some(), "Loaded snapshot");
        Ok(snapshot)
    }

    /// Writes `payload` as the snapshot of `collection`, replacing any
    /// previous one.
    pub async fn save(&self, collection: &str, payload: &str) -> DbResult<DateTime<Utc>> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO snapshots (collection, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(collection) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(collection)
        .bind(payload)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(collection, bytes = payload.len(), "Saved snapshot");
        Ok(now)
    }

}

// =============================================================================
// Unit Tests
// =============================================================================
