//! # Database State
//!
//! Wraps the `SnapshotStore` for use in commands.
//!
//! ## Thread Safety
//! The store keeps an in-memory copy of every collection next to its pool,
//! and writes replace a whole collection. An async mutex serializes those
//! writes so two saves cannot interleave their read-modify-persist steps.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn list_clients(db: &DbState) -> Vec<Client> {
//!     db.lock().await.list_clients().to_vec()
//! }
//! ```

use tokio::sync::{Mutex, MutexGuard};

use devis_db::SnapshotStore;

/// Wrapper around `SnapshotStore` for managed state.
#[derive(Debug)]
pub struct DbState {
    store: Mutex<SnapshotStore>,
}

impl DbState {
    /// Creates a new DbState owning the opened store.
    pub fn new(store: SnapshotStore) -> Self {
        DbState {
            store: Mutex::new(store),
        }
    }

    /// Waits for exclusive access to the store.
    pub async fn lock(&self) -> MutexGuard<'_, SnapshotStore> {
        self.store.lock().await
    }
}
