//! # Client Commands

use tracing::debug;

use devis_core::{Client, NewClient};

use crate::error::ApiResult;
use crate::state::DbState;

/// Every client, in creation order.
pub async fn list_clients(db: &DbState) -> Vec<Client> {
    db.lock().await.list_clients().to_vec()
}

/// A client by id, or `None`.
pub async fn get_client(db: &DbState, id: &str) -> Option<Client> {
    db.lock().await.get_client(id).cloned()
}

/// Validates and stores a new client.
///
/// ## Required Fields
/// - `name`
/// - `phone`
///
/// `email` is checked only when given.
pub async fn create_client(db: &DbState, new_client: NewClient) -> ApiResult<Client> {
    debug!(name = %new_client.name, "create_client command");
    let client = db.lock().await.create_client(new_client).await?;
    Ok(client)
}
