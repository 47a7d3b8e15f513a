//! # Catalog Commands
//!
//! The user's library of reusable priced lines. Adding one to a quote is
//! `add_catalog_item_to_quote` in `quote.rs`.

use tracing::debug;

use devis_core::{CatalogItem, NewCatalogItem};

use crate::error::ApiResult;
use crate::state::DbState;

pub async fn list_catalog_items(db: &DbState) -> Vec<CatalogItem> {
    db.lock().await.list_catalog_items().to_vec()
}

/// Validates and stores a new catalog item.
pub async fn create_catalog_item(db: &DbState, new_item: NewCatalogItem) -> ApiResult<CatalogItem> {
    debug!(description = %new_item.description, "create_catalog_item command");
    let item = db.lock().await.create_catalog_item(new_item).await?;
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use devis_core::{Money, Quantity, TaxRate};
    use devis_db::{Database, DbConfig, SnapshotStore};

    async fn db() -> DbState {
        let database = Database::new(DbConfig::in_memory()).await.unwrap();
        DbState::new(SnapshotStore::open(database).await.unwrap())
    }

    fn faience(unit_price: Money) -> NewCatalogItem {
        NewCatalogItem {
            description: "Pose de faïence murale".to_string(),
            quantity: Quantity::from_units(1),
            unit: "m²".to_string(),
            unit_price,
            tax_rate: TaxRate::from_bps(1000),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let db = db().await;
        assert_eq!(list_catalog_items(&db).await.len(), 5);

        let item = create_catalog_item(&db, faience(Money::from_cents(4200)))
            .await
            .unwrap();

        let items = list_catalog_items(&db).await;
        assert_eq!(items.len(), 6);
        assert_eq!(items[5], item);
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let db = db().await;
        let err = create_catalog_item(&db, faience(Money::from_cents(-100)))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(list_catalog_items(&db).await.len(), 5);
    }
}
