//! # Snapshot Store
//!
//! Typed access to the three record collections, each kept in memory and
//! written back as a whole on every change.
//!
//! ## Open / Save Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SnapshotStore::open(db)                                                │
//! │       │                                                                 │
//! │       ├── clients       stored? ──yes──► decode JSON array              │
//! │       │                        └──no───► fixtures ──► persist now       │
//! │       ├── catalogItems  (same)                                          │
//! │       └── quotes        (same, fixture is empty)                        │
//! │                                                                         │
//! │  create_client / create_catalog_item / save_quote                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate ──► build new collection ──► persist ──► swap in memory       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A collection that was saved empty stays empty: seeding only happens when
//! no snapshot exists at all.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use devis_core::validation::{validate_new_catalog_item, validate_new_client};
use devis_core::{
    generate_id, CatalogItem, Client, NewCatalogItem, NewClient, QuoteDocument, QuoteNumber,
};

use crate::error::DbResult;
use crate::fixtures;
use crate::pool::Database;

// =============================================================================
// Record
// =============================================================================

/// A record type stored as one snapshot collection.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Snapshot key.
    const COLLECTION: &'static str;

    /// Entity name used in logs and errors.
    const ENTITY: &'static str;

    fn record_id(&self) -> &str;
}

impl Record for Client {
    const COLLECTION: &'static str = "clients";
    const ENTITY: &'static str = "Client";

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for CatalogItem {
    const COLLECTION: &'static str = "catalogItems";
    const ENTITY: &'static str = "CatalogItem";

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for QuoteDocument {
    const COLLECTION: &'static str = "quotes";
    const ENTITY: &'static str = "Quote";

    fn record_id(&self) -> &str {
        &self.id
    }
}

fn find<'a, T: Record>(records: &'a [T], id: &str) -> Option<&'a T> {
    records.iter().find(|record| record.record_id() == id)
}

// =============================================================================
// Snapshot Store
// =============================================================================

/// In-memory copy of every collection, backed by the `snapshots` table.
#[derive(Debug)]
pub struct SnapshotStore {
    db: Database,
    clients: Vec<Client>,
    catalog_items: Vec<CatalogItem>,
    quotes: Vec<QuoteDocument>,
}

impl SnapshotStore {
    /// Loads every collection, seeding and persisting the ones never saved.
    pub async fn open(db: Database) -> DbResult<Self> {
        let clients = load_or_seed(&db, fixtures::default_clients).await?;
        let catalog_items = load_or_seed(&db, fixtures::default_catalog_items).await?;
        let quotes = load_or_seed(&db, fixtures::default_quotes).await?;

        info!(
            clients = clients.len(),
            catalog_items = catalog_items.len(),
            quotes = quotes.len(),
            "Snapshot store opened"
        );

        Ok(SnapshotStore {
            db,
            clients,
            catalog_items,
            quotes,
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // -------------------------------------------------------------------------
    // Clients
    // -------------------------------------------------------------------------

    pub fn list_clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn get_client(&self, id: &str) -> Option<&Client> {
        find(&self.clients, id)
    }

    /// Validates, assigns an id, appends and persists.
    pub async fn create_client(&mut self, new_client: NewClient) -> DbResult<Client> {
        validate_new_client(&new_client)?;
        let client = new_client.into_client(generate_id());

        let mut clients = self.clients.clone();
        clients.push(client.clone());
        persist(&self.db, &clients).await?;
        self.clients = clients;

        info!(client_id = %client.id, "Client created");
        Ok(client)
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    pub fn list_catalog_items(&self) -> &[CatalogItem] {
        &self.catalog_items
    }

    pub fn get_catalog_item(&self, id: &str) -> Option<&CatalogItem> {
        find(&self.catalog_items, id)
    }

    /// Validates, assigns an id, appends and persists.
    pub async fn create_catalog_item(&mut self, new_item: NewCatalogItem) -> DbResult<CatalogItem> {
        validate_new_catalog_item(&new_item)?;
        let item = new_item.into_catalog_item(generate_id());

        let mut items = self.catalog_items.clone();
        items.push(item.clone());
        persist(&self.db, &items).await?;
        self.catalog_items = items;

        info!(item_id = %item.id, "Catalog item created");
        Ok(item)
    }

    // -------------------------------------------------------------------------
    // Quotes
    // -------------------------------------------------------------------------

    pub fn list_quotes(&self) -> &[QuoteDocument] {
        &self.quotes
    }

    pub fn get_quote(&self, id: &str) -> Option<&QuoteDocument> {
        find(&self.quotes, id)
    }

    /// Saves a quote: replaces the stored quote with the same id, or
    /// appends it.
    ///
    /// The quote must pass `validate_for_save`; otherwise nothing is
    /// written and the error lists every issue.
    pub async fn save_quote(&mut self, mut quote: QuoteDocument) -> DbResult<QuoteDocument> {
        if let Err(err) = quote.validate_for_save() {
            warn!(quote_id = %quote.id, error = %err, "Quote rejected on save");
            return Err(err.into());
        }
        quote.refresh();

        let mut quotes = self.quotes.clone();
        match quotes.iter().position(|q| q.id == quote.id) {
            Some(index) => quotes[index] = quote.clone(),
            None => quotes.push(quote.clone()),
        }
        persist(&self.db, &quotes).await?;
        self.quotes = quotes;

        info!(
            quote_id = %quote.id,
            number = %quote.number,
            total = %quote.summary.total_with_tax,
            "Quote saved"
        );
        Ok(quote)
    }

    /// Next free quote number for `year`: one past the highest sequence
    /// already used that year, or 1.
    pub fn next_quote_number(&self, year: i32) -> QuoteNumber {
        self.quotes
            .iter()
            .filter_map(QuoteDocument::quote_number)
            .filter(|number| number.year() == year)
            .max()
            .map(|last| last.next())
            .unwrap_or_else(|| QuoteNumber::new(year, 1))
    }
}

// =============================================================================
// Persistence helpers
// =============================================================================

async fn load_or_seed<T: Record>(db: &Database, seed: fn() -> Vec<T>) -> DbResult<Vec<T>> {
    match db.snapshots().load(T::COLLECTION).await? {
        Some(snapshot) => {
            let records: Vec<T> = serde_json::from_str(&snapshot.payload)?;
            debug!(collection = T::COLLECTION, count = records.len(), "Collection loaded");
            Ok(records)
        }
        None => {
            let records = seed();
            persist(db, &records).await?;
            info!(collection = T::COLLECTION, count = records.len(), "Collection seeded");
            Ok(records)
        }
    }
}

async fn persist<T: Record>(db: &Database, records: &[T]) -> DbResult<()> {
    let payload = serde_json::to_string(records)?;
    db.snapshots().save(T::COLLECTION, &payload).await?;
    debug!(collection = T::COLLECTION, entity = T::ENTITY, count = records.len(), "Collection persisted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::DbConfig;
    use chrono::{TimeZone, Utc};
    use devis_core::{CoreError, Money, Quantity, QuoteIssue, TaxRate};

    async fn open_memory() -> SnapshotStore {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        SnapshotStore::open(db).await.unwrap()
    }

    fn quote(number: &str) -> QuoteDocument {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut doc = QuoteDocument::with_skeleton(number, created, 30, TaxRate::from_bps(1000));
        doc.client_id = Some("1".to_string());
        doc
    }

    #[tokio::test]
    async fn test_open_seeds_fixtures() {
        let store = open_memory().await;

        assert_eq!(store.list_clients().len(), 2);
        assert_eq!(store.list_catalog_items().len(), 5);
        assert!(store.list_quotes().is_empty());
        assert_eq!(
            store.get_client("1").map(|c| c.name.as_str()),
            Some("Martin Dupont")
        );
        assert!(store.get_client("missing").is_none());

        let snapshots = store.database().snapshots();
        for collection in ["catalogItems", "clients", "quotes"] {
            assert!(snapshots.load(collection).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_seeding_happens_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut store = SnapshotStore::open(db.clone()).await.unwrap();
        store
            .create_client(NewClient {
                name: "Paul Girard".to_string(),
                phone: "06 00 00 00 00".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let reopened = SnapshotStore::open(db).await.unwrap();
        assert_eq!(reopened.list_clients().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_collection_is_not_reseeded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.snapshots().save("catalogItems", "[]").await.unwrap();

        let store = SnapshotStore::open(db).await.unwrap();
        assert!(store.list_catalog_items().is_empty());
        assert_eq!(store.list_clients().len(), 2);
    }

    #[tokio::test]
    async fn test_create_client_rejects_invalid() {
        let mut store = open_memory().await;
        let err = store
            .create_client(NewClient {
                name: String::new(),
                phone: "06".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
        assert_eq!(store.list_clients().len(), 2);
    }

    #[tokio::test]
    async fn test_create_catalog_item() {
        let mut store = open_memory().await;
        let item = store
            .create_catalog_item(NewCatalogItem {
                description: "Faïence murale".to_string(),
                quantity: Quantity::from_units(1),
                unit: "m²".to_string(),
                unit_price: Money::from_cents(5200),
                tax_rate: TaxRate::from_bps(1000),
            })
            .await
            .unwrap();

        assert_eq!(store.get_catalog_item(&item.id), Some(&item));
        assert_eq!(store.list_catalog_items().len(), 6);
    }

    #[tokio::test]
    async fn test_save_quote_appends_then_replaces() {
        let mut store = open_memory().await;
        let mut doc = quote("D2026000001");

        store.save_quote(doc.clone()).await.unwrap();
        doc.notes = "Accès par la cour".to_string();
        store.save_quote(doc.clone()).await.unwrap();

        assert_eq!(store.list_quotes().len(), 1);
        assert_eq!(
            store.get_quote(&doc.id).map(|q| q.notes.as_str()),
            Some("Accès par la cour")
        );
    }

    #[tokio::test]
    async fn test_save_invalid_quote_writes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut store = SnapshotStore::open(db.clone()).await.unwrap();

        let mut doc = quote("D2026000001");
        doc.client_id = None;
        doc.rows.retain(|row| !row.is_item());

        let err = store.save_quote(doc).await.unwrap_err();
        match err {
            DbError::Core(CoreError::ValidationFailed(issues)) => {
                assert_eq!(issues, vec![QuoteIssue::MissingClient, QuoteIssue::NoItems]);
            }
            other => panic!("expected ValidationFailed, got {:?}", other),
        }

        assert!(store.list_quotes().is_empty());
        let reopened = SnapshotStore::open(db).await.unwrap();
        assert!(reopened.list_quotes().is_empty());
    }

    #[tokio::test]
    async fn test_next_quote_number() {
        let mut store = open_memory().await;
        assert_eq!(store.next_quote_number(2026).to_string(), "D2026000001");

        store.save_quote(quote("D2026000001")).await.unwrap();
        store.save_quote(quote("D2026000007")).await.unwrap();
        store.save_quote(quote("D2025000042")).await.unwrap();

        assert_eq!(store.next_quote_number(2026).to_string(), "D2026000008");
        assert_eq!(store.next_quote_number(2025).to_string(), "D2025000043");
        assert_eq!(store.next_quote_number(2027).to_string(), "D2027000001");
    }

    #[tokio::test]
    async fn test_reopen_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devis.db");
        let doc = quote("D2026000001");

        {
            let db = Database::new(DbConfig::new(&path)).await.unwrap();
            let mut store = SnapshotStore::open(db.clone()).await.unwrap();
            store.save_quote(doc.clone()).await.unwrap();
            db.close().await;
        }

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let store = SnapshotStore::open(db).await.unwrap();
        let loaded = store.get_quote(&doc.id).unwrap();

        assert_eq!(loaded.number, "D2026000001");
        assert_eq!(loaded.rows.len(), doc.rows.len());
        assert_eq!(loaded.summary, doc.summary);
        assert_eq!(store.list_clients().len(), 2);
    }
}
