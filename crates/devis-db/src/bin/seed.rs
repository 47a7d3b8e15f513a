//! # Seed Data Generator
//!
//! Creates a development database with the fixture collections and,
//! optionally, a few filled-in quotes.
//!
//! ## Usage
//! ```bash
//! # Fixtures only
//! cargo run -p devis-db --bin seed
//!
//! # Fixtures plus 3 demo quotes
//! cargo run -p devis-db --bin seed -- --quotes 3
//!
//! # Specify database path
//! cargo run -p devis-db --bin seed -- --db ./data/devis.db
//! ```

use chrono::{Datelike, Utc};
use std::env;

use devis_core::{
    CatalogItem, ItemRow, Money, Quantity, QuoteDocument, QuoteEditor, Row, RowField, TaxRate,
    DEFAULT_VALIDITY_DAYS,
};
use devis_db::{Database, DbConfig, SnapshotStore};

/// Rooms used as section titles for demo quotes.
const ROOMS: &[&str] = &["Salle de bain", "Cuisine", "Entrée", "Buanderie"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut quote_count: usize = 0;
    let mut db_path = String::from("./devis_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--quotes" | "-q" => {
                if i + 1 < args.len() {
                    quote_count = args[i + 1].parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Devis Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -q, --quotes <N>   Number of demo quotes to add (default: 0)");
                println!("  -d, --db <PATH>    Database file path (default: ./devis_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Devis Seed Data Generator");
    println!("=========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let mut store = SnapshotStore::open(db).await?;

    println!("✓ Connected, migrations applied");
    println!("  Clients:       {}", store.list_clients().len());
    println!("  Catalog items: {}", store.list_catalog_items().len());
    println!("  Quotes:        {}", store.list_quotes().len());

    if quote_count == 0 {
        return Ok(());
    }

    println!();
    println!("Generating {} demo quotes...", quote_count);

    let catalog: Vec<CatalogItem> = store.list_catalog_items().to_vec();
    let client_ids: Vec<String> = store.list_clients().iter().map(|c| c.id.clone()).collect();
    if client_ids.is_empty() || catalog.is_empty() {
        println!("⚠ Need at least one client and one catalog item; skipping.");
        return Ok(());
    }

    let year = Utc::now().year();
    for n in 0..quote_count {
        let number = store.next_quote_number(year);
        let doc = demo_quote(
            number.to_string(),
            &client_ids[n % client_ids.len()],
            &catalog,
            n,
        )?;

        match store.save_quote(doc).await {
            Ok(saved) => println!(
                "  {} ─ {} ─ {} TTC",
                saved.number,
                ROOMS[n % ROOMS.len()],
                saved.summary.total_with_tax
            ),
            Err(e) => eprintln!("Failed to save quote {}: {}", number, e),
        }
    }

    println!();
    println!("✓ Seed complete!");
    Ok(())
}

/// Builds one quote through the editor: a room section with three catalog
/// items and a note.
fn demo_quote(
    number: String,
    client_id: &str,
    catalog: &[CatalogItem],
    seed: usize,
) -> Result<QuoteDocument, Box<dyn std::error::Error>> {
    let doc = QuoteDocument::new(number, Utc::now(), DEFAULT_VALIDITY_DAYS);
    let mut editor = QuoteEditor::new(doc);

    editor.append_row(Row::section(ROOMS[seed % ROOMS.len()]))?;
    editor.append_row(Row::text("Dépose de l'existant comprise"))?;

    for k in 0..3 {
        let item = &catalog[(seed + k) % catalog.len()];
        let position = editor.document().rows.len();
        let row_id = editor.insert_catalog_item(position, item)?.rows[position]
            .id()
            .to_string();

        let quantity = Quantity::from_milli(1000 + ((seed * 7 + k * 3) % 12) as i64 * 500);
        editor.update_row_field(&row_id, RowField::Quantity(quantity))?;
    }

    editor.append_row(Row::page_break())?;
    editor.set_client(Some(client_id.to_string()));
    editor.set_payment_terms("30% d'acompte à la signature")?;

    if seed % 2 == 1 {
        let disposal = Row::item(ItemRow::new(
            "Évacuation des gravats",
            Quantity::from_units(1),
            "forfait",
            Money::from_cents(15000),
            TaxRate::from_bps(2000),
        ));
        editor.append_row(disposal)?;
    }

    Ok(editor.into_document())
}
