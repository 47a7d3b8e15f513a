//! # Fixtures
//!
//! Records written the first time a collection is opened. They keep fixed
//! ids (`"1"`, `"2"`, …) so a fresh install always looks the same.

use devis_core::{Address, CatalogItem, Client, Money, Quantity, QuoteDocument, TaxRate};

const FIXTURE_TAX_RATE: TaxRate = TaxRate::from_bps(1000);

/// Two example clients.
pub fn default_clients() -> Vec<Client> {
    vec![
        Client {
            id: "1".to_string(),
            name: "Martin Dupont".to_string(),
            company: Some("Dupont & Fils".to_string()),
            phone: "06 12 34 56 78".to_string(),
            email: Some("martin@dupont.fr".to_string()),
            address: Some(Address {
                street: Some("15 rue de la Paix".to_string()),
                postal_code: Some("75001".to_string()),
                city: Some("Paris".to_string()),
            }),
        },
        Client {
            id: "2".to_string(),
            name: "Sophie Laurent".to_string(),
            company: None,
            phone: "07 23 45 67 89".to_string(),
            email: Some("sophie.laurent@gmail.com".to_string()),
            address: Some(Address {
                street: Some("8 avenue des Fleurs".to_string()),
                postal_code: Some("69002".to_string()),
                city: Some("Lyon".to_string()),
            }),
        },
    ]
}

/// Five tiling and bathroom items, all at 10%.
pub fn default_catalog_items() -> Vec<CatalogItem> {
    [
        ("1", "Carrelage sol standard", "m²", 2500),
        ("2", "Main d'œuvre pose carrelage", "m²", 3500),
        ("3", "Pose de carrelage mural", "m²", 4500),
        ("4", "Installation douche à l'italienne", "u", 85000),
        ("5", "Remplacement lavabo", "u", 45000),
    ]
    .into_iter()
    .map(|(id, description, unit, cents)| CatalogItem {
        id: id.to_string(),
        description: description.to_string(),
        quantity: Quantity::from_units(1),
        unit: unit.to_string(),
        unit_price: Money::from_cents(cents),
        tax_rate: FIXTURE_TAX_RATE,
    })
    .collect()
}

/// No quotes until the user writes one.
pub fn default_quotes() -> Vec<QuoteDocument> {
    Vec::new()
}
