//! # Validation Module
//!
//! Input validation for quote rows, clients and catalog items.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Parsing (FromStr on Money / Quantity / TaxRate)              │
//! │  └── "abc", "12.345", "1e3" never become numbers                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: field rules                                     │
//! │  ├── Ranges (quantity ≥ 0, price ≥ 0, tax ≤ 100%)                      │
//! │  └── Lengths and required fields                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Document rules (QuoteDocument::validate_for_save)            │
//! │  └── Client assigned, at least one item                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use devis_core::validation::{validate_quantity, validate_tax_rate};
//! use devis_core::types::{Quantity, TaxRate};
//!
//! assert!(validate_quantity(Quantity::from_units(2)).is_ok());
//! assert!(validate_tax_rate(TaxRate::from_bps(10001)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::rows::{ItemRow, Row};
use crate::types::{CatalogItem, NewCatalogItem, NewClient, Quantity, TaxRate};
use crate::{
    MAX_DESCRIPTION_LENGTH, MAX_NOTE_LENGTH, MAX_QUANTITY_MILLI, MAX_TITLE_LENGTH, MAX_UNIT_PRICE_CENTS,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn check_length(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

fn check_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a section or subsection title. Empty titles are allowed
/// while a quote is being drafted.
pub fn validate_title(title: &str) -> ValidationResult<()> {
    check_length("title", title, MAX_TITLE_LENGTH)
}

/// Validates an item or catalog description.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    check_length("description", description, MAX_DESCRIPTION_LENGTH)
}

/// Validates a unit label such as `m²`, `h` or `u`.
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    check_length("unit", unit, 20)
}

/// Validates long free text: text rows, notes, payment terms.
pub fn validate_free_text(field: &str, text: &str) -> ValidationResult<()> {
    check_length(field, text, MAX_NOTE_LENGTH)
}

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@`
/// - Non-empty local part, domain containing a dot
///
/// ## Example
/// ```rust
/// use devis_core::validation::validate_email;
///
/// assert!(validate_email("martin.dupont@email.com").is_ok());
/// assert!(validate_email("martin.dupont").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@domain.tld".to_string(),
    };

    let email = email.trim();
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(invalid());
    }
    match domain.split_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !tld.ends_with('.') => Ok(()),
        _ => Err(invalid()),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a row quantity.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (placeholder rows)
/// - At most [`MAX_QUANTITY_MILLI`] thousandths
pub fn validate_quantity(qty: Quantity) -> ValidationResult<()> {
    if qty.is_negative() || qty.milli() > MAX_QUANTITY_MILLI {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_QUANTITY_MILLI,
        });
    }
    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (price not yet known)
/// - At most [`MAX_UNIT_PRICE_CENTS`] cents
///
/// ## Example
/// ```rust
/// use devis_core::validation::validate_unit_price;
/// use devis_core::money::Money;
///
/// assert!(validate_unit_price(Money::from_cents(2500)).is_ok());
/// assert!(validate_unit_price(Money::zero()).is_ok());
/// assert!(validate_unit_price(Money::from_cents(-1)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.cents() > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "unitPrice".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Validates a tax rate.
///
/// ## Rules
/// - Must be between 0 and 10000 bps (0% to 100%)
pub fn validate_tax_rate(rate: TaxRate) -> ValidationResult<()> {
    if rate.bps() > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "taxRate".to_string(),
            min: 0,
            max: 10000,
        });
    }
    Ok(())
}

/// Validates the number of days a quote stays valid.
pub fn validate_validity_days(days: i64) -> ValidationResult<()> {
    if days <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "validityDays".to_string(),
        });
    }
    if days > 365 {
        return Err(ValidationError::OutOfRange {
            field: "validityDays".to_string(),
            min: 1,
            max: 365,
        });
    }
    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates every field of an item row.
pub fn validate_item(item: &ItemRow) -> ValidationResult<()> {
    validate_description(&item.description)?;
    validate_quantity(item.quantity)?;
    validate_unit(&item.unit)?;
    validate_unit_price(item.unit_price)?;
    validate_tax_rate(item.tax_rate)
}

/// Validates the user-editable fields of any row.
pub fn validate_row(row: &Row) -> ValidationResult<()> {
    match row {
        Row::Section(s) => validate_title(&s.title),
        Row::Subsection(s) => validate_title(&s.title),
        Row::Item(item) => validate_item(item),
        Row::Text(t) => validate_free_text("freeText", &t.free_text),
        Row::PageBreak(_) => Ok(()),
    }
}

/// Validates a client before it is created.
///
/// ## Rules
/// - Name and phone are required
/// - Email, when present, must be well formed
pub fn validate_new_client(client: &NewClient) -> ValidationResult<()> {
    check_required("name", &client.name)?;
    check_length("name", &client.name, MAX_TITLE_LENGTH)?;
    check_required("phone", &client.phone)?;
    check_length("phone", &client.phone, 30)?;
    if let Some(email) = client.email.as_deref().filter(|e| !e.trim().is_empty()) {
        validate_email(email)?;
    }
    Ok(())
}

/// Validates a catalog item before it is created.
pub fn validate_new_catalog_item(item: &NewCatalogItem) -> ValidationResult<()> {
    check_required("description", &item.description)?;
    validate_description(&item.description)?;
    validate_quantity(item.quantity)?;
    validate_unit(&item.unit)?;
    validate_unit_price(item.unit_price)?;
    validate_tax_rate(item.tax_rate)
}

/// Validates a stored catalog item before it is copied into a quote.
pub fn validate_catalog_item(item: &CatalogItem) -> ValidationResult<()> {
    validate_description(&item.description)?;
    validate_quantity(item.quantity)?;
    validate_unit_price(item.unit_price)?;
    validate_tax_rate(item.tax_rate)
}

// =============================================================================
// Unit Tests
// =============================================================================
