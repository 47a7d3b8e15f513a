//! # Domain Types
//!
//! Core record types used throughout Devis.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Client       │   │  CatalogItem    │   │  QuoteDocument  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  (document.rs)  │       │
//! │  │  id             │   │  id             │   │  client_id ─────┼──► Client
//! │  │  name, phone    │   │  description    │   │  rows           │       │
//! │  │  address        │   │  unit_price     │   │  summary        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │    Quantity     │   │  QuoteStatus    │       │
//! │  │  bps (u32)      │   │  milli (i64)    │   │  Draft, Sent    │       │
//! │  │  1000 = 10%     │   │  2500 = 2.5     │   │  Signed, Paid   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::{parse_scaled, Money};

/// Generates a new record or row identifier (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. 1000 bps = 10%, 550 bps = 5.5%.
/// Integer rates are totally ordered and hashable, so they can key the
/// tax breakdown directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

/// Parses a percentage such as `"10"`, `"5.5"` or `"20,00"`.
impl FromStr for TaxRate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ValidationError::InvalidFormat {
            field: "taxRate".to_string(),
            reason,
        };
        let bps = parse_scaled(s.trim_end_matches('%'), 2).map_err(invalid)?;
        let bps = u32::try_from(bps).map_err(|_| ValidationError::OutOfRange {
            field: "taxRate".to_string(),
            min: 0,
            max: 10000,
        })?;
        Ok(TaxRate(bps))
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// A quantity in thousandths of a unit.
///
/// Tradespeople quote fractional quantities (2.5 m², 1.75 h), so the
/// integer representation keeps three decimals exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * 1000)
    }

    /// Creates a quantity from thousandths of a unit.
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Returns the quantity in thousandths.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::from_units(1)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / 1000;
        let frac = abs % 1000;
        if frac == 0 {
            write!(f, "{}{}", sign, whole)
        } else {
            let digits = format!("{:03}", frac);
            write!(f, "{}{}.{}", sign, whole, digits.trim_end_matches('0'))
        }
    }
}

/// Parses user-entered quantities such as `"2"`, `"2.5"` or `"0,125"`.
impl FromStr for Quantity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled(s, 3)
            .map(Quantity)
            .map_err(|reason| ValidationError::InvalidFormat {
                field: "quantity".to_string(),
                reason,
            })
    }
}

// =============================================================================
// Client
// =============================================================================

/// Postal address. Every part is optional because clients are often
/// created from a phone call before the address is known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Address {
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
}

/// A customer a quote can be addressed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub company: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<Address>,
}

/// Client fields supplied by the user; the store generates the id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    pub company: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<Address>,
}

impl NewClient {
    /// Attaches an id, producing the stored record.
    pub fn into_client(self, id: String) -> Client {
        Client {
            id,
            name: self.name,
            company: self.company,
            phone: self.phone,
            email: self.email,
            address: self.address,
        }
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// A reusable priced line kept in the user's library.
///
/// Inserting one into a quote copies its values into a new item row;
/// later catalog edits do not affect existing quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogItem {
    pub id: String,
    pub description: String,
    pub quantity: Quantity,
    pub unit: String,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
}

/// Catalog fields supplied by the user; the store generates the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCatalogItem {
    pub description: String,
    pub quantity: Quantity,
    pub unit: String,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
}

impl NewCatalogItem {
    /// Attaches an id, producing the stored record.
    pub fn into_catalog_item(self, id: String) -> CatalogItem {
        CatalogItem {
            id,
            description: self.description,
            quantity: self.quantity,
            unit: self.unit,
            unit_price: self.unit_price,
            tax_rate: self.tax_rate,
        }
    }
}

// =============================================================================
// Quote Status & Site
// =============================================================================

/// Commercial status of a quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuoteStatus {
    /// Being written; not yet sent to the client.
    #[default]
    Draft,
    /// Sent to the client, awaiting an answer.
    Sent,
    /// Accepted and signed by the client.
    Signed,
    /// Work invoiced and paid.
    Paid,
}

/// The work site, when it differs from the client's address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Site {
    pub name: Option<String>,
    pub address: Address,
}

// =============================================================================
// Unit Tests
// =============================================================================
