//! # devis-core: Pure Quote Logic for Devis
//!
//! This crate holds everything that decides what a quote *is*: its rows,
//! their labels, their totals and the commands that change them. It has
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Devis Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/desktop (command layer)                    │   │
//! │  │   create_quote, insert_row, update_row_field, save_quote, ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ devis-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌───────────┐  ┌─────────────┐  ┌────────────┐  │   │
//! │  │   │  rows   │─►│ numbering │─►│ aggregation │─►│  summary   │  │   │
//! │  │   └─────────┘  └───────────┘  └─────────────┘  └────────────┘  │   │
//! │  │        ▲                                                        │   │
//! │  │   ┌────┴────┐  ┌───────────┐  ┌─────────────┐                  │   │
//! │  │   │ editor  │  │ document  │  │ validation  │                  │   │
//! │  │   └─────────┘  └───────────┘  └─────────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TIMERS • DETERMINISTIC             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                devis-db (Snapshot Store)                        │   │
//! │  │         clients, catalogItems, quotes as JSON snapshots         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Clients, catalog items, tax rates, quantities
//! - [`money`] - Money type with integer arithmetic
//! - [`rows`] - The row taxonomy (section, subsection, item, text, page break)
//! - [`numbering`] - Hierarchical labels (`1`, `1.1`, `-`)
//! - [`aggregation`] - Line totals, section subtotals, tax breakdown
//! - [`document`] - The persisted quote and its quote number
//! - [`editor`] - Insert / update / remove / reorder commands
//! - [`validation`] - Field rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use devis_core::{ItemRow, Money, Quantity, QuoteDocument, QuoteEditor, Row, TaxRate};
//!
//! let mut editor = QuoteEditor::new(QuoteDocument::new("D2026000001", Utc::now(), 30));
//! let ten_percent = TaxRate::from_bps(1000);
//!
//! editor.append_row(Row::section("Bathroom")).unwrap();
//! editor.append_row(Row::item(ItemRow::new("Tiles", Quantity::from_units(2), "m²", Money::from_cents(2500), ten_percent))).unwrap();
//! editor.append_row(Row::item(ItemRow::new("Labour", Quantity::from_units(1), "m²", Money::from_cents(3500), ten_percent))).unwrap();
//!
//! let summary = editor.summary();
//! assert_eq!(summary.total_pre_tax.to_string(), "85.00");
//! assert_eq!(summary.total_tax.to_string(), "8.50");
//! assert_eq!(summary.total_with_tax.to_string(), "93.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregation;
pub mod document;
pub mod editor;
pub mod error;
pub mod money;
pub mod numbering;
pub mod rows;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregation::{QuoteSummary, TaxLine};
pub use document::{QuoteDocument, QuoteNumber};
pub use editor::{QuoteEditor, RowField};
pub use error::{CoreError, CoreResult, QuoteIssue, ValidationError};
pub use money::Money;
pub use rows::{ItemRow, Row, RowKind};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Days a new quote stays valid unless configured otherwise.
pub const DEFAULT_VALIDITY_DAYS: i64 = 30;

/// Tax rate applied to new item rows unless configured otherwise (10%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1000;

/// Maximum length of section titles and client names.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length of an item description.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Maximum length of free text: text rows, notes, payment terms.
pub const MAX_NOTE_LENGTH: usize = 5000;

/// Highest accepted unit price, in cents (10 000 000.00).
pub const MAX_UNIT_PRICE_CENTS: i64 = 1_000_000_000;

/// Highest accepted quantity, in thousandths (1 000 000 units).
///
/// With [`MAX_UNIT_PRICE_CENTS`] a line total stays under 10^15 cents, so
/// thousands of lines still sum well inside an i64.
pub const MAX_QUANTITY_MILLI: i64 = 1_000_000_000;
