//! # Quote Rows
//!
//! The row taxonomy of a quote body.
//!
//! ## Row Roles
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  #     Désignation                    Qté   Unité   P.U. HT   Total HT  │
//! │ ─────────────────────────────────────────────────────────────────────── │
//! │  1     Salle de bain                                            85.00   │ ◄ Section
//! │  -     Dépose de l'existant comprise                                    │ ◄ Text
//! │  1.1   Carrelage sol standard          2     m²     25.00      50.00   │ ◄ Item
//! │  1.2   Mur douche                                                       │ ◄ Subsection
//! │  1.3   Main d'œuvre pose               1     m²     35.00      35.00   │ ◄ Item
//! │  ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─  │ ◄ PageBreak
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each role is its own struct, so a text row can never carry a unit price.
//! Labels and computed totals are written by the numbering and aggregation
//! passes; callers never set them.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{generate_id, CatalogItem, Quantity, TaxRate};

/// Label shown for rows that take no position number.
pub const PLACEHOLDER_LABEL: &str = "-";

// =============================================================================
// Row
// =============================================================================

/// One line in the quote body.
///
/// Serialized with an internal `type` tag:
/// ```json
/// { "type": "item", "id": "…", "label": "1.1", "description": "Carrelage", … }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "lowercase")]
#[ts(export)]
pub enum Row {
    Section(SectionRow),
    Subsection(SubsectionRow),
    Item(ItemRow),
    Text(TextRow),
    PageBreak(PageBreakRow),
}

/// Section header; owns the subtotal of the items that follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SectionRow {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub title: String,
    #[serde(default)]
    pub subtotal: Money,
}

/// Nested heading inside a section. Has no subtotal of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubsectionRow {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub title: String,
}

/// A priced line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemRow {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub description: String,
    pub quantity: Quantity,
    pub unit: String,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
    /// `quantity × unit_price`, refreshed on every aggregation pass.
    #[serde(default)]
    pub line_total: Money,
}

/// Free-form annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TextRow {
    pub id: String,
    pub free_text: String,
}

/// Forces a new page in the printed quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PageBreakRow {
    pub id: String,
}

/// Row role without payload, for logging and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Section,
    Subsection,
    Item,
    Text,
    PageBreak,
}

impl RowKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RowKind::Section => "section",
            RowKind::Subsection => "subsection",
            RowKind::Item => "item",
            RowKind::Text => "text",
            RowKind::PageBreak => "pagebreak",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ItemRow {
    /// Creates an item row with a fresh id. Label and line total are
    /// filled in by the editor.
    pub fn new(
        description: impl Into<String>,
        quantity: Quantity,
        unit: impl Into<String>,
        unit_price: Money,
        tax_rate: TaxRate,
    ) -> Self {
        ItemRow {
            id: generate_id(),
            label: String::new(),
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            tax_rate,
            line_total: Money::zero(),
        }
    }

    /// Copies a catalog entry into a new item row.
    pub fn from_catalog(item: &CatalogItem) -> Self {
        ItemRow::new(
            item.description.clone(),
            item.quantity,
            item.unit.clone(),
            item.unit_price,
            item.tax_rate,
        )
    }

    /// Computes `quantity × unit_price` from the current fields.
    #[inline]
    pub fn compute_line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

impl Default for ItemRow {
    /// An empty single-unit item at 0.00, 0%.
    fn default() -> Self {
        ItemRow::new("", Quantity::from_units(1), "u", Money::zero(), TaxRate::zero())
    }
}

impl Row {
    /// New section header.
    pub fn section(title: impl Into<String>) -> Self {
        Row::Section(SectionRow {
            id: generate_id(),
            label: String::new(),
            title: title.into(),
            subtotal: Money::zero(),
        })
    }

    /// New subsection heading.
    pub fn subsection(title: impl Into<String>) -> Self {
        Row::Subsection(SubsectionRow {
            id: generate_id(),
            label: String::new(),
            title: title.into(),
        })
    }

    /// New priced item.
    pub fn item(item: ItemRow) -> Self {
        Row::Item(item)
    }

    /// New free-text row.
    pub fn text(free_text: impl Into<String>) -> Self {
        Row::Text(TextRow {
            id: generate_id(),
            free_text: free_text.into(),
        })
    }

    /// New page break.
    pub fn page_break() -> Self {
        Row::PageBreak(PageBreakRow { id: generate_id() })
    }

    pub fn id(&self) -> &str {
        match self {
            Row::Section(s) => &s.id,
            Row::Subsection(s) => &s.id,
            Row::Item(i) => &i.id,
            Row::Text(t) => &t.id,
            Row::PageBreak(p) => &p.id,
        }
    }

    /// Display label. Text rows and page breaks always show the placeholder.
    pub fn label(&self) -> &str {
        match self {
            Row::Section(s) => &s.label,
            Row::Subsection(s) => &s.label,
            Row::Item(i) => &i.label,
            Row::Text(_) | Row::PageBreak(_) => PLACEHOLDER_LABEL,
        }
    }

    pub fn kind(&self) -> RowKind {
        match self {
            Row::Section(_) => RowKind::Section,
            Row::Subsection(_) => RowKind::Subsection,
            Row::Item(_) => RowKind::Item,
            Row::Text(_) => RowKind::Text,
            Row::PageBreak(_) => RowKind::PageBreak,
        }
    }

    pub fn as_item(&self) -> Option<&ItemRow> {
        match self {
            Row::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn is_item(&self) -> bool {
        matches!(self, Row::Item(_))
    }

    /// Sets the label on rows that carry one; no-op for text and page breaks.
    pub(crate) fn set_label(&mut self, label: String) {
        match self {
            Row::Section(s) => s.label = label,
            Row::Subsection(s) => s.label = label,
            Row::Item(i) => i.label = label,
            Row::Text(_) | Row::PageBreak(_) => {}
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_page_break_use_placeholder_label() {
        assert_eq!(Row::text("Note").label(), PLACEHOLDER_LABEL);
        assert_eq!(Row::page_break().label(), PLACEHOLDER_LABEL);

        let mut text = Row::text("Note");
        text.set_label("9".to_string());
        assert_eq!(text.label(), PLACEHOLDER_LABEL);
    }

    #[test]
    fn test_constructors_generate_distinct_ids() {
        let a = Row::section("A");
        let b = Row::section("A");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.kind(), RowKind::Section);
    }

    #[test]
    fn test_item_line_total() {
        let item = ItemRow::new(
            "Carrelage",
            Quantity::from_units(2),
            "m²",
            Money::from_cents(2500),
            TaxRate::from_bps(1000),
        );
        assert_eq!(item.compute_line_total().cents(), 5000);
    }

    #[test]
    fn test_from_catalog_copies_values() {
        let catalog = CatalogItem {
            id: "4".to_string(),
            description: "Installation douche à l'italienne".to_string(),
            quantity: Quantity::from_units(1),
            unit: "u".to_string(),
            unit_price: Money::from_cents(85000),
            tax_rate: TaxRate::from_bps(1000),
        };
        let item = ItemRow::from_catalog(&catalog);

        assert_ne!(item.id, catalog.id);
        assert_eq!(item.description, catalog.description);
        assert_eq!(item.unit_price, catalog.unit_price);
        assert_eq!(item.tax_rate, catalog.tax_rate);
    }

    #[test]
    fn test_row_serializes_with_type_tag() {
        let row = Row::Text(TextRow {
            id: "t-1".to_string(),
            free_text: "Modifier le texte libre".to_string(),
        });
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["freeText"], "Modifier le texte libre");

        let page_break = serde_json::to_value(Row::page_break()).unwrap();
        assert_eq!(page_break["type"], "pagebreak");

        let back: Row = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);
    }
}
