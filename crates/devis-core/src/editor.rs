//! # Quote Editor
//!
//! The only way to change a quote's rows. Every command either applies
//! completely or returns an error with the document untouched.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Editor Commands                                      │
//! │                                                                         │
//! │  Command              Renumber   Re-aggregate   Version                 │
//! │  ──────────────────   ────────   ────────────   ───────                 │
//! │  insert_row              ✓            ✓           +1                    │
//! │  remove_row              ✓            ✓           +1 (if found)         │
//! │  reorder_rows            ✓            ✓           +1                    │
//! │  update_row_field                     ✓           +1                    │
//! │  set_client, set_notes, …                         +1                    │
//! │                                                                         │
//! │  On error: nothing changes, version stays.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use chrono::Utc;
//! use devis_core::document::QuoteDocument;
//! use devis_core::editor::{QuoteEditor, RowField};
//! use devis_core::rows::Row;
//!
//! let doc = QuoteDocument::new("D2026000001", Utc::now(), 30);
//! let mut editor = QuoteEditor::new(doc);
//!
//! editor.append_row(Row::section("Bathroom")).unwrap();
//! let item_id = editor.append_row(Row::item(Default::default())).unwrap().rows[1].id().to_string();
//! editor.update_row_field(&item_id, RowField::parse("unitPrice", "25").unwrap()).unwrap();
//!
//! assert_eq!(editor.summary().total_pre_tax.cents(), 2500);
//! ```

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::aggregation::QuoteSummary;
use crate::document::QuoteDocument;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::rows::{ItemRow, Row};
use crate::types::{CatalogItem, Quantity, QuoteStatus, Site, TaxRate};
use crate::validation;

// =============================================================================
// Row Field
// =============================================================================

/// A typed edit to one field of one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowField {
    /// Section or subsection title.
    Title(String),
    Description(String),
    Quantity(Quantity),
    Unit(String),
    UnitPrice(Money),
    TaxRate(TaxRate),
    /// Body of a text row.
    FreeText(String),
}

impl RowField {
    /// Wire name of the field, as used by the UI.
    pub const fn name(&self) -> &'static str {
        match self {
            RowField::Title(_) => "title",
            RowField::Description(_) => "description",
            RowField::Quantity(_) => "quantity",
            RowField::Unit(_) => "unit",
            RowField::UnitPrice(_) => "unitPrice",
            RowField::TaxRate(_) => "taxRate",
            RowField::FreeText(_) => "freeText",
        }
    }

    /// Parses a field name and the raw text typed by the user.
    ///
    /// Numeric fields go through the strict parsers: `"abc"` or `"1e3"`
    /// is rejected instead of silently becoming zero.
    ///
    /// ## Example
    /// ```rust
    /// use devis_core::editor::RowField;
    /// use devis_core::money::Money;
    ///
    /// assert_eq!(
    ///     RowField::parse("unitPrice", "12,50").unwrap(),
    ///     RowField::UnitPrice(Money::from_cents(1250))
    /// );
    /// assert!(RowField::parse("unitPrice", "douze").is_err());
    /// assert!(RowField::parse("colour", "red").is_err());
    /// ```
    pub fn parse(name: &str, raw: &str) -> CoreResult<RowField> {
        let field = match name {
            "title" => RowField::Title(raw.to_string()),
            "description" => RowField::Description(raw.to_string()),
            "quantity" => RowField::Quantity(raw.parse()?),
            "unit" => RowField::Unit(raw.trim().to_string()),
            "unitPrice" => {
                let price: Money = raw.parse().map_err(|_| ValidationError::InvalidFormat {
                    field: "unitPrice".to_string(),
                    reason: format!("'{}' is not an amount", raw.trim()),
                })?;
                RowField::UnitPrice(price)
            }
            "taxRate" => RowField::TaxRate(raw.parse()?),
            "freeText" => RowField::FreeText(raw.to_string()),
            other => {
                return Err(ValidationError::InvalidFormat {
                    field: "field".to_string(),
                    reason: format!("unknown row field '{}'", other),
                }
                .into())
            }
        };
        Ok(field)
    }

    /// Checks the value itself, independently of the row it targets.
    fn validate(&self) -> CoreResult<()> {
        match self {
            RowField::Title(title) => validation::validate_title(title)?,
            RowField::Description(text) => validation::validate_description(text)?,
            RowField::Quantity(qty) => validation::validate_quantity(*qty)?,
            RowField::Unit(unit) => validation::validate_unit(unit)?,
            RowField::UnitPrice(price) => validation::validate_unit_price(*price)?,
            RowField::TaxRate(rate) => validation::validate_tax_rate(*rate)?,
            RowField::FreeText(text) => validation::validate_free_text("freeText", text)?,
        }
        Ok(())
    }

    /// Writes the value into `row`, or reports that the row's role has no
    /// such field.
    fn apply(self, row: &mut Row) -> CoreResult<()> {
        let field = self.name();
        match (row, self) {
            (Row::Section(s), RowField::Title(title)) => s.title = title,
            (Row::Subsection(s), RowField::Title(title)) => s.title = title,
            (Row::Item(item), RowField::Description(text)) => item.description = text,
            (Row::Item(item), RowField::Quantity(qty)) => item.quantity = qty,
            (Row::Item(item), RowField::Unit(unit)) => item.unit = unit,
            (Row::Item(item), RowField::UnitPrice(price)) => item.unit_price = price,
            (Row::Item(item), RowField::TaxRate(rate)) => item.tax_rate = rate,
            (Row::Text(text), RowField::FreeText(body)) => text.free_text = body,
            (row, _) => {
                return Err(CoreError::FieldNotApplicable {
                    field,
                    row_type: row.kind().as_str(),
                })
            }
        }
        Ok(())
    }
}

// =============================================================================
// Quote Editor
// =============================================================================

/// Owns one quote during an edit session.
///
/// Labels and totals are refreshed inside each row command, so `document()`
/// and `summary()` are always consistent with the rows.
#[derive(Debug, Clone)]
pub struct QuoteEditor {
    document: QuoteDocument,
    version: u64,
}

impl QuoteEditor {
    /// Starts an edit session. Labels and totals are recomputed first, so a
    /// document loaded with stale values is consistent from the start.
    pub fn new(mut document: QuoteDocument) -> Self {
        document.refresh();
        QuoteEditor {
            document,
            version: 0,
        }
    }

    pub fn document(&self) -> &QuoteDocument {
        &self.document
    }

    pub fn into_document(self) -> QuoteDocument {
        self.document
    }

    pub fn id(&self) -> &str {
        &self.document.id
    }

    /// Incremented by every successful mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Totals for the current version. Computed once by the command that
    /// produced the version; reading never recomputes.
    pub fn summary(&self) -> &QuoteSummary {
        &self.document.summary
    }

    // -------------------------------------------------------------------------
    // Row commands
    // -------------------------------------------------------------------------

    /// Inserts `row` at `position`, clamped to `[0, len]`.
    pub fn insert_row(&mut self, position: usize, row: Row) -> CoreResult<&QuoteDocument> {
        if self.document.find_row(row.id()).is_some() {
            return Err(CoreError::DuplicateRowId(row.id().to_string()));
        }
        validation::validate_row(&row)?;

        let position = position.min(self.document.rows.len());
        debug!(
            quote_id = %self.document.id,
            row_id = %row.id(),
            kind = %row.kind(),
            position,
            "Inserting row"
        );
        self.document.rows.insert(position, row);
        Ok(self.structural_change())
    }

    /// Appends `row` after the last row.
    pub fn append_row(&mut self, row: Row) -> CoreResult<&QuoteDocument> {
        self.insert_row(self.document.rows.len(), row)
    }

    /// Copies a catalog entry into a new item row at `position`.
    pub fn insert_catalog_item(
        &mut self,
        position: usize,
        item: &CatalogItem,
    ) -> CoreResult<&QuoteDocument> {
        validation::validate_catalog_item(item)?;
        self.insert_row(position, Row::item(ItemRow::from_catalog(item)))
    }

    /// Removes the row with `id`. Removing an unknown id is a no-op.
    pub fn remove_row(&mut self, id: &str) -> &QuoteDocument {
        match self.document.position_of(id) {
            Some(index) => {
                let removed = self.document.rows.remove(index);
                debug!(quote_id = %self.document.id, row_id = id, kind = %removed.kind(), "Removed row");
                self.structural_change()
            }
            None => &self.document,
        }
    }

    /// Changes one field of one row. Labels are left alone since no field
    /// edit moves a row.
    pub fn update_row_field(&mut self, id: &str, field: RowField) -> CoreResult<&QuoteDocument> {
        let index = self
            .document
            .position_of(id)
            .ok_or_else(|| CoreError::RowNotFound(id.to_string()))?;
        field.validate()?;

        debug!(quote_id = %self.document.id, row_id = id, field = field.name(), "Updating row field");
        field.apply(&mut self.document.rows[index])?;
        self.document.reaggregate();
        self.bump();
        Ok(&self.document)
    }

    /// Rearranges the rows into the order given by `ids`.
    ///
    /// `ids` must name every current row exactly once.
    pub fn reorder_rows(&mut self, ids: &[String]) -> CoreResult<&QuoteDocument> {
        if ids.len() != self.document.rows.len() {
            return Err(CoreError::InvalidOrder {
                reason: format!(
                    "expected {} row ids, got {}",
                    self.document.rows.len(),
                    ids.len()
                ),
            });
        }

        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(id.as_str()) {
                return Err(CoreError::InvalidOrder {
                    reason: format!("row id '{}' appears more than once", id),
                });
            }
            if self.document.find_row(id).is_none() {
                return Err(CoreError::InvalidOrder {
                    reason: format!("row id '{}' is not in this quote", id),
                });
            }
        }

        let mut by_id: HashMap<String, Row> = self
            .document
            .rows
            .drain(..)
            .map(|row| (row.id().to_string(), row))
            .collect();
        self.document.rows = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        debug!(quote_id = %self.document.id, rows = ids.len(), "Reordered rows");
        Ok(self.structural_change())
    }

    // -------------------------------------------------------------------------
    // Header commands
    // -------------------------------------------------------------------------

    /// Assigns (or clears) the client.
    pub fn set_client(&mut self, client_id: Option<String>) -> &QuoteDocument {
        self.document.client_id = client_id.filter(|id| !id.trim().is_empty());
        self.bump();
        &self.document
    }

    pub fn set_site(&mut self, site: Option<Site>) -> &QuoteDocument {
        self.document.site = site;
        self.bump();
        &self.document
    }

    pub fn set_status(&mut self, status: QuoteStatus) -> &QuoteDocument {
        debug!(quote_id = %self.document.id, ?status, "Status changed");
        self.document.status = status;
        self.bump();
        &self.document
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) -> CoreResult<&QuoteDocument> {
        let notes = notes.into();
        validation::validate_free_text("notes", &notes)?;
        self.document.notes = notes;
        self.bump();
        Ok(&self.document)
    }

    pub fn set_payment_terms(&mut self, terms: impl Into<String>) -> CoreResult<&QuoteDocument> {
        let terms = terms.into();
        validation::validate_free_text("paymentTerms", &terms)?;
        self.document.payment_terms = terms;
        self.bump();
        Ok(&self.document)
    }

    pub fn set_payment_methods(&mut self, methods: impl Into<String>) -> CoreResult<&QuoteDocument> {
        let methods = methods.into();
        validation::validate_free_text("paymentMethods", &methods)?;
        self.document.payment_methods = methods;
        self.bump();
        Ok(&self.document)
    }

    pub fn set_waste_management(&mut self, text: impl Into<String>) -> CoreResult<&QuoteDocument> {
        let text = text.into();
        validation::validate_free_text("wasteManagement", &text)?;
        self.document.waste_management = text;
        self.bump();
        Ok(&self.document)
    }

    /// Sets the planned start date and duration (e.g. "2 semaines").
    pub fn set_work_schedule(
        &mut self,
        start: Option<NaiveDate>,
        duration: Option<String>,
    ) -> CoreResult<&QuoteDocument> {
        if let Some(duration) = &duration {
            validation::validate_title(duration).map_err(|_| ValidationError::TooLong {
                field: "workDuration".to_string(),
                max: crate::MAX_TITLE_LENGTH,
            })?;
        }
        self.document.work_start_date = start;
        self.document.work_duration = duration;
        self.bump();
        Ok(&self.document)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn structural_change(&mut self) -> &QuoteDocument {
        self.document.refresh();
        self.bump();
        &self.document
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn empty_editor() -> QuoteEditor {
        QuoteEditor::new(QuoteDocument::new("D2026000001", Utc::now(), 30))
    }

    fn item(qty: i64, price_cents: i64, rate_bps: u32) -> Row {
        Row::item(ItemRow::new(
            "item",
            Quantity::from_units(qty),
            "u",
            Money::from_cents(price_cents),
            TaxRate::from_bps(rate_bps),
        ))
    }

    fn labels(editor: &QuoteEditor) -> Vec<String> {
        editor
            .document()
            .rows
            .iter()
            .map(|r| r.label().to_string())
            .collect()
    }

    fn ids(editor: &QuoteEditor) -> Vec<String> {
        editor
            .document()
            .rows
            .iter()
            .map(|r| r.id().to_string())
            .collect()
    }

    #[test]
    fn test_bathroom_scenario() {
        let mut editor = empty_editor();
        editor.append_row(Row::section("Bathroom")).unwrap();
        editor.append_row(item(2, 2500, 1000)).unwrap();
        editor.append_row(item(1, 3500, 1000)).unwrap();

        let summary = editor.summary().clone();
        assert_eq!(summary.total_pre_tax.cents(), 8500);
        assert_eq!(summary.total_tax.cents(), 850);
        assert_eq!(summary.total_with_tax.cents(), 9350);
        assert_eq!(labels(&editor), vec!["1", "1.1", "1.2"]);
    }

    #[test]
    fn test_insert_clamps_position() {
        let mut editor = empty_editor();
        editor.insert_row(99, Row::section("A")).unwrap();
        editor.insert_row(99, item(1, 100, 0)).unwrap();
        editor.insert_row(0, Row::text("top")).unwrap();

        assert_eq!(editor.document().rows[0].kind().as_str(), "text");
        assert_eq!(labels(&editor), vec!["-", "1", "1.1"]);
        assert_eq!(editor.version(), 3);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut editor = empty_editor();
        let row = Row::section("A");
        editor.append_row(row.clone()).unwrap();

        let err = editor.append_row(row).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateRowId(_)));
        assert_eq!(editor.document().rows.len(), 1);
        assert_eq!(editor.version(), 1);
    }

    #[test]
    fn test_insert_rejects_invalid_values() {
        let mut editor = empty_editor();
        let err = editor.append_row(item(-1, 100, 1000)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = editor.append_row(item(1, 100, 20000)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(editor.document().rows.is_empty());
    }

    #[test]
    fn test_appended_section_gets_next_label() {
        let mut editor = empty_editor();
        editor.append_row(Row::section("A")).unwrap();
        editor.append_row(item(1, 100, 1000)).unwrap();
        editor.append_row(Row::section("B")).unwrap();
        editor.append_row(Row::section("C")).unwrap();
        editor.append_row(item(1, 100, 1000)).unwrap();

        assert_eq!(labels(&editor), vec!["1", "1.1", "2", "3", "3.1"]);
    }

    #[test]
    fn test_line_totals_hold_after_every_structural_change() {
        let mut editor = empty_editor();
        editor.append_row(Row::section("A")).unwrap();
        editor.append_row(item(3, 1234, 550)).unwrap();
        editor.insert_row(1, item(2, 999, 2000)).unwrap();
        let first = editor.document().rows[1].id().to_string();
        editor.remove_row(&first);

        for row in &editor.document().rows {
            if let Some(i) = row.as_item() {
                assert_eq!(i.line_total, i.unit_price.multiply_quantity(i.quantity));
            }
        }
        assert_eq!(editor.summary().total_pre_tax.cents(), 3702);
    }

    #[test]
    fn test_remove_missing_row_is_noop() {
        let mut editor = empty_editor();
        editor.append_row(Row::section("A")).unwrap();
        let before = editor.document().clone();

        editor.remove_row("missing");
        assert_eq!(editor.document(), &before);
        assert_eq!(editor.version(), 1);
    }

    #[test]
    fn test_remove_renumbers() {
        let mut editor = empty_editor();
        editor.append_row(Row::section("A")).unwrap();
        editor.append_row(item(1, 100, 1000)).unwrap();
        editor.append_row(Row::section("B")).unwrap();
        editor.append_row(item(1, 200, 1000)).unwrap();

        let first_section = editor.document().rows[0].id().to_string();
        editor.remove_row(&first_section);

        assert_eq!(labels(&editor), vec!["-", "1", "1.1"]);
        assert_eq!(editor.summary().unsectioned_total.cents(), 100);
    }

    #[test]
    fn test_update_row_field() {
        let mut editor = empty_editor();
        editor.append_row(Row::section("A")).unwrap();
        editor.append_row(item(1, 100, 1000)).unwrap();
        let item_id = editor.document().rows[1].id().to_string();

        editor
            .update_row_field(&item_id, RowField::Quantity(Quantity::from_milli(2500)))
            .unwrap();
        editor
            .update_row_field(&item_id, RowField::parse("unitPrice", "40").unwrap())
            .unwrap();

        let doc = editor.document();
        assert_eq!(doc.rows[1].as_item().map(|i| i.line_total.cents()), Some(10000));
        assert_eq!(doc.summary.total_with_tax.cents(), 11000);
        assert_eq!(labels(&editor), vec!["1", "1.1"]);
    }

    #[test]
    fn test_update_missing_row() {
        let mut editor = empty_editor();
        let err = editor
            .update_row_field("ghost", RowField::Title("x".to_string()))
            .unwrap_err();
        assert!(matches!(err, CoreError::RowNotFound(id) if id == "ghost"));
    }

    #[test]
    fn test_update_field_not_applicable() {
        let mut editor = empty_editor();
        editor.append_row(Row::text("note")).unwrap();
        let text_id = editor.document().rows[0].id().to_string();

        let err = editor
            .update_row_field(&text_id, RowField::UnitPrice(Money::from_cents(100)))
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::FieldNotApplicable { field: "unitPrice", row_type: "text" }
        ));
        assert_eq!(editor.version(), 1);
    }

    #[test]
    fn test_update_rejects_invalid_value_and_keeps_state() {
        let mut editor = empty_editor();
        editor.append_row(Row::section("A")).unwrap();
        editor.append_row(item(1, 100, 1000)).unwrap();
        let item_id = editor.document().rows[1].id().to_string();
        let before = editor.document().clone();

        let err = editor
            .update_row_field(&item_id, RowField::UnitPrice(Money::from_cents(-5)))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(editor.document(), &before);
    }

    #[test]
    fn test_update_rejects_oversized_amounts_and_keeps_state() {
        let mut editor = empty_editor();
        editor.append_row(Row::section("A")).unwrap();
        editor.append_row(item(1, 100, 1000)).unwrap();
        let item_id = editor.document().rows[1].id().to_string();
        let before = editor.document().clone();
        let version = editor.version();

        let price = RowField::parse("unitPrice", "90000000000000000").unwrap();
        let err = editor.update_row_field(&item_id, price).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let qty = RowField::parse("quantity", "1000000.001").unwrap();
        let err = editor.update_row_field(&item_id, qty).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        assert_eq!(editor.document(), &before);
        assert_eq!(editor.version(), version);
        assert_eq!(editor.summary().total_pre_tax.cents(), 100);
    }

    #[test]
    fn test_largest_accepted_amounts_keep_totals_exact() {
        let mut editor = empty_editor();
        let largest = || {
            Row::item(ItemRow::new(
                "item",
                Quantity::from_milli(crate::MAX_QUANTITY_MILLI),
                "u",
                Money::from_cents(crate::MAX_UNIT_PRICE_CENTS),
                TaxRate::from_bps(10000),
            ))
        };
        editor.append_row(largest()).unwrap();
        editor.append_row(largest()).unwrap();

        let line = crate::MAX_UNIT_PRICE_CENTS * (crate::MAX_QUANTITY_MILLI / 1000);
        let summary = editor.summary();
        assert_eq!(summary.total_pre_tax.cents(), 2 * line);
        assert_eq!(summary.total_with_tax.cents(), 4 * line);
    }

    #[test]
    fn test_row_field_parse() {
        assert_eq!(
            RowField::parse("quantity", "2,5").unwrap(),
            RowField::Quantity(Quantity::from_milli(2500))
        );
        assert_eq!(
            RowField::parse("taxRate", "5.5").unwrap(),
            RowField::TaxRate(TaxRate::from_bps(550))
        );
        assert!(RowField::parse("quantity", "two").is_err());
        assert!(RowField::parse("unitPrice", "").is_err());
        assert!(RowField::parse("label", "1.1").is_err());
    }

    #[test]
    fn test_reorder_permutation() {
        let mut editor = empty_editor();
        editor.append_row(Row::section("A")).unwrap();
        editor.append_row(item(1, 100, 1000)).unwrap();
        editor.append_row(Row::section("B")).unwrap();
        editor.append_row(item(2, 300, 2000)).unwrap();

        let mut order = ids(&editor);
        order.swap(0, 2);
        order.swap(1, 3);
        let moved_item = editor.document().rows[3].as_item().cloned().unwrap();

        editor.reorder_rows(&order).unwrap();

        assert_eq!(ids(&editor), order);
        assert_eq!(labels(&editor), vec!["1", "1.1", "2", "2.1"]);
        let item = editor.document().rows[1].as_item().unwrap();
        assert_eq!(item.description, moved_item.description);
        assert_eq!(item.unit_price, moved_item.unit_price);
        assert_eq!(item.tax_rate, moved_item.tax_rate);
    }

    #[test]
    fn test_reorder_rejects_non_permutations() {
        let mut editor = empty_editor();
        editor.append_row(Row::section("A")).unwrap();
        editor.append_row(item(1, 100, 1000)).unwrap();
        let before = editor.document().clone();
        let current = ids(&editor);

        let missing = vec![current[0].clone()];
        let duplicated = vec![current[0].clone(), current[0].clone()];
        let foreign = vec![current[0].clone(), "foreign".to_string()];

        for order in [missing, duplicated, foreign] {
            let err = editor.reorder_rows(&order).unwrap_err();
            assert!(matches!(err, CoreError::InvalidOrder { .. }));
            assert_eq!(editor.document(), &before);
        }
    }

    #[test]
    fn test_insert_catalog_item() {
        let mut editor = empty_editor();
        editor.append_row(Row::section("Salle de bain")).unwrap();
        let catalog = CatalogItem {
            id: "1".to_string(),
            description: "Carrelage sol standard".to_string(),
            quantity: Quantity::from_units(1),
            unit: "m²".to_string(),
            unit_price: Money::from_cents(3500),
            tax_rate: TaxRate::from_bps(1000),
        };

        editor.insert_catalog_item(1, &catalog).unwrap();
        editor.insert_catalog_item(2, &catalog).unwrap();

        assert_eq!(editor.document().item_count(), 2);
        assert_ne!(editor.document().rows[1].id(), editor.document().rows[2].id());
        assert_eq!(editor.summary().total_with_tax.cents(), 7700);
    }

    #[test]
    fn test_header_commands() {
        let mut editor = empty_editor();
        editor.set_client(Some("1".to_string()));
        editor.set_status(QuoteStatus::Sent);
        editor.set_notes("Accès par la cour").unwrap();
        editor.set_payment_terms("30% à la commande").unwrap();
        editor
            .set_work_schedule(NaiveDate::from_ymd_opt(2026, 5, 4), Some("2 semaines".to_string()))
            .unwrap();

        let doc = editor.document();
        assert_eq!(doc.client_id.as_deref(), Some("1"));
        assert_eq!(doc.status, QuoteStatus::Sent);
        assert_eq!(doc.notes, "Accès par la cour");
        assert_eq!(doc.work_duration.as_deref(), Some("2 semaines"));
        assert_eq!(editor.version(), 5);

        editor.set_client(Some(" ".to_string()));
        assert!(editor.document().client_id.is_none());
    }

    #[test]
    fn test_summary_is_stable_between_mutations() {
        let mut editor = empty_editor();
        editor.append_row(Row::section("A")).unwrap();
        editor.append_row(item(2, 2500, 1000)).unwrap();

        let first = editor.summary().clone();
        let second = editor.summary().clone();
        assert_eq!(first, second);
        assert_eq!(editor.version(), 2);
    }

    #[test]
    fn test_new_refreshes_loaded_document() {
        let mut doc = QuoteDocument::new("D2026000001", Utc::now(), 30);
        doc.rows = vec![Row::section("A"), item(2, 2500, 1000)];

        let mut editor = QuoteEditor::new(doc);
        assert_eq!(labels(&editor), vec!["1", "1.1"]);
        assert_eq!(editor.summary().total_pre_tax.cents(), 5000);
    }
}
