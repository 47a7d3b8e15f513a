//! # Quote Document
//!
//! The persisted unit of work: header fields, the ordered row list and the
//! computed summary.
//!
//! ## Document Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  QuoteDocument::with_skeleton()                                         │
//! │       │   1 section, 1 text row, 2 placeholder items                    │
//! │       ▼                                                                 │
//! │  QuoteEditor (editor.rs) ◄──── insert / update / remove / reorder       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_for_save() ──── issues? ──► ValidationFailed, stays editable  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SnapshotStore::save_quote() (devis-db)                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::aggregation::{aggregate, QuoteSummary};
use crate::error::{CoreError, CoreResult, QuoteIssue, ValidationError};
use crate::money::Money;
use crate::numbering::renumber;
use crate::rows::{ItemRow, Row};
use crate::types::{generate_id, QuoteStatus, Site, TaxRate, Quantity};

/// Title of the section a new quote starts with.
pub const DEFAULT_SECTION_TITLE: &str = "Titre section";

/// Text of the free-text row a new quote starts with.
pub const DEFAULT_FREE_TEXT: &str = "Modifier le texte libre";

/// Description of the first placeholder item.
pub const DEFAULT_ITEM_PROMPT: &str = "Ajouter ou rechercher dans la bibliothèque...";

/// Payment methods printed on a new quote.
pub const DEFAULT_PAYMENT_METHODS: &str = "Chèque, Espèces";

// =============================================================================
// Quote Number
// =============================================================================

/// Human quote number: `D` + year + six-digit sequence.
///
/// ## Example
/// ```rust
/// use devis_core::document::QuoteNumber;
///
/// let number = QuoteNumber::new(2026, 1);
/// assert_eq!(number.to_string(), "D2026000001");
///
/// let parsed: QuoteNumber = "D2026000042".parse().unwrap();
/// assert_eq!(parsed.sequence(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuoteNumber {
    year: i32,
    sequence: u32,
}

impl QuoteNumber {
    pub const fn new(year: i32, sequence: u32) -> Self {
        QuoteNumber { year, sequence }
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The number that follows this one in the same year.
    pub const fn next(&self) -> Self {
        QuoteNumber::new(self.year, self.sequence + 1)
    }
}

impl fmt::Display for QuoteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}{:06}", self.year, self.sequence)
    }
}

impl FromStr for QuoteNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "number".to_string(),
            reason: "expected D + year + 6-digit sequence".to_string(),
        };

        let digits = s.strip_prefix('D').ok_or_else(invalid)?;
        if digits.len() != 10 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let year = digits[..4].parse().map_err(|_| invalid())?;
        let sequence = digits[4..].parse().map_err(|_| invalid())?;
        Ok(QuoteNumber::new(year, sequence))
    }
}

// =============================================================================
// Quote Document
// =============================================================================

/// A complete quote as persisted in the `quotes` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuoteDocument {
    pub id: String,
    /// Human quote number, e.g. `D2026000001`.
    pub number: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub valid_until: DateTime<Utc>,
    #[serde(default)]
    pub status: QuoteStatus,
    pub client_id: Option<String>,
    #[serde(default)]
    pub site: Option<Site>,
    pub rows: Vec<Row>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub payment_terms: String,
    #[serde(default)]
    pub payment_methods: String,
    #[serde(default)]
    pub waste_management: String,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub work_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub work_duration: Option<String>,
    /// Derived from `rows`; rewritten by every aggregation pass.
    #[serde(default)]
    pub summary: QuoteSummary,
}

impl QuoteDocument {
    /// Creates a document with no rows.
    pub fn new(number: impl Into<String>, created_at: DateTime<Utc>, validity_days: i64) -> Self {
        QuoteDocument {
            id: generate_id(),
            number: number.into(),
            created_at,
            valid_until: created_at + Duration::days(validity_days),
            status: QuoteStatus::Draft,
            client_id: None,
            site: None,
            rows: Vec::new(),
            notes: String::new(),
            payment_terms: String::new(),
            payment_methods: DEFAULT_PAYMENT_METHODS.to_string(),
            waste_management: String::new(),
            work_start_date: None,
            work_duration: None,
            summary: QuoteSummary::default(),
        }
    }

    /// Creates a document pre-filled with the starter rows a user edits
    /// from: one section, one free-text row and two zero-priced items.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use devis_core::document::QuoteDocument;
    /// use devis_core::types::TaxRate;
    ///
    /// let doc = QuoteDocument::with_skeleton("D2026000001", Utc::now(), 30, TaxRate::from_bps(1000));
    /// let labels: Vec<&str> = doc.rows.iter().map(|r| r.label()).collect();
    /// assert_eq!(labels, vec!["1", "-", "1.1", "1.2"]);
    /// ```
    pub fn with_skeleton(
        number: impl Into<String>,
        created_at: DateTime<Utc>,
        validity_days: i64,
        tax_rate: TaxRate,
    ) -> Self {
        let mut doc = QuoteDocument::new(number, created_at, validity_days);
        doc.rows = skeleton_rows(DEFAULT_SECTION_TITLE, tax_rate);
        doc.refresh();
        doc
    }

    /// Renumbers the rows and recomputes every total.
    ///
    /// Documents loaded from storage go through this once so stale labels
    /// or totals written by an older version are corrected.
    pub fn refresh(&mut self) {
        renumber(&mut self.rows);
        self.summary = aggregate(&mut self.rows);
    }

    /// Recomputes totals without touching labels.
    pub(crate) fn reaggregate(&mut self) {
        self.summary = aggregate(&mut self.rows);
    }

    pub fn find_row(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub(crate) fn position_of(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    /// Number of item rows.
    pub fn item_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_item()).count()
    }

    /// The parsed quote number, if it follows the standard format.
    pub fn quote_number(&self) -> Option<QuoteNumber> {
        self.number.parse().ok()
    }

    /// Year the quote was created in; used to pick the numbering series.
    pub fn created_year(&self) -> i32 {
        self.created_at.year()
    }

    /// Checks that the quote can be saved.
    ///
    /// Every issue is reported at once so the UI can show them together.
    pub fn validate_for_save(&self) -> CoreResult<()> {
        let mut issues = Vec::new();
        if self.client_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            issues.push(QuoteIssue::MissingClient);
        }
        if self.item_count() == 0 {
            issues.push(QuoteIssue::NoItems);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(CoreError::ValidationFailed(issues))
        }
    }
}

/// The starter rows of a new quote, with the given section title.
pub fn skeleton_rows(section_title: &str, tax_rate: TaxRate) -> Vec<Row> {
    vec![
        Row::section(section_title),
        Row::text(DEFAULT_FREE_TEXT),
        Row::item(ItemRow::new(
            DEFAULT_ITEM_PROMPT,
            Quantity::from_units(1),
            "u",
            Money::zero(),
            tax_rate,
        )),
        Row::item(ItemRow::new(
            "",
            Quantity::from_units(1),
            "h",
            Money::zero(),
            tax_rate,
        )),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_quote_number_format() {
        assert_eq!(QuoteNumber::new(2026, 1).to_string(), "D2026000001");
        assert_eq!(QuoteNumber::new(2026, 123456).to_string(), "D2026123456");
        assert_eq!(QuoteNumber::new(2026, 41).next().sequence(), 42);
    }

    #[test]
    fn test_quote_number_parse() {
        let number: QuoteNumber = "D2025000017".parse().unwrap();
        assert_eq!(number.year(), 2025);
        assert_eq!(number.sequence(), 17);

        assert!("2025000017".parse::<QuoteNumber>().is_err());
        assert!("D2025".parse::<QuoteNumber>().is_err());
        assert!("D20250000x7".parse::<QuoteNumber>().is_err());
        assert!("D20250000170".parse::<QuoteNumber>().is_err());
    }

    #[test]
    fn test_skeleton() {
        let doc = QuoteDocument::with_skeleton("D2026000001", created(), 30, TaxRate::from_bps(1000));

        assert_eq!(doc.rows.len(), 4);
        assert_eq!(doc.item_count(), 2);
        assert_eq!(doc.status, QuoteStatus::Draft);
        assert_eq!(doc.payment_methods, DEFAULT_PAYMENT_METHODS);
        assert!(doc.summary.total_with_tax.is_zero());
        assert_eq!(doc.summary.tax_breakdown.len(), 1);
        assert_eq!(
            doc.valid_until,
            Utc.with_ymd_and_hms(2026, 3, 31, 9, 0, 0).unwrap()
        );

        let units: Vec<&str> = doc
            .rows
            .iter()
            .filter_map(Row::as_item)
            .map(|i| i.unit.as_str())
            .collect();
        assert_eq!(units, vec!["u", "h"]);
    }

    #[test]
    fn test_validate_for_save_reports_all_issues() {
        let doc = QuoteDocument::new("D2026000001", created(), 30);
        match doc.validate_for_save() {
            Err(CoreError::ValidationFailed(issues)) => {
                assert_eq!(issues, vec![QuoteIssue::MissingClient, QuoteIssue::NoItems]);
            }
            other => panic!("expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_for_save_ok() {
        let mut doc =
            QuoteDocument::with_skeleton("D2026000001", created(), 30, TaxRate::from_bps(1000));
        doc.client_id = Some("1".to_string());
        assert!(doc.validate_for_save().is_ok());

        doc.client_id = Some("  ".to_string());
        assert!(doc.validate_for_save().is_err());
    }

    #[test]
    fn test_refresh_fixes_stale_document() {
        let mut doc = QuoteDocument::new("D2026000001", created(), 30);
        let mut item = ItemRow::new(
            "Carrelage",
            Quantity::from_units(2),
            "m²",
            Money::from_cents(2500),
            TaxRate::from_bps(1000),
        );
        item.label = "9.9".to_string();
        doc.rows = vec![Row::section("A"), Row::item(item)];

        doc.refresh();
        assert_eq!(doc.rows[1].label(), "1.1");
        assert_eq!(doc.summary.total_with_tax.cents(), 5500);
    }

    #[test]
    fn test_document_json_shape() {
        let mut doc =
            QuoteDocument::with_skeleton("D2026000001", created(), 30, TaxRate::from_bps(1000));
        doc.work_start_date = NaiveDate::from_ymd_opt(2026, 4, 6);
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["number"], "D2026000001");
        assert_eq!(json["status"], "draft");
        assert_eq!(json["clientId"], serde_json::Value::Null);
        assert_eq!(json["workStartDate"], "2026-04-06");
        assert_eq!(json["rows"][0]["type"], "section");
        assert!(json["summary"]["totalWithTax"].is_number());

        let back: QuoteDocument = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }
}
