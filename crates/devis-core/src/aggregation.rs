//! # Aggregation Engine
//!
//! Computes line totals, section subtotals, the tax breakdown and the grand
//! totals of a quote from its rows.
//!
//! ## Aggregation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Item rows ──► line_total = quantity × unit_price                       │
//! │      │                                                                  │
//! │      ├──► Σ per enclosing section ──► Section.subtotal                  │
//! │      │    (items before any section ──► unsectioned_total)              │
//! │      │                                                                  │
//! │      ├──► Σ all ──────────────────────► total_pre_tax                   │
//! │      │                                                                  │
//! │      └──► Σ per rate (rate > 0) ──────► tax_breakdown[rate]             │
//! │                                              │                          │
//! │                              Σ tax(base, rate)                          │
//! │                                              ▼                          │
//! │                                          total_tax                      │
//! │                                              │                          │
//! │           total_with_tax = total_pre_tax + total_tax                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is recomputed from the row fields on every call. Stored line
//! totals and subtotals are outputs only, never inputs, so running the pass
//! twice on the same rows gives identical results.
//!
//! ## Items before the first section
//! They count toward `total_pre_tax` and the tax breakdown, and are also
//! reported on their own as `unsectioned_total`. The pre-tax total is the
//! sum of every bucket, the unsectioned one included, so an item placed
//! above the first section is still billed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::money::Money;
use crate::rows::Row;
use crate::types::TaxRate;

// =============================================================================
// Summary
// =============================================================================

/// Totals of a quote. A pure function of the row list.
///
/// ## Example
/// ```rust
/// use devis_core::aggregation::summarize;
/// use devis_core::money::Money;
/// use devis_core::rows::{ItemRow, Row};
/// use devis_core::types::{Quantity, TaxRate};
///
/// let ten_percent = TaxRate::from_bps(1000);
/// let rows = vec![
///     Row::section("Bathroom"),
///     Row::item(ItemRow::new("Tiles", Quantity::from_units(2), "m²", Money::from_cents(2500), ten_percent)),
///     Row::item(ItemRow::new("Labour", Quantity::from_units(1), "m²", Money::from_cents(3500), ten_percent)),
/// ];
///
/// let summary = summarize(&rows);
/// assert_eq!(summary.total_pre_tax.cents(), 8500);
/// assert_eq!(summary.total_tax.cents(), 850);
/// assert_eq!(summary.total_with_tax.cents(), 9350);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuoteSummary {
    pub total_pre_tax: Money,
    pub total_tax: Money,
    pub total_with_tax: Money,
    /// Pre-tax base per positive tax rate.
    pub tax_breakdown: BTreeMap<TaxRate, Money>,
    /// Line totals of items placed before the first section.
    pub unsectioned_total: Money,
}

/// One line of the tax table printed under the quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TaxLine {
    pub rate: TaxRate,
    pub base: Money,
    pub tax: Money,
}

impl QuoteSummary {
    /// Tax table rows, ordered by ascending rate.
    pub fn tax_lines(&self) -> Vec<TaxLine> {
        self.tax_breakdown
            .iter()
            .map(|(&rate, &base)| TaxLine {
                rate,
                base,
                tax: base.calculate_tax(rate),
            })
            .collect()
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Computes the summary of `rows` without modifying them.
pub fn summarize(rows: &[Row]) -> QuoteSummary {
    let mut total_pre_tax = Money::zero();
    let mut unsectioned_total = Money::zero();
    let mut tax_breakdown: BTreeMap<TaxRate, Money> = BTreeMap::new();
    let mut inside_section = false;

    for row in rows {
        match row {
            Row::Section(_) => inside_section = true,
            Row::Item(item) => {
                let line_total = item.compute_line_total();
                total_pre_tax += line_total;
                if !inside_section {
                    unsectioned_total += line_total;
                }
                if !item.tax_rate.is_zero() {
                    *tax_breakdown.entry(item.tax_rate).or_default() += line_total;
                }
            }
            Row::Subsection(_) | Row::Text(_) | Row::PageBreak(_) => {}
        }
    }

    let total_tax: Money = tax_breakdown
        .iter()
        .map(|(&rate, &base)| base.calculate_tax(rate))
        .sum();

    QuoteSummary {
        total_pre_tax,
        total_tax,
        total_with_tax: total_pre_tax + total_tax,
        tax_breakdown,
        unsectioned_total,
    }
}

/// Refreshes every item's line total and every section's subtotal, then
/// returns the summary.
///
/// A section's subtotal covers the items between it and the next section,
/// whatever subsections, text rows or page breaks sit in between.
pub fn aggregate(rows: &mut [Row]) -> QuoteSummary {
    let mut current_section: Option<usize> = None;
    let mut subtotals: Vec<(usize, Money)> = Vec::new();

    for (index, row) in rows.iter_mut().enumerate() {
        match row {
            Row::Section(_) => {
                subtotals.push((index, Money::zero()));
                current_section = Some(subtotals.len() - 1);
            }
            Row::Item(item) => {
                item.line_total = item.compute_line_total();
                if let Some(slot) = current_section {
                    subtotals[slot].1 += item.line_total;
                }
            }
            Row::Subsection(_) | Row::Text(_) | Row::PageBreak(_) => {}
        }
    }

    for (index, subtotal) in subtotals {
        if let Row::Section(section) = &mut rows[index] {
            section.subtotal = subtotal;
        }
    }

    summarize(rows)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numbering::renumber;
    use crate::rows::ItemRow;
    use crate::types::Quantity;

    fn item(qty: i64, price_cents: i64, rate_bps: u32) -> Row {
        Row::item(ItemRow::new(
            "item",
            Quantity::from_units(qty),
            "u",
            Money::from_cents(price_cents),
            TaxRate::from_bps(rate_bps),
        ))
    }

    fn subtotal(row: &Row) -> Money {
        match row {
            Row::Section(s) => s.subtotal,
            other => panic!("expected section, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_bathroom_scenario() {
        let mut rows = vec![
            Row::section("Bathroom"),
            item(2, 2500, 1000),
            item(1, 3500, 1000),
        ];
        renumber(&mut rows);
        let summary = aggregate(&mut rows);

        assert_eq!(subtotal(&rows[0]).cents(), 8500);
        assert_eq!(summary.total_pre_tax.cents(), 8500);
        assert_eq!(
            summary.tax_breakdown.get(&TaxRate::from_bps(1000)),
            Some(&Money::from_cents(8500))
        );
        assert_eq!(summary.total_tax.cents(), 850);
        assert_eq!(summary.total_with_tax.cents(), 9350);
    }

    #[test]
    fn test_subtotals_skip_non_item_rows() {
        let mut rows = vec![
            Row::section("A"),
            item(1, 1000, 1000),
            Row::subsection("A.sub"),
            Row::text("note"),
            item(2, 500, 2000),
            Row::page_break(),
            item(1, 100, 0),
            Row::section("B"),
            item(3, 1000, 550),
        ];
        let summary = aggregate(&mut rows);

        assert_eq!(subtotal(&rows[0]).cents(), 2100);
        assert_eq!(subtotal(&rows[7]).cents(), 3000);
        assert_eq!(summary.total_pre_tax.cents(), 5100);
    }

    #[test]
    fn test_zero_rate_excluded_from_breakdown_but_in_pre_tax() {
        let mut rows = vec![Row::section("A"), item(1, 1000, 0), item(1, 2000, 2000)];
        let summary = aggregate(&mut rows);

        assert_eq!(summary.total_pre_tax.cents(), 3000);
        assert_eq!(summary.tax_breakdown.len(), 1);
        assert!(!summary.tax_breakdown.contains_key(&TaxRate::zero()));
        assert_eq!(summary.total_tax.cents(), 400);
    }

    #[test]
    fn test_breakdown_keys_are_distinct_positive_rates() {
        let mut rows = vec![
            Row::section("A"),
            item(1, 100, 550),
            item(1, 100, 1000),
            item(1, 100, 550),
            item(1, 100, 0),
            Row::section("B"),
            item(1, 100, 2000),
        ];
        let summary = aggregate(&mut rows);

        let keys: Vec<u32> = summary.tax_breakdown.keys().map(TaxRate::bps).collect();
        assert_eq!(keys, vec![550, 1000, 2000]);
        assert_eq!(summary.tax_breakdown[&TaxRate::from_bps(550)].cents(), 200);
    }

    #[test]
    fn test_items_before_first_section() {
        let mut rows = vec![item(1, 1000, 1000), Row::section("A"), item(1, 2000, 1000)];
        let summary = aggregate(&mut rows);

        assert_eq!(subtotal(&rows[1]).cents(), 2000);
        assert_eq!(summary.unsectioned_total.cents(), 1000);
        assert_eq!(summary.total_pre_tax.cents(), 3000);
        assert_eq!(summary.total_tax.cents(), 300);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let mut rows = vec![
            Row::section("A"),
            item(3, 333, 550),
            item(7, 1299, 2000),
            Row::section("B"),
            item(1, 5, 1000),
        ];
        let first = aggregate(&mut rows);
        let snapshot = rows.clone();
        let second = aggregate(&mut rows);

        assert_eq!(first, second);
        assert_eq!(snapshot, rows);
        assert_eq!(summarize(&rows), first);
    }

    #[test]
    fn test_stale_stored_totals_are_ignored() {
        let mut rows = vec![Row::section("A"), item(2, 1000, 1000)];
        if let Row::Item(i) = &mut rows[1] {
            i.line_total = Money::from_cents(999_999);
        }
        if let Row::Section(s) = &mut rows[0] {
            s.subtotal = Money::from_cents(1);
        }

        let summary = aggregate(&mut rows);
        assert_eq!(summary.total_pre_tax.cents(), 2000);
        assert_eq!(rows[1].as_item().map(|i| i.line_total.cents()), Some(2000));
        assert_eq!(subtotal(&rows[0]).cents(), 2000);
    }

    #[test]
    fn test_total_identity_holds() {
        let mut rows = vec![
            Row::section("A"),
            item(3, 1999, 550),
            item(11, 7, 2000),
            item(5, 12345, 1000),
        ];
        let summary = aggregate(&mut rows);
        assert_eq!(
            summary.total_with_tax,
            summary.total_pre_tax + summary.total_tax
        );
    }

    #[test]
    fn test_tax_lines() {
        let mut rows = vec![Row::section("A"), item(1, 10000, 2000), item(1, 1000, 550)];
        let summary = aggregate(&mut rows);
        let lines = summary.tax_lines();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].rate.bps(), 550);
        assert_eq!(lines[0].tax.cents(), 55);
        assert_eq!(lines[1].base.cents(), 10000);
        assert_eq!(lines[1].tax.cents(), 2000);
    }

    #[test]
    fn test_empty_rows() {
        let mut rows: Vec<Row> = Vec::new();
        assert_eq!(aggregate(&mut rows), QuoteSummary::default());
    }

    #[test]
    fn test_summary_serializes_breakdown_by_rate() {
        let mut rows = vec![Row::section("A"), item(1, 1000, 1000)];
        let summary = aggregate(&mut rows);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"taxBreakdown\":{\"1000\":1000}"));

        let back: QuoteSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
