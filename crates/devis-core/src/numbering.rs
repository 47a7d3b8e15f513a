//! # Numbering Engine
//!
//! Derives every row's display label from its position and role.
//!
//! ## Numbering Pass
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Row              section   child    label                              │
//! │  ───────────────  ───────   ─────    ─────                              │
//! │  Item (orphan)       0        0       -      ◄ before any section       │
//! │  Section             1        0       1      ◄ child counter resets     │
//! │  Text                1        0       -      ◄ never counts             │
//! │  Item                1        1       1.1                               │
//! │  Subsection          1        2       1.2    ◄ shares the item counter  │
//! │  Item                1        3       1.3                               │
//! │  PageBreak           1        3       -                                 │
//! │  Section             2        0       2                                 │
//! │  Item                2        1       2.1                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pass is O(n) and runs after every structural change (insert, remove,
//! reorder). Field edits never move a row, so they never renumber.

use crate::rows::{Row, PLACEHOLDER_LABEL};

/// Rewrites the label of every row in document order.
pub fn renumber(rows: &mut [Row]) {
    let mut section: u32 = 0;
    let mut child: u32 = 0;

    for row in rows.iter_mut() {
        match row {
            Row::Section(_) => {
                section += 1;
                child = 0;
                row.set_label(section.to_string());
            }
            Row::Subsection(_) | Row::Item(_) => {
                if section == 0 {
                    row.set_label(PLACEHOLDER_LABEL.to_string());
                } else {
                    child += 1;
                    row.set_label(format!("{}.{}", section, child));
                }
            }
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
    use crate::money::Money;
    use crate::rows::ItemRow;
    use crate::types::{Quantity, TaxRate};

    fn item(description: &str) -> Row {
        Row::item(ItemRow::new(
            description,
            Quantity::from_units(1),
            "u",
            Money::zero(),
            TaxRate::from_bps(1000),
        ))
    }

    fn labels(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(Row::label).collect()
    }

    #[test]
    fn test_empty_list() {
        let mut rows: Vec<Row> = Vec::new();
        renumber(&mut rows);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_mixed_document() {
        let mut rows = vec![
            item("orphan"),
            Row::section("Salle de bain"),
            Row::text("note"),
            item("a"),
            Row::subsection("Douche"),
            item("b"),
            Row::page_break(),
            Row::section("Cuisine"),
            item("c"),
        ];
        renumber(&mut rows);

        assert_eq!(
            labels(&rows),
            vec!["-", "1", "-", "1.1", "1.2", "1.3", "-", "2", "2.1"]
        );
    }

    #[test]
    fn test_new_section_at_end_gets_next_integer() {
        let mut rows = vec![Row::section("A"), item("a"), Row::section("B"), item("b")];
        renumber(&mut rows);

        rows.push(Row::section("C"));
        rows.push(item("c"));
        renumber(&mut rows);

        assert_eq!(rows[4].label(), "3");
        assert_eq!(rows[5].label(), "3.1");
    }

    #[test]
    fn test_stale_labels_are_overwritten() {
        let mut rows = vec![Row::section("A"), item("a"), item("b")];
        renumber(&mut rows);
        rows.swap(1, 2);
        rows.remove(0);
        renumber(&mut rows);

        assert_eq!(labels(&rows), vec!["-", "-"]);
    }
}
