//! # Quote Commands
//!
//! Editor sessions and the row commands that run against them.
//!
//! ## Quote Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create_quote ──┐                                                       │
//! │                 ├──► open session ──► insert_row / add_row              │
//! │  open_quote ────┘         │            remove_row / reorder_rows        │
//! │                           │            update_row_field                 │
//! │                           │            set_quote_client                 │
//! │                           ▼                                             │
//! │                      save_quote ──► snapshot store                      │
//! │                           │                                             │
//! │                           ▼                                             │
//! │                      close_quote                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every editing command answers with the whole document, its totals and
//! the session version, so the UI never recomputes anything.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use devis_core::{
    ItemRow, Money, Quantity, QuoteDocument, QuoteEditor, QuoteNumber, QuoteStatus,
    QuoteSummary, Row, RowField, Site, TaxRate,
};
use devis_db::SnapshotStore;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppConfig, DbState, EditorState};

const NEW_SECTION_TITLE: &str = "Nouvelle section";
const NEW_SUBSECTION_TITLE: &str = "Nouvelle sous-section";
const NEW_TEXT: &str = "Texte libre";

/// Document, totals and version of an open quote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub document: QuoteDocument,
    pub summary: QuoteSummary,
    pub version: u64,
}

impl From<&QuoteEditor> for QuoteResponse {
    fn from(editor: &QuoteEditor) -> Self {
        QuoteResponse {
            document: editor.document().clone(),
            summary: editor.summary().clone(),
            version: editor.version(),
        }
    }
}

/// What the "add" buttons under the row table create.
///
/// The three item presets differ only in their description and unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewRowKind {
    Section,
    Subsection,
    /// Supplies, counted in units.
    Supply,
    /// Labour, counted in hours.
    Labor,
    /// A finished piece of work, counted in units.
    Work,
    Text,
    PageBreak,
}

impl NewRowKind {
    /// Builds a fresh row of this kind. Items start at 1 × 0.00 with the
    /// configured tax rate.
    pub fn build(self, tax_rate: TaxRate) -> Row {
        let item = |description: &str, unit: &str| {
            Row::item(ItemRow::new(
                description,
                Quantity::from_units(1),
                unit,
                Money::zero(),
                tax_rate,
            ))
        };

        match self {
            NewRowKind::Section => Row::section(NEW_SECTION_TITLE),
            NewRowKind::Subsection => Row::subsection(NEW_SUBSECTION_TITLE),
            NewRowKind::Supply => item("Fourniture", "u"),
            NewRowKind::Labor => item("Main d'œuvre", "h"),
            NewRowKind::Work => item("Ouvrage", "u"),
            NewRowKind::Text => Row::text(NEW_TEXT),
            NewRowKind::PageBreak => Row::page_break(),
        }
    }
}

/// Header fields to change. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteHeaderUpdate {
    pub status: Option<QuoteStatus>,
    pub site: Option<Site>,
    pub notes: Option<String>,
    pub payment_terms: Option<String>,
    pub payment_methods: Option<String>,
    pub waste_management: Option<String>,
    pub work_start_date: Option<NaiveDate>,
    pub work_duration: Option<String>,
}

// =============================================================================
// Sessions
// =============================================================================

/// Starts a new quote from the starter rows and opens it.
pub async fn create_quote(
    db: &DbState,
    editors: &EditorState,
    config: &AppConfig,
) -> ApiResult<QuoteResponse> {
    let now = Utc::now();
    let number = {
        let store = db.lock().await;
        next_free_number(&store, editors, now.year())
    };

    let doc = QuoteDocument::with_skeleton(
        number.to_string(),
        now,
        config.validity_days,
        config.default_tax_rate(),
    );
    info!(quote_id = %doc.id, number = %doc.number, "Created quote");

    Ok(open_editor(editors, QuoteEditor::new(doc)))
}

/// Opens a saved quote for editing.
///
/// A quote that is already open keeps its session, unsaved edits included.
pub async fn open_quote(
    db: &DbState,
    editors: &EditorState,
    quote_id: &str,
) -> ApiResult<QuoteResponse> {
    debug!(quote_id, "open_quote command");

    if let Some(response) = editors.with_editor(quote_id, |e| QuoteResponse::from(e)) {
        return Ok(response);
    }

    let doc = db
        .lock()
        .await
        .get_quote(quote_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Quote", quote_id))?;

    Ok(open_editor(editors, QuoteEditor::new(doc)))
}

/// Current state of an open quote.
pub fn get_quote_editor(editors: &EditorState, quote_id: &str) -> ApiResult<QuoteResponse> {
    editors
        .with_editor(quote_id, |e| QuoteResponse::from(e))
        .ok_or_else(|| ApiError::quote_not_open(quote_id))
}

/// Ends a session without saving. Returns whether it was open.
pub fn close_quote(editors: &EditorState, quote_id: &str) -> bool {
    debug!(quote_id, "close_quote command");
    editors.close(quote_id).is_some()
}

/// Every saved quote, in creation order.
pub async fn list_quotes(db: &DbState) -> Vec<QuoteDocument> {
    db.lock().await.list_quotes().to_vec()
}

// =============================================================================
// Row Commands
// =============================================================================

/// Inserts a new row of `kind` at `position` (clamped to the end).
pub fn insert_row(
    editors: &EditorState,
    config: &AppConfig,
    quote_id: &str,
    position: usize,
    kind: NewRowKind,
) -> ApiResult<QuoteResponse> {
    debug!(quote_id, position, ?kind, "insert_row command");
    let row = kind.build(config.default_tax_rate());
    edit(editors, quote_id, |e| e.insert_row(position, row).map(|_| ()))
}

/// Appends a new row of `kind` after the last row.
pub fn add_row(
    editors: &EditorState,
    config: &AppConfig,
    quote_id: &str,
    kind: NewRowKind,
) -> ApiResult<QuoteResponse> {
    debug!(quote_id, ?kind, "add_row command");
    let row = kind.build(config.default_tax_rate());
    edit(editors, quote_id, |e| e.append_row(row).map(|_| ()))
}

/// Removes a row. Unknown row ids leave the quote unchanged.
pub fn remove_row(editors: &EditorState, quote_id: &str, row_id: &str) -> ApiResult<QuoteResponse> {
    debug!(quote_id, row_id, "remove_row command");
    edit(editors, quote_id, |e| {
        e.remove_row(row_id);
        Ok(())
    })
}

/// Sets one field of a row from the text the user typed.
///
/// ## Arguments
/// * `field` - wire name: `title`, `description`, `quantity`, `unit`,
///   `unitPrice`, `taxRate` or `freeText`
/// * `value` - raw input, e.g. `"12,50"` for a price
pub fn update_row_field(
    editors: &EditorState,
    quote_id: &str,
    row_id: &str,
    field: &str,
    value: &str,
) -> ApiResult<QuoteResponse> {
    debug!(quote_id, row_id, field, "update_row_field command");
    let field = RowField::parse(field, value)?;
    edit(editors, quote_id, |e| e.update_row_field(row_id, field).map(|_| ()))
}

/// Puts the rows in the order of `row_ids`, which must list every row
/// exactly once.
pub fn reorder_rows(
    editors: &EditorState,
    quote_id: &str,
    row_ids: &[String],
) -> ApiResult<QuoteResponse> {
    debug!(quote_id, rows = row_ids.len(), "reorder_rows command");
    edit(editors, quote_id, |e| e.reorder_rows(row_ids).map(|_| ()))
}

/// Copies a catalog entry into the quote at `position`, or at the end.
pub async fn add_catalog_item_to_quote(
    db: &DbState,
    editors: &EditorState,
    quote_id: &str,
    catalog_item_id: &str,
    position: Option<usize>,
) -> ApiResult<QuoteResponse> {
    debug!(quote_id, catalog_item_id, ?position, "add_catalog_item_to_quote command");

    let item = db
        .lock()
        .await
        .get_catalog_item(catalog_item_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("CatalogItem", catalog_item_id))?;

    edit(editors, quote_id, |e| {
        let position = position.unwrap_or(e.document().rows.len());
        e.insert_catalog_item(position, &item).map(|_| ())
    })
}

// =============================================================================
// Header Commands
// =============================================================================

/// Assigns a client, or clears it with `None`.
pub async fn set_quote_client(
    db: &DbState,
    editors: &EditorState,
    quote_id: &str,
    client_id: Option<String>,
) -> ApiResult<QuoteResponse> {
    debug!(quote_id, ?client_id, "set_quote_client command");

    let client_id = client_id.filter(|id| !id.trim().is_empty());
    if let Some(id) = &client_id {
        if db.lock().await.get_client(id).is_none() {
            return Err(ApiError::not_found("Client", id));
        }
    }

    edit(editors, quote_id, |e| {
        e.set_client(client_id);
        Ok(())
    })
}

/// Applies a header update. Either every field is applied or none is.
pub fn update_quote_header(
    editors: &EditorState,
    quote_id: &str,
    update: QuoteHeaderUpdate,
) -> ApiResult<QuoteResponse> {
    debug!(quote_id, "update_quote_header command");
    edit(editors, quote_id, |e| {
        let mut draft = e.clone();
        apply_header(&mut draft, update)?;
        *e = draft;
        Ok(())
    })
}

fn apply_header(editor: &mut QuoteEditor, update: QuoteHeaderUpdate) -> devis_core::CoreResult<()> {
    if let Some(status) = update.status {
        editor.set_status(status);
    }
    if let Some(site) = update.site {
        editor.set_site(Some(site));
    }
    if let Some(notes) = update.notes {
        editor.set_notes(notes)?;
    }
    if let Some(terms) = update.payment_terms {
        editor.set_payment_terms(terms)?;
    }
    if let Some(methods) = update.payment_methods {
        editor.set_payment_methods(methods)?;
    }
    if let Some(text) = update.waste_management {
        editor.set_waste_management(text)?;
    }
    if update.work_start_date.is_some() || update.work_duration.is_some() {
        let start = update.work_start_date.or(editor.document().work_start_date);
        let duration = update
            .work_duration
            .or_else(|| editor.document().work_duration.clone());
        editor.set_work_schedule(start, duration)?;
    }
    Ok(())
}

// =============================================================================
// Save
// =============================================================================

/// Validates and persists an open quote. The session stays open.
///
/// ## Errors
/// - `QUOTE_INCOMPLETE` with every issue when the client or items are
///   missing; nothing is written
pub async fn save_quote(
    db: &DbState,
    editors: &EditorState,
    quote_id: &str,
) -> ApiResult<QuoteResponse> {
    debug!(quote_id, "save_quote command");

    let doc = editors
        .with_editor(quote_id, |e| e.document().clone())
        .ok_or_else(|| ApiError::quote_not_open(quote_id))?;

    let saved = db.lock().await.save_quote(doc).await?;
    info!(quote_id, number = %saved.number, total = %saved.summary.total_with_tax, "Quote saved");

    get_quote_editor(editors, quote_id)
}

// =============================================================================
// Helpers
// =============================================================================

/// Runs a mutation on an open quote and answers with its new state.
fn edit<F>(editors: &EditorState, quote_id: &str, f: F) -> ApiResult<QuoteResponse>
where
    F: FnOnce(&mut QuoteEditor) -> devis_core::CoreResult<()>,
{
    editors
        .with_editor_mut(quote_id, |e| -> ApiResult<QuoteResponse> {
            f(e)?;
            Ok(QuoteResponse::from(&*e))
        })
        .ok_or_else(|| ApiError::quote_not_open(quote_id))?
}

pub(crate) fn open_editor(editors: &EditorState, editor: QuoteEditor) -> QuoteResponse {
    let response = QuoteResponse::from(&editor);
    editors.open(editor);
    response
}

/// Next number for `year` that is neither saved nor held by an open draft.
pub(crate) fn next_free_number(store: &SnapshotStore, editors: &EditorState, year: i32) -> QuoteNumber {
    let open = editors.open_numbers();
    let mut number = store.next_quote_number(year);
    while open.iter().any(|n| *n == number.to_string()) {
        number = number.next();
    }
    number
}
