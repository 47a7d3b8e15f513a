//! # Generation Commands
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Décrivez votre projet..."                                             │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  generate_quote(prompt) ── waits the configured delay ──┐               │
//! │                                                         │               │
//! │        ┌────────────────────────────────────────────────┘               │
//! │        ▼                                                                │
//! │  newest request? ── no ──► Ok(None), nothing opened                     │
//! │        │                                                                │
//! │       yes                                                               │
//! │        ▼                                                                │
//! │  starter quote opened in a new session ──► Ok(Some(response))           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, Utc};
use tracing::debug;

use crate::commands::quote::{next_free_number, open_editor, QuoteResponse};
use crate::error::ApiResult;
use crate::state::{AppConfig, DbState, EditorState, GenerationRequest, GenerationState};
use devis_core::QuoteEditor;

/// Generates a starter quote from a prompt and opens it.
///
/// Returns `None` when a newer request replaced this one.
pub async fn generate_quote(
    db: &DbState,
    editors: &EditorState,
    generation: &GenerationState,
    config: &AppConfig,
    prompt: &str,
) -> ApiResult<Option<QuoteResponse>> {
    debug!(prompt_len = prompt.len(), "generate_quote command");

    let now = Utc::now();
    let number = {
        let store = db.lock().await;
        next_free_number(&store, editors, now.year())
    };

    let request = GenerationRequest {
        prompt: prompt.to_string(),
        number: number.to_string(),
        created_at: now,
        validity_days: config.validity_days,
        tax_rate: config.default_tax_rate(),
    };

    let generated = generation.generate(request).await?;
    Ok(generated.map(|doc| open_editor(editors, QuoteEditor::new(doc))))
}

/// Drops any generation still waiting.
pub fn cancel_generation(generation: &GenerationState) {
    generation.cancel();
}
