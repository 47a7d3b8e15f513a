//! # Generation State
//!
//! Simulated prompt-to-quote generation.
//!
//! A request waits for the configured delay, then produces a starter quote
//! whose first section is titled from the prompt. Every request takes a
//! ticket; when the delay ends, only the holder of the newest ticket gets a
//! document back.
//!
//! ```text
//!   t=0    generate("Salle de bain")   ticket 1 ──sleep──┐
//!   t=0.5  generate("Cuisine")         ticket 2 ──sleep──┼──┐
//!   t=2                                                   └─►│ None (stale)
//!   t=2.5                                                    └─► Some(doc)
//! ```
//!
//! No lock is held while waiting, so editor commands keep running.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use devis_core::document::skeleton_rows;
use devis_core::validation::validate_free_text;
use devis_core::{CoreResult, QuoteDocument, TaxRate, ValidationError, MAX_TITLE_LENGTH};

/// Inputs of one generation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub number: String,
    pub created_at: DateTime<Utc>,
    pub validity_days: i64,
    pub tax_rate: TaxRate,
}

/// Delay and ticket counter for simulated generation.
#[derive(Debug)]
pub struct GenerationState {
    delay: Duration,
    latest: AtomicU64,
}

impl GenerationState {
    pub fn new(delay: Duration) -> Self {
        GenerationState {
            delay,
            latest: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs one generation.
    ///
    /// ## Returns
    /// - `Ok(Some(doc))` if no newer request started during the delay
    /// - `Ok(None)` if this request was superseded or cancelled
    /// - `Err` if the prompt is blank or too long
    pub async fn generate(&self, request: GenerationRequest) -> CoreResult<Option<QuoteDocument>> {
        let prompt = request.prompt.trim();
        if prompt.is_empty() {
            warn!("Rejected generation with an empty prompt");
            return Err(ValidationError::Required {
                field: "prompt".to_string(),
            }
            .into());
        }
        validate_free_text("prompt", prompt)?;

        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ticket, delay_ms = self.delay.as_millis() as u64, "Generation started");

        tokio::time::sleep(self.delay).await;

        if self.latest.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "Generation superseded");
            return Ok(None);
        }

        let mut doc = QuoteDocument::new(request.number, request.created_at, request.validity_days);
        doc.rows = skeleton_rows(&section_title(prompt), request.tax_rate);
        doc.refresh();

        info!(ticket, quote_id = %doc.id, number = %doc.number, "Generation completed");
        Ok(Some(doc))
    }

    /// Invalidates any generation still waiting.
    pub fn cancel(&self) {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ticket, "Generation cancelled");
    }
}

/// First line of the prompt, cut to a title-sized length.
fn section_title(prompt: &str) -> String {
    let first_line = prompt.lines().next().unwrap_or_default().trim();
    first_line.chars().take(MAX_TITLE_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use devis_core::{CoreError, Row};

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.to_string(),
            number: "D2026000001".to_string(),
            created_at: Utc::now(),
            validity_days: 30,
            tax_rate: TaxRate::from_bps(1000),
        }
    }

    #[tokio::test]
    async fn test_generate_skeleton_from_prompt() {
        let state = GenerationState::new(Duration::from_millis(5));
        let doc = state
            .generate(request("  Rénovation salle de bain\n12 m² de faïence"))
            .await
            .unwrap()
            .unwrap();

        match &doc.rows[0] {
            Row::Section(s) => {
                assert_eq!(s.title, "Rénovation salle de bain");
                assert_eq!(s.label, "1");
            }
            other => panic!("expected a section, got {:?}", other.kind()),
        }
        assert_eq!(doc.rows.len(), 4);
        assert_eq!(doc.number, "D2026000001");
        assert!(doc.summary.total_with_tax.is_zero());
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected() {
        let state = GenerationState::new(Duration::from_millis(5));
        let err = state.generate(request("   \n ")).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));
    }

    #[tokio::test]
    async fn test_newer_request_supersedes_older() {
        let state = GenerationState::new(Duration::from_millis(50));

        let (first, second) = tokio::join!(state.generate(request("Cuisine")), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            state.generate(request("Salle de bain")).await
        });

        assert!(first.unwrap().is_none());
        let doc = second.unwrap().unwrap();
        assert!(matches!(&doc.rows[0], Row::Section(s) if s.title == "Salle de bain"));
    }

    #[tokio::test]
    async fn test_cancel() {
        let state = GenerationState::new(Duration::from_millis(30));

        let (result, ()) = tokio::join!(state.generate(request("Entrée")), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            state.cancel();
        });

        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_section_title_truncated() {
        let long = "x".repeat(MAX_TITLE_LENGTH + 50);
        assert_eq!(section_title(&long).chars().count(), MAX_TITLE_LENGTH);
    }
}
