//! # Editor Sessions
//!
//! Open quotes, each owned by one `QuoteEditor`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EditorState                                                            │
//! │                                                                         │
//! │  Mutex<HashMap<quote id, Arc<Mutex<QuoteEditor>>>>                      │
//! │        │                                                                │
//! │        │  lookup (short lock)                                           │
//! │        ▼                                                                │
//! │  Arc<Mutex<QuoteEditor>> ──► command runs against one document          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The map lock is only held to find a session. Commands on different
//! quotes never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use devis_core::QuoteEditor;

type Session = Arc<Mutex<QuoteEditor>>;

/// Editor sessions keyed by quote id.
#[derive(Debug, Default)]
pub struct EditorState {
    sessions: Mutex<HashMap<String, Session>>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an editor, replacing any session for the same quote.
    pub fn open(&self, editor: QuoteEditor) {
        let id = editor.id().to_string();
        debug!(quote_id = %id, "Opening editor session");
        self.map().insert(id, Arc::new(Mutex::new(editor)));
    }

    /// Removes and returns a session.
    pub fn close(&self, id: &str) -> Option<QuoteEditor> {
        let session = self.map().remove(id)?;
        debug!(quote_id = %id, "Closing editor session");
        let editor = match Arc::try_unwrap(session) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            // A command still holds the session; hand back a copy of it.
            Err(shared) => {
                let copy = lock(&shared).clone();
                copy
            }
        };
        Some(editor)
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.map().contains_key(id)
    }

    /// Ids of every open quote.
    pub fn open_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.map().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Quote numbers held by open sessions, saved or not.
    pub fn open_numbers(&self) -> Vec<String> {
        let sessions: Vec<Session> = self.map().values().cloned().collect();
        sessions
            .iter()
            .map(|session| lock(session).document().number.clone())
            .collect()
    }

    /// Runs `f` with read access to a session. `None` if it is not open.
    pub fn with_editor<F, R>(&self, id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&QuoteEditor) -> R,
    {
        let session = self.session(id)?;
        let editor = lock(&session);
        Some(f(&editor))
    }

    /// Runs `f` with write access to a session. `None` if it is not open.
    pub fn with_editor_mut<F, R>(&self, id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut QuoteEditor) -> R,
    {
        let session = self.session(id)?;
        let mut editor = lock(&session);
        Some(f(&mut editor))
    }

    fn session(&self, id: &str) -> Option<Session> {
        self.map().get(id).cloned()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock(session: &Session) -> MutexGuard<'_, QuoteEditor> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use devis_core::{QuoteDocument, Row};

    fn editor(number: &str) -> QuoteEditor {
        QuoteEditor::new(QuoteDocument::new(number, Utc::now(), 30))
    }

    #[test]
    fn test_open_and_mutate() {
        let state = EditorState::new();
        let editor = editor("D2026000001");
        let id = editor.id().to_string();
        state.open(editor);

        assert!(state.is_open(&id));
        let label = state
            .with_editor_mut(&id, |e| {
                e.append_row(Row::section("Cuisine")).unwrap();
                e.document().rows[0].label().to_string()
            })
            .unwrap();
        assert_eq!(label, "1");

        let version = state.with_editor(&id, |e| e.version()).unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_unknown_session() {
        let state = EditorState::new();
        assert!(state.with_editor("nope", |e| e.version()).is_none());
        assert!(state.close("nope").is_none());
    }

    #[test]
    fn test_close_returns_editor() {
        let state = EditorState::new();
        let a = editor("D2026000001");
        let b = editor("D2026000002");
        let a_id = a.id().to_string();
        state.open(a);
        state.open(b);
        assert_eq!(state.open_ids().len(), 2);

        let mut numbers = state.open_numbers();
        numbers.sort();
        assert_eq!(numbers, vec!["D2026000001", "D2026000002"]);

        let closed = state.close(&a_id).unwrap();
        assert_eq!(closed.document().number, "D2026000001");
        assert!(!state.is_open(&a_id));
        assert_eq!(state.open_ids().len(), 1);
    }

    #[test]
    fn test_close_while_session_is_in_use_keeps_version() {
        let state = EditorState::new();
        let editor = editor("D2026000001");
        let id = editor.id().to_string();
        state.open(editor);
        state
            .with_editor_mut(&id, |e| e.append_row(Row::section("Cuisine")).map(|_| ()))
            .unwrap()
            .unwrap();

        let in_use = state.session(&id).unwrap();
        let closed = state.close(&id).unwrap();
        assert_eq!(closed.version(), 1);
        assert_eq!(closed.document(), lock(&in_use).document());
    }

    #[test]
    fn test_reopen_replaces_session() {
        let state = EditorState::new();
        let doc = QuoteDocument::new("D2026000001", Utc::now(), 30);
        let id = doc.id.clone();

        state.open(QuoteEditor::new(doc.clone()));
        state
            .with_editor_mut(&id, |e| e.append_row(Row::page_break()).map(|_| ()))
            .unwrap()
            .unwrap();
        state.open(QuoteEditor::new(doc));

        let rows = state.with_editor(&id, |e| e.document().rows.len()).unwrap();
        assert_eq!(rows, 0);
    }
}
