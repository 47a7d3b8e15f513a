//! # Commands Module
//!
//! Every operation the UI can call.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports)
//! ├── quote.rs       ◄─── Editor sessions, row edits, save
//! ├── client.rs      ◄─── Client list and creation
//! ├── catalog.rs     ◄─── Catalog list and creation
//! ├── generation.rs  ◄─── Prompt-to-quote simulation
//! └── config.rs      ◄─── Configuration retrieval
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the store
//! pub async fn list_clients(db: &DbState) -> Vec<Client>
//!
//! // Only needs the open editors
//! pub fn remove_row(editors: &EditorState, quote_id: &str, row_id: &str) -> ApiResult<QuoteResponse>
//!
//! // Needs both
//! pub async fn save_quote(db: &DbState, editors: &EditorState, quote_id: &str) -> ApiResult<QuoteResponse>
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod generation;
pub mod quote;

pub use quote::{NewRowKind, QuoteHeaderUpdate, QuoteResponse};
