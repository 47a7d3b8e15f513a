//! # State Module
//!
//! Managed application state, one type per concern.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │   DbState    │ │ EditorState  │ │ Generation   │ │  AppConfig   │   │
//! │  │              │ │              │ │ State        │ │              │   │
//! │  │  tokio Mutex │ │  one Mutex   │ │  ticket      │ │  read-only   │   │
//! │  │  <Snapshot   │ │  per open    │ │  counter +   │ │  after load  │   │
//! │  │   Store>     │ │  quote       │ │  delay       │ │              │   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │                                                                         │
//! │  Commands borrow only the state they need.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod editor;
mod generation;

pub use config::{default_config_path, AppConfig, ConfigError, CONFIG_FILE_NAME, DATABASE_FILE_NAME};
pub use db::DbState;
pub use editor::EditorState;
pub use generation::{GenerationRequest, GenerationState};
