//! # Devis Desktop Library
//!
//! Application layer of the quote editor: configuration, managed state and
//! the commands the UI calls.
//!
//! ## Module Organization
//! ```text
//! devis_desktop_lib/
//! ├── lib.rs            ◄─── You are here (startup)
//! ├── state/
//! │   ├── mod.rs        ◄─── State type exports
//! │   ├── config.rs     ◄─── AppConfig (defaults → devis.toml → env)
//! │   ├── db.rs         ◄─── Snapshot store wrapper
//! │   ├── editor.rs     ◄─── Open editor sessions
//! │   └── generation.rs ◄─── Simulated prompt-to-quote generation
//! ├── commands/
//! │   ├── quote.rs      ◄─── Sessions, rows, save
//! │   ├── client.rs     ◄─── Clients
//! │   ├── catalog.rs    ◄─── Catalog items
//! │   ├── generation.rs ◄─── generate_quote
//! │   └── config.rs     ◄─── get_config
//! └── error.rs          ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use devis_db::{Database, DbConfig, SnapshotStore};

use error::ApiResult;
use state::{AppConfig, DbState, EditorState, GenerationState};

/// Everything a command may borrow.
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbState,
    pub editors: EditorState,
    pub generation: GenerationState,
}

/// Opens the database and builds the managed state.
///
/// ## Startup Sequence
/// ```text
/// 1. Resolve the database path (config, DEVIS_DB_PATH or data dir)
/// 2. Connect to SQLite (WAL mode) and run pending migrations
/// 3. Load every collection, seeding the ones never saved
/// 4. Build DbState, EditorState and GenerationState
/// ```
pub async fn bootstrap(config: AppConfig) -> ApiResult<AppState> {
    let db_path = config.database_path()?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    bootstrap_with(config, db).await
}

/// Builds the managed state over an already opened database.
pub async fn bootstrap_with(config: AppConfig, db: Database) -> ApiResult<AppState> {
    let store = SnapshotStore::open(db).await?;
    info!("Database connected and collections loaded");

    let generation = GenerationState::new(config.generation_delay());
    Ok(AppState {
        config,
        db: DbState::new(store),
        editors: EditorState::new(),
        generation,
    })
}

/// Headless start: logging, configuration, store.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    info!("Starting Devis");

    let config = AppConfig::load()?;
    info!(company = %config.company_name, "Configuration loaded");

    let app = bootstrap(config).await?;
    let store = app.db.lock().await;
    info!(
        clients = store.list_clients().len(),
        catalog_items = store.list_catalog_items().len(),
        quotes = store.list_quotes().len(),
        "Ready"
    );
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=devis=trace` - Show trace for devis crates only
/// - Default: `info,devis=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,devis=debug,sqlx=warn"));

    // A subscriber may already be installed (tests, embedding hosts).
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
