//! # Devis Entry Point
//!
//! Loads configuration, opens the store and logs what it found.
//! Startup lives in `lib.rs` so tests can drive it.

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    devis_desktop_lib::run().await
}
