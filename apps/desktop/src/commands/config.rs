//! # Config Commands

use tracing::debug;

use crate::state::AppConfig;

/// Gets the current application configuration.
///
/// ## When Used
/// - App startup (company name, currency symbol)
/// - New rows (default tax rate)
pub fn get_config(config: &AppConfig) -> AppConfig {
    debug!("get_config command");
    config.clone()
}
