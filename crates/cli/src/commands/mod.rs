//! CLI command implementations.

pub mod catalog;
pub mod decorate;
pub mod price;

use eecol_storefront::config::StorefrontConfig;
use eecol_storefront::state::AppState;

/// Application state built from the storefront environment.
///
/// # Errors
///
/// Returns an error if the storefront configuration is incomplete.
pub fn load_state() -> Result<AppState, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    Ok(AppState::new(config))
}
