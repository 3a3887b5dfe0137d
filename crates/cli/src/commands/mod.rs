//! Subcommand implementations.

pub mod browse;
pub mod checkout;
pub mod history;

use mithai_storefront::{Store, StorefrontConfig};

use crate::error::CliError;

/// Load configuration and open a fresh session.
pub fn open_store() -> Result<Store, CliError> {
    let config = StorefrontConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");
    Ok(Store::from_config(config))
}
