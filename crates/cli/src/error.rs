//! CLI errors.

use mithai_storefront::AppError;
use mithai_storefront::config::ConfigError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Storefront operation failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// An `--item` argument was not `id` or `id:quantity`.
    #[error("Invalid item '{0}': expected id or id:quantity")]
    InvalidItemSpec(String),

    /// No category with this id.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}
