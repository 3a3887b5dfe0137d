//! Unified error handling.
//!
//! Provides a unified `AppError` type for everything a host can trigger
//! through the [`Store`](crate::state::Store). Store operations return
//! `Result<T, AppError>`.

use thiserror::Error;

use crate::checkout::{CheckoutError, PaymentError};
use crate::config::ConfigError;

/// Banner text for failures the user cannot act on.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Checkout transition was rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// No catalog item with this id.
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        Self::Checkout(CheckoutError::Payment(err))
    }
}

impl AppError {
    /// Message safe to show in the error banner.
    ///
    /// Validation failures are passed through; anything else collapses to a
    /// generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Checkout(CheckoutError::Payment(err)) => err.user_message(),
            Self::Checkout(CheckoutError::InvalidReceiver(errors)) => errors.to_string(),
            Self::Checkout(CheckoutError::EmptyCart) => "Your cart is empty".to_string(),
            Self::Checkout(CheckoutError::PaymentInFlight) => {
                "Please wait while we process your payment".to_string()
            }
            Self::UnknownItem(id) => format!("No sticker called '{id}'"),
            Self::Checkout(CheckoutError::InvalidTransition { .. })
            | Self::Config(_)
            | Self::Internal(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// Returns true for errors caused by user input rather than the system.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownItem(_)
                | Self::Checkout(
                    CheckoutError::EmptyCart
                        | CheckoutError::InvalidReceiver(_)
                        | CheckoutError::Payment(PaymentError::Validation(_))
                )
        )
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
