//! Integration tests for Mithai Stickers.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mithai-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart to receipt through the `Store`
//! - `cart_properties` - Randomised cart invariants
//! - `history_collection` - History queries and the collection summary
//! - `api_contract` - Wire shapes and endpoint paths
//!
//! Shared fixtures live here.

use std::time::Duration;

use chrono::NaiveDate;
use mithai_storefront::checkout::{CardForm, CheckoutAction, PaymentForm, ReceiverForm};
use mithai_storefront::{Store, StorefrontConfig};

/// Date every payment is validated against.
#[must_use]
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap_or_default()
}

/// Unseeded, instant-payment configuration.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        payment_latency: Duration::ZERO,
        seed_history: false,
        ..StorefrontConfig::default()
    }
}

/// A fresh store over [`test_config`].
#[must_use]
pub fn store() -> Store {
    Store::from_config(test_config())
}

/// A receiver form that validates.
#[must_use]
pub fn receiver() -> ReceiverForm {
    let mut form = ReceiverForm {
        sender_name: "Asha".to_string(),
        receiver_name: "Meera".to_string(),
        ..ReceiverForm::default()
    };
    form.set_email("meera@example.com");
    form.set_message("Happy Diwali!");
    form
}

/// A card payment form that validates against [`today`].
#[must_use]
pub fn valid_card() -> PaymentForm {
    let mut card = CardForm::default();
    card.set_number("4111 1111 1111 1111");
    card.set_name("Asha Rao");
    card.set_expiry("12/28");
    card.set_cvv("123");
    PaymentForm::card(card)
}

/// Drive `store` from a closed wizard to the payment step.
///
/// # Errors
///
/// Returns the first rejected transition.
pub fn walk_to_payment(store: &mut Store) -> mithai_storefront::Result<()> {
    store.dispatch(CheckoutAction::Open.into())?;
    store.dispatch(CheckoutAction::Proceed.into())?;
    store.dispatch(CheckoutAction::SubmitReceiver(receiver()).into())
}
