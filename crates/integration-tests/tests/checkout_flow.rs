//! End-to-end checkout through the `Store`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mithai_core::{Direction, OrderStatus};
use mithai_integration_tests::{receiver, store, test_config, today, valid_card, walk_to_payment};
use mithai_storefront::checkout::{
    CheckoutAction, CheckoutError, CheckoutStep, GENERIC_PAYMENT_FAILURE, PaymentError, PaymentForm,
    PaymentGateway, PaymentReceipt, PaymentRequest, ReceiverForm,
};
use mithai_storefront::notification::CHECKOUT_SUCCESS_MESSAGE;
use mithai_storefront::validation::Field;
use mithai_storefront::{AppError, StateChange, Store, StorefrontConfig};

struct DownGateway;

#[async_trait]
impl PaymentGateway for DownGateway {
    async fn process(&self, _request: &PaymentRequest) -> Result<PaymentReceipt, PaymentError> {
        Err(PaymentError::Transport("connection refused".to_string()))
    }
}

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn test_checkout_moves_every_line_into_history() {
    let mut store = store();
    store.add_item("jalebi").unwrap();
    store.add_item("jalebi").unwrap();
    store.add_item("motichoor").unwrap();
    store.add_item("samosa").unwrap();
    assert_eq!(store.state().cart().lines().len(), 3);

    walk_to_payment(&mut store).unwrap();
    let order = store.pay(&valid_card(), today()).await.unwrap();

    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.total.to_string(), "₹93");
    assert_eq!(order.total_items(), 4);

    let state = store.state();
    assert!(state.cart().is_empty());
    assert!(!state.show_floating_cart());
    assert!(!state.checkout().is_open());

    let history: Vec<_> = state.history().entries().collect();
    assert_eq!(history.len(), 3);
    assert!(history.iter().all(|e| e.direction == Direction::Sent));
    assert!(history.iter().all(|e| e.counterpart() == Some("Meera")));

    // Each line was prepended in cart order, so the last line is newest.
    let ids: Vec<_> = history.iter().map(|e| e.item.id.as_str()).collect();
    assert_eq!(ids, ["samosa", "motichoor", "jalebi"]);
    assert_eq!(history[2].quantity, 2);

    assert_eq!(
        state.notification().map(|n| n.message.as_str()),
        Some(CHECKOUT_SUCCESS_MESSAGE)
    );
}

#[tokio::test(start_paused = true)]
async fn test_payment_waits_configured_latency() {
    let mut store = Store::from_config(StorefrontConfig {
        payment_latency: Duration::from_millis(2000),
        ..test_config()
    });
    store.add_item("kheer").unwrap();
    walk_to_payment(&mut store).unwrap();

    let started = tokio::time::Instant::now();
    store.pay(&PaymentForm::upi("Meera@OkAxis"), today()).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(2000));
}

#[tokio::test]
async fn test_subscriber_sees_each_slice_change() {
    let mut store = store();
    let mut changes = store.subscribe();

    store.add_item("rabri").unwrap();
    walk_to_payment(&mut store).unwrap();
    store.pay(&valid_card(), today()).await.unwrap();

    let mut seen = Vec::new();
    while let Ok(change) = changes.try_recv() {
        seen.push(change);
    }
    assert_eq!(seen.first(), Some(&StateChange::Cart));
    for change in [
        StateChange::Checkout,
        StateChange::History,
        StateChange::Notification,
    ] {
        assert!(seen.contains(&change), "missing {change:?} in {seen:?}");
    }
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn test_receiver_without_contact_is_rejected_inline() {
    let mut store = store();
    store.add_item("rabri").unwrap();
    store.dispatch(CheckoutAction::Open.into()).unwrap();
    store.dispatch(CheckoutAction::Proceed.into()).unwrap();

    let err = store
        .dispatch(
            CheckoutAction::SubmitReceiver(ReceiverForm {
                receiver_name: "Meera".to_string(),
                ..ReceiverForm::default()
            })
            .into(),
        )
        .unwrap_err();

    let AppError::Checkout(CheckoutError::InvalidReceiver(errors)) = &err else {
        panic!("expected receiver errors, got {err:?}");
    };
    assert!(errors.contains(Field::Phone));
    assert!(errors.contains(Field::Email));

    // Typing into the email field drops only its error.
    store
        .dispatch(CheckoutAction::ClearFieldError(Field::Email).into())
        .unwrap();
    let CheckoutStep::ReceiverDetails { errors } = store.state().checkout().step() else {
        panic!("expected receiver step");
    };
    assert!(errors.contains(Field::Phone));
    assert!(!errors.contains(Field::Email));

    // Fixing the form moves on.
    store
        .dispatch(CheckoutAction::SubmitReceiver(receiver()).into())
        .unwrap();
    assert_eq!(store.state().checkout().step().name(), "payment");
}

#[tokio::test]
async fn test_gateway_failure_keeps_cart_and_shows_banner() {
    let mut store = Store::new(test_config(), Arc::new(DownGateway));
    store.add_item("gujiya").unwrap();
    walk_to_payment(&mut store).unwrap();

    let err = store.pay(&valid_card(), today()).await.unwrap_err();
    assert!(!err.is_user_error());

    let state = store.state();
    assert_eq!(state.error(), Some(GENERIC_PAYMENT_FAILURE));
    assert_eq!(state.cart().total_items(), 1);
    assert!(state.history().is_empty());
    assert_eq!(state.checkout().step().name(), "payment");
}

#[test]
fn test_cancel_preserves_cart_and_discards_receiver() {
    let mut store = store();
    store.add_item("sandesh").unwrap();
    walk_to_payment(&mut store).unwrap();

    store.dispatch(CheckoutAction::Cancel.into()).unwrap();
    assert!(!store.state().checkout().is_open());
    assert_eq!(store.state().cart().total_items(), 1);

    // Re-entering has to go through receiver details again.
    store.dispatch(CheckoutAction::Open.into()).unwrap();
    store.dispatch(CheckoutAction::Proceed.into()).unwrap();
    assert!(matches!(
        store.begin_payment(&valid_card(), today()),
        Err(AppError::Checkout(CheckoutError::InvalidTransition { .. }))
    ));
}

#[test]
fn test_processing_locks_cancel_back_and_cart() {
    let mut store = store();
    store.add_item("malpua").unwrap();
    walk_to_payment(&mut store).unwrap();
    let request = store.begin_payment(&valid_card(), today()).unwrap();
    assert_eq!(request.amount.to_string(), "₹30");

    for action in [CheckoutAction::Cancel, CheckoutAction::Back] {
        assert!(matches!(
            store.dispatch(action.into()),
            Err(AppError::Checkout(CheckoutError::PaymentInFlight))
        ));
    }
    assert!(store.add_item("malpua").is_err());
    assert!(store.state().checkout().is_processing());
}
