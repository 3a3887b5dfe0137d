//! Application state and the store that mutates it.
//!
//! All mutation goes through [`Store`]. Each call changes one slice of
//! [`AppState`] synchronously and then publishes a [`StateChange`] for every
//! slice it touched, so a host can re-render only what moved.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use mithai_core::{Direction, OrderId, OrderStatus};
use tokio::sync::broadcast;
use tracing::instrument;

use crate::cart::{Cart, CartAction};
use crate::catalog::Catalog;
use crate::checkout::{
    CheckoutAction, CheckoutError, CheckoutFlow, MockPaymentGateway, PaymentError, PaymentForm,
    PaymentGateway, PaymentLine, PaymentReceipt, PaymentRequest,
};
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::history::{CollectionSummary, HistoryStore, NewHistoryEntry};
use crate::notification::{CHECKOUT_SUCCESS_DETAIL, CHECKOUT_SUCCESS_MESSAGE, Notification};
use crate::order::Order;
use crate::search::{SearchResults, search};
use crate::view::{ViewAction, ViewState};

/// Buffered changes per subscriber before the slowest one starts lagging.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Which slice of state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateChange {
    Cart,
    Checkout,
    History,
    View,
    /// Toast or error banner.
    Notification,
}

/// A mutation routed to one slice of state.
#[derive(Debug, Clone)]
pub enum Action {
    Cart(CartAction),
    Checkout(CheckoutAction),
    View(ViewAction),
}

impl From<CartAction> for Action {
    fn from(action: CartAction) -> Self {
        Self::Cart(action)
    }
}

impl From<CheckoutAction> for Action {
    fn from(action: CheckoutAction) -> Self {
        Self::Checkout(action)
    }
}

impl From<ViewAction> for Action {
    fn from(action: ViewAction) -> Self {
        Self::View(action)
    }
}

/// Everything the storefront shows.
#[derive(Debug, Clone)]
pub struct AppState {
    catalog: Catalog,
    cart: Cart,
    checkout: CheckoutFlow,
    history: HistoryStore,
    view: ViewState,
    notification: Option<Notification>,
    error: Option<String>,
}

impl AppState {
    /// Fresh session state over `catalog`.
    #[must_use]
    pub fn new(catalog: Catalog, history: HistoryStore) -> Self {
        Self {
            catalog,
            cart: Cart::new(),
            checkout: CheckoutFlow::new(),
            history,
            view: ViewState::new(),
            notification: None,
            error: None,
        }
    }

    /// Get a reference to the catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get a reference to the cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Get a reference to the checkout wizard.
    #[must_use]
    pub const fn checkout(&self) -> &CheckoutFlow {
        &self.checkout
    }

    /// Get a reference to the history log.
    #[must_use]
    pub const fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Get a reference to the view state.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// The toast currently held, if any, whether or not it has expired.
    #[must_use]
    pub const fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// The toast still visible at `now`.
    #[must_use]
    pub fn notification_at(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.notification
            .as_ref()
            .filter(|toast| !toast.is_expired(now))
    }

    /// The error banner message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true if the cart overlay (checkout wizard) is open.
    #[must_use]
    pub const fn is_cart_open(&self) -> bool {
        self.checkout.is_open()
    }

    /// The floating cart button only shows when there is something in the cart.
    #[must_use]
    pub fn show_floating_cart(&self) -> bool {
        !self.cart.is_empty()
    }

    /// Catalog items matching the current search query.
    #[must_use]
    pub fn search_results(&self) -> SearchResults<'_> {
        search(&self.catalog, self.view.query())
    }

    /// The "my stickers" aggregate over the history log.
    #[must_use]
    pub fn collection_summary(&self) -> CollectionSummary {
        self.history.collection_summary()
    }
}

/// Owns [`AppState`] and publishes a [`StateChange`] after every mutation.
pub struct Store {
    state: AppState,
    config: StorefrontConfig,
    gateway: Arc<dyn PaymentGateway>,
    changes: broadcast::Sender<StateChange>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("subscribers", &self.changes.receiver_count())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Create a store using `gateway` for payments.
    ///
    /// History is seeded relative to the current time when
    /// [`StorefrontConfig::seed_history`] is set.
    #[must_use]
    pub fn new(config: StorefrontConfig, gateway: Arc<dyn PaymentGateway>) -> Self {
        let catalog = Catalog::builtin(config.currency);
        let history = if config.seed_history {
            HistoryStore::seeded(&catalog, Utc::now())
        } else {
            HistoryStore::new()
        };
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        Self {
            state: AppState::new(catalog, history),
            config,
            gateway,
            changes,
        }
    }

    /// Create a store backed by the mock gateway with the configured latency.
    #[must_use]
    pub fn from_config(config: StorefrontConfig) -> Self {
        let gateway = Arc::new(MockPaymentGateway::new(config.payment_latency));
        Self::new(config, gateway)
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Subscribe to state changes made after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }

    /// Apply one action.
    ///
    /// # Errors
    ///
    /// Cart changes are refused while a payment is in flight. Checkout
    /// actions fail when the transition is not allowed or the submitted form
    /// is invalid.
    #[instrument(skip(self), level = "debug")]
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Cart(action) => {
                if self.state.checkout.is_processing() {
                    return Err(CheckoutError::PaymentInFlight.into());
                }
                if self.state.cart.apply(action) {
                    self.publish(StateChange::Cart);
                }
                Ok(())
            }
            Action::Checkout(action) => {
                let cart_is_empty = self.state.cart.is_empty();
                let result = self.state.checkout.apply(action, cart_is_empty);
                // A rejected receiver form still records its field errors.
                if matches!(result, Ok(()) | Err(CheckoutError::InvalidReceiver(_))) {
                    self.publish(StateChange::Checkout);
                }
                result.map_err(AppError::from)
            }
            Action::View(action) => {
                if self.state.view.apply(action) {
                    self.publish(StateChange::View);
                }
                Ok(())
            }
        }
    }

    /// Add one unit of the catalog item `id` to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownItem`] if the catalog has no such item.
    pub fn add_item(&mut self, id: &str) -> Result<()> {
        let item = self
            .state
            .catalog
            .item(id)
            .cloned()
            .ok_or_else(|| AppError::UnknownItem(id.to_string()))?;
        self.dispatch(Action::Cart(CartAction::Add(item)))
    }

    /// Consume a pending search-focus request.
    pub fn search_focused(&mut self) -> bool {
        let focused = self.state.view.search_focused();
        if focused {
            self.publish(StateChange::View);
        }
        focused
    }

    /// Validate payment input and lock checkout into processing.
    ///
    /// Returns the request to hand to a [`PaymentGateway`]. Follow up with
    /// [`Store::complete_payment`].
    ///
    /// # Errors
    ///
    /// Fails on an empty cart, outside the payment step, or when the payment
    /// form is invalid.
    #[instrument(skip(self, form))]
    pub fn begin_payment(&mut self, form: &PaymentForm, today: NaiveDate) -> Result<PaymentRequest> {
        if self.state.cart.is_empty() {
            return Err(CheckoutError::EmptyCart.into());
        }

        // A new attempt replaces any earlier failure banner.
        self.clear_error();

        let result = self.state.checkout.begin_payment(form, today);
        self.publish(StateChange::Checkout);
        let (receiver, payment) = result?;

        let lines = self
            .state
            .cart
            .lines()
            .iter()
            .map(|line| PaymentLine {
                item_id: line.item.id.clone(),
                quantity: line.quantity(),
                unit_price: line.item.price,
            })
            .collect();
        let request = PaymentRequest {
            order_id: OrderId::generate(),
            amount: self.state.cart.total_price(self.config.currency),
            lines,
            receiver,
            payment,
        };

        tracing::debug!(order_id = %request.order_id, amount = %request.amount, "payment started");
        Ok(request)
    }

    /// Apply the gateway's answer to an in-flight payment.
    ///
    /// On success every cart line becomes a "sent" history entry stamped
    /// `now`, the cart is emptied, checkout closes and the success toast
    /// shows. On failure checkout returns to the payment step and the error
    /// banner shows the generic message.
    ///
    /// # Errors
    ///
    /// Fails when no payment is in flight, or passes the gateway error through.
    #[instrument(skip(self, outcome))]
    pub fn complete_payment(
        &mut self,
        outcome: std::result::Result<PaymentReceipt, PaymentError>,
        now: DateTime<Utc>,
    ) -> Result<Order> {
        let (receiver, receipt) = match self.state.checkout.finish_payment(outcome) {
            Ok(settled) => settled,
            Err(err @ CheckoutError::Payment(_)) => {
                let err = AppError::from(err);
                self.state.error = Some(err.user_message());
                self.publish(StateChange::Checkout);
                self.publish(StateChange::Notification);
                return Err(err);
            }
            Err(err) => return Err(err.into()),
        };

        let lines = self.state.cart.drain();
        for line in &lines {
            self.state.history.add_entry(
                NewHistoryEntry {
                    item: line.item.clone(),
                    quantity: line.quantity(),
                    direction: Direction::Sent,
                    sender_name: receiver.sender_name.clone(),
                    receiver_name: receiver.receiver_name.clone(),
                },
                now,
            );
        }

        self.state.notification = Some(Notification::success(
            CHECKOUT_SUCCESS_MESSAGE,
            now,
            self.config.notification_ttl,
        )
        .with_detail(CHECKOUT_SUCCESS_DETAIL));
        self.state.error = None;

        let order = Order {
            id: receipt.order_id,
            transaction_id: receipt.transaction_id,
            lines,
            total: receipt.amount,
            method: receipt.method,
            status: OrderStatus::Completed,
            receiver,
            created_at: now,
        };
        tracing::info!(
            order_id = %order.id,
            total = %order.total,
            items = order.total_items(),
            recipient = %order.receiver.recipient_label(),
            "checkout completed"
        );

        for change in [
            StateChange::Cart,
            StateChange::Checkout,
            StateChange::History,
            StateChange::Notification,
        ] {
            self.publish(change);
        }
        Ok(order)
    }

    /// Validate, charge through the configured gateway, and settle.
    ///
    /// History entries and the toast are stamped with the receipt's
    /// processing time.
    ///
    /// # Errors
    ///
    /// See [`Store::begin_payment`] and [`Store::complete_payment`].
    pub async fn pay(&mut self, form: &PaymentForm, today: NaiveDate) -> Result<Order> {
        let request = self.begin_payment(form, today)?;
        let gateway = Arc::clone(&self.gateway);
        let outcome = gateway.process(&request).await;
        let now = outcome
            .as_ref()
            .map_or_else(|_| Utc::now(), |receipt| receipt.processed_at);
        self.complete_payment(outcome, now)
    }

    /// Drop the toast once it has expired. Returns true if it was dismissed.
    pub fn dismiss_expired(&mut self, now: DateTime<Utc>) -> bool {
        let expired = self
            .state
            .notification
            .as_ref()
            .is_some_and(|toast| toast.is_expired(now));
        if expired {
            self.state.notification = None;
            self.publish(StateChange::Notification);
        }
        expired
    }

    /// Hide the error banner.
    pub fn clear_error(&mut self) {
        if self.state.error.take().is_some() {
            self.publish(StateChange::Notification);
        }
    }

    fn publish(&self, change: StateChange) {
        // No subscribers is fine.
        let _ = self.changes.send(change);
    }
}
