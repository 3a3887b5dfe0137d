//! Checkout wizard.
//!
//! # State Machine
//!
//! ```text
//!            open            proceed              submit_receiver
//! Closed ─────────▶ Cart ─────────▶ ReceiverDetails ─────────────▶ Payment
//!   ▲                ◀──── back ────      ◀────────── back ──────────  │
//!   │                                                                  │ begin_payment
//!   │  cancel (any step except Processing)                             ▼
//!   └──────────────────────────────────────── finish_payment(Ok) ── Processing
//!                                       finish_payment(Err) ──▶ Payment
//! ```
//!
//! Cancelling discards any receiver or payment input; the cart is owned by
//! the caller and is never touched here. While a payment is in flight the
//! wizard refuses to go back or close.

pub mod gateway;
pub mod payment;
pub mod receiver;

use chrono::NaiveDate;
use mithai_core::PaymentMethod;
use thiserror::Error;

pub use gateway::{
    GENERIC_PAYMENT_FAILURE, MockPaymentGateway, PaymentError, PaymentGateway, PaymentLine,
    PaymentReceipt, PaymentRequest,
};
pub use payment::{CardDetails, CardExpiry, CardForm, PaymentDetails, PaymentForm};
pub use receiver::{ReceiverDetails, ReceiverForm};

use crate::validation::{Field, FieldErrors};

/// Errors raised by checkout transitions.
#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    /// Checkout cannot start from an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The requested transition is not available from the current step.
    #[error("cannot {action} from the {step} step")]
    InvalidTransition {
        /// Step the wizard was in.
        step: &'static str,
        /// Transition that was attempted.
        action: &'static str,
    },

    /// A payment is being processed; the wizard is locked until it settles.
    #[error("a payment is being processed")]
    PaymentInFlight,

    /// Receiver details failed validation.
    #[error("receiver details are invalid: {0}")]
    InvalidReceiver(FieldErrors),

    /// The payment step failed.
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// Current step of the wizard.
#[derive(Debug, Clone, Default)]
pub enum CheckoutStep {
    /// Panel not shown.
    #[default]
    Closed,
    /// Reviewing cart lines.
    Cart,
    /// Entering receiver details; `errors` holds the last rejected submission.
    ReceiverDetails { errors: FieldErrors },
    /// Entering payment details for a validated receiver.
    Payment {
        receiver: ReceiverDetails,
        error: Option<PaymentError>,
    },
    /// Waiting for the gateway.
    Processing {
        receiver: ReceiverDetails,
        method: PaymentMethod,
    },
}

impl CheckoutStep {
    /// Short name used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Cart => "cart",
            Self::ReceiverDetails { .. } => "receiver-details",
            Self::Payment { .. } => "payment",
            Self::Processing { .. } => "processing",
        }
    }

    /// 1-based position in the three visible steps, `None` when closed.
    #[must_use]
    pub const fn position(&self) -> Option<u8> {
        match self {
            Self::Closed => None,
            Self::Cart => Some(1),
            Self::ReceiverDetails { .. } => Some(2),
            Self::Payment { .. } | Self::Processing { .. } => Some(3),
        }
    }
}

/// User-driven transitions that need no external input beyond a form.
#[derive(Debug, Clone)]
pub enum CheckoutAction {
    /// Show the cart panel.
    Open,
    /// Move from cart review to receiver details.
    Proceed,
    /// Submit the receiver details form.
    SubmitReceiver(ReceiverForm),
    /// Go one step back.
    Back,
    /// Close the wizard, discarding form input.
    Cancel,
    /// Drop the inline error for a field the user is editing.
    ClearFieldError(Field),
}

/// The checkout wizard.
#[derive(Debug, Clone, Default)]
pub struct CheckoutFlow {
    step: CheckoutStep,
}

impl CheckoutFlow {
    /// A closed wizard.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step: CheckoutStep::Closed,
        }
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> &CheckoutStep {
        &self.step
    }

    /// Returns true if the panel is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self.step, CheckoutStep::Closed)
    }

    /// Returns true while a payment is in flight.
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        matches!(self.step, CheckoutStep::Processing { .. })
    }

    /// Apply a form-level action. `cart_is_empty` gates [`CheckoutAction::Proceed`].
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the transition is not allowed from the
    /// current step or the submitted form is invalid.
    pub fn apply(&mut self, action: CheckoutAction, cart_is_empty: bool) -> Result<(), CheckoutError> {
        match action {
            CheckoutAction::Open => {
                self.open();
                Ok(())
            }
            CheckoutAction::Proceed => self.proceed(cart_is_empty),
            CheckoutAction::SubmitReceiver(form) => self.submit_receiver(&form),
            CheckoutAction::Back => self.back(),
            CheckoutAction::Cancel => self.cancel(),
            CheckoutAction::ClearFieldError(field) => {
                self.clear_field_error(field);
                Ok(())
            }
        }
    }

    /// Drop the inline error recorded for `field` on the current step.
    ///
    /// Once the last payment field error is gone the payment step shows no
    /// error at all. Other steps carry no field errors and are left alone.
    pub fn clear_field_error(&mut self, field: Field) {
        match &mut self.step {
            CheckoutStep::ReceiverDetails { errors } => errors.clear(field),
            CheckoutStep::Payment { error, .. } => {
                if let Some(PaymentError::Validation(errors)) = error {
                    errors.clear(field);
                    if errors.is_empty() {
                        *error = None;
                    }
                }
            }
            _ => {}
        }
    }

    /// Show the cart panel. Already-open wizards keep their step.
    pub fn open(&mut self) {
        if matches!(self.step, CheckoutStep::Closed) {
            self.transition(CheckoutStep::Cart);
        }
    }

    /// Cart review to receiver details.
    ///
    /// # Errors
    ///
    /// Fails on an empty cart or outside the cart step.
    pub fn proceed(&mut self, cart_is_empty: bool) -> Result<(), CheckoutError> {
        match self.step {
            CheckoutStep::Cart if cart_is_empty => Err(CheckoutError::EmptyCart),
            CheckoutStep::Cart => {
                self.transition(CheckoutStep::ReceiverDetails {
                    errors: FieldErrors::new(),
                });
                Ok(())
            }
            _ => Err(self.invalid("proceed")),
        }
    }

    /// Validate the receiver form and move on to payment.
    ///
    /// On failure the wizard stays on receiver details with the errors recorded.
    ///
    /// # Errors
    ///
    /// Fails outside the receiver step or when validation fails.
    pub fn submit_receiver(&mut self, form: &ReceiverForm) -> Result<(), CheckoutError> {
        let CheckoutStep::ReceiverDetails { errors } = &mut self.step else {
            return Err(self.invalid("submit receiver details"));
        };

        match form.validate() {
            Ok(receiver) => {
                self.transition(CheckoutStep::Payment {
                    receiver,
                    error: None,
                });
                Ok(())
            }
            Err(rejected) => {
                *errors = rejected.clone();
                tracing::debug!(%rejected, "receiver details rejected");
                Err(CheckoutError::InvalidReceiver(rejected))
            }
        }
    }

    /// One step back: payment to receiver details, receiver details to cart.
    ///
    /// # Errors
    ///
    /// Fails while processing, and on the cart or closed steps.
    pub fn back(&mut self) -> Result<(), CheckoutError> {
        match self.step {
            CheckoutStep::ReceiverDetails { .. } => {
                self.transition(CheckoutStep::Cart);
                Ok(())
            }
            CheckoutStep::Payment { .. } => {
                self.transition(CheckoutStep::ReceiverDetails {
                    errors: FieldErrors::new(),
                });
                Ok(())
            }
            CheckoutStep::Processing { .. } => Err(CheckoutError::PaymentInFlight),
            CheckoutStep::Closed | CheckoutStep::Cart => Err(self.invalid("go back")),
        }
    }

    /// Close the wizard from any step, discarding receiver and payment input.
    ///
    /// # Errors
    ///
    /// Fails while a payment is in flight.
    pub fn cancel(&mut self) -> Result<(), CheckoutError> {
        if self.is_processing() {
            return Err(CheckoutError::PaymentInFlight);
        }
        if self.is_open() {
            self.transition(CheckoutStep::Closed);
        }
        Ok(())
    }

    /// Validate payment input and lock the wizard into processing.
    ///
    /// Returns the receiver and the validated payment details to hand to a
    /// gateway. On validation failure the wizard stays on the payment step
    /// with the error recorded.
    ///
    /// # Errors
    ///
    /// Fails outside the payment step or when validation fails.
    pub fn begin_payment(
        &mut self,
        form: &PaymentForm,
        today: NaiveDate,
    ) -> Result<(ReceiverDetails, PaymentDetails), CheckoutError> {
        let CheckoutStep::Payment { receiver, error } = &mut self.step else {
            return Err(self.invalid("pay"));
        };

        match form.validate(today) {
            Ok(details) => {
                let receiver = receiver.clone();
                self.transition(CheckoutStep::Processing {
                    receiver: receiver.clone(),
                    method: details.method(),
                });
                Ok((receiver, details))
            }
            Err(errors) => {
                let err = PaymentError::Validation(errors);
                *error = Some(err.clone());
                tracing::debug!(error = %err, "payment details rejected");
                Err(err.into())
            }
        }
    }

    /// Settle an in-flight payment.
    ///
    /// Success closes the wizard and returns the receiver the order was for.
    /// Failure returns to the payment step with the error recorded.
    ///
    /// # Errors
    ///
    /// Fails when no payment is in flight, or passes the gateway error through.
    pub fn finish_payment(
        &mut self,
        outcome: Result<PaymentReceipt, PaymentError>,
    ) -> Result<(ReceiverDetails, PaymentReceipt), CheckoutError> {
        let receiver = match std::mem::take(&mut self.step) {
            CheckoutStep::Processing { receiver, .. } => receiver,
            other => {
                self.step = other;
                return Err(self.invalid("finish payment"));
            }
        };

        match outcome {
            Ok(receipt) => {
                tracing::debug!(from = "processing", to = "closed", "checkout transition");
                Ok((receiver, receipt))
            }
            Err(err) => {
                tracing::warn!(error = %err, "payment failed");
                tracing::debug!(from = "processing", to = "payment", "checkout transition");
                self.step = CheckoutStep::Payment {
                    receiver,
                    error: Some(err.clone()),
                };
                Err(err.into())
            }
        }
    }

    fn transition(&mut self, next: CheckoutStep) {
        tracing::debug!(from = self.step.name(), to = next.name(), "checkout transition");
        self.step = next;
    }

    fn invalid(&self, action: &'static str) -> CheckoutError {
        let err = CheckoutError::InvalidTransition {
            step: self.step.name(),
            action,
        };
        tracing::warn!(error = %err, "rejected checkout transition");
        err
    }
}
