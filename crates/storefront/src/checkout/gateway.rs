//! Payment processing seam.
//!
//! The storefront talks to payments only through [`PaymentGateway`]. The
//! shipped implementation is [`MockPaymentGateway`], which waits a fixed
//! latency and then approves every request. A real processor slots in
//! behind the same trait.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mithai_core::{ItemId, OrderId, PaymentMethod, Price};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use super::payment::PaymentDetails;
use super::receiver::ReceiverDetails;
use crate::validation::FieldErrors;

/// Message shown when processing fails for any reason other than validation.
pub const GENERIC_PAYMENT_FAILURE: &str = "Payment processing failed. Please try again.";

/// Errors from the payment step.
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    /// One or more payment fields failed validation.
    #[error("payment details are invalid: {0}")]
    Validation(FieldErrors),

    /// The processor could not be reached or rejected the request.
    #[error("payment transport error: {0}")]
    Transport(String),
}

impl PaymentError {
    /// Message suitable for the inline error banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors.to_string(),
            Self::Transport(_) => GENERIC_PAYMENT_FAILURE.to_string(),
        }
    }
}

/// One priced line of a payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLine {
    pub item_id: ItemId,
    pub quantity: u32,
    pub unit_price: Price,
}

/// Everything a processor needs to charge for an order.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub amount: Price,
    pub lines: Vec<PaymentLine>,
    pub receiver: ReceiverDetails,
    pub payment: PaymentDetails,
}

/// Proof of a successful charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub transaction_id: Uuid,
    pub order_id: OrderId,
    pub amount: Price,
    pub method: PaymentMethod,
    pub processed_at: DateTime<Utc>,
}

/// A payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Transport`] if the charge could not be made.
    async fn process(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PaymentError>;
}

/// Simulated processor: fixed delay, then unconditional success.
#[derive(Debug, Clone)]
pub struct MockPaymentGateway {
    latency: Duration,
}

impl MockPaymentGateway {
    /// Create a mock gateway that answers after `latency`.
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Configured processing delay.
    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    #[instrument(skip(self, request), fields(order_id = %request.order_id, amount = %request.amount))]
    async fn process(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PaymentError> {
        tokio::time::sleep(self.latency).await;

        let receipt = PaymentReceipt {
            transaction_id: Uuid::new_v4(),
            order_id: request.order_id,
            amount: request.amount,
            method: request.payment.method(),
            processed_at: Utc::now(),
        };
        tracing::info!(
            transaction_id = %receipt.transaction_id,
            method = %receipt.method,
            lines = request.lines.len(),
            "mock payment approved"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mithai_core::{CurrencyCode, Email};

    use super::*;

    fn request() -> PaymentRequest {
        PaymentRequest {
            order_id: OrderId::generate(),
            amount: Price::whole(50, CurrencyCode::INR),
            lines: vec![PaymentLine {
                item_id: ItemId::from("jalebi"),
                quantity: 2,
                unit_price: Price::whole(25, CurrencyCode::INR),
            }],
            receiver: ReceiverDetails {
                sender_name: None,
                receiver_name: Some("Meera".to_string()),
                phone: None,
                email: Some(Email::parse("meera@example.com").unwrap()),
                message: None,
            },
            payment: PaymentDetails::Upi {
                upi_id: "asha@upi".to_string(),
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_gateway_waits_then_approves() {
        let gateway = MockPaymentGateway::new(Duration::from_secs(2));
        let request = request();

        let started = tokio::time::Instant::now();
        let receipt = gateway.process(&request).await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(receipt.order_id, request.order_id);
        assert_eq!(receipt.amount, request.amount);
        assert_eq!(receipt.method, PaymentMethod::Upi);
    }

    #[test]
    fn test_gateway_is_object_safe() {
        let gateway = MockPaymentGateway::new(Duration::ZERO);
        let _dyn: &dyn PaymentGateway = &gateway;
    }

    #[test]
    fn test_transport_error_has_generic_message() {
        let err = PaymentError::Transport("connection reset".to_string());
        assert_eq!(err.user_message(), GENERIC_PAYMENT_FAILURE);
    }
}
