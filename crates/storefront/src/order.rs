//! Completed orders.

use chrono::{DateTime, Utc};
use mithai_core::{OrderId, OrderStatus, PaymentMethod, Price};
use serde::Serialize;
use uuid::Uuid;

use crate::cart::CartLine;
use crate::checkout::ReceiverDetails;

/// Receipt for a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub transaction_id: Uuid,
    pub lines: Vec<CartLine>,
    pub total: Price,
    pub method: PaymentMethod,
    pub status: OrderStatus,
    pub receiver: ReceiverDetails,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Number of stickers across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }
}
