//! Wire shapes for the backend contract.
//!
//! Field names are `camelCase` on the wire. Amounts are JSON numbers.

use chrono::{DateTime, Utc};
use mithai_core::{
    CartId, CategoryId, Direction, Email, HistoryEntryId, ItemId, OrderId, OrderStatus, RecipientId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::catalog::Item;
use crate::checkout::ReceiverDetails;
use crate::history::HistoryEntry;
use crate::order::Order;

/// A catalog item as the backend serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerDto {
    pub id: ItemId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: CategoryId,
    pub emoji: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&Item> for StickerDto {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price.amount,
            category: item.category.clone(),
            emoji: item.glyph.clone(),
            image: None,
        }
    }
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub id: String,
    pub sticker_id: ItemId,
    pub sticker: StickerDto,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartItemDto {
    /// Wire form of a cart line. The local cart keys lines by item id.
    #[must_use]
    pub fn from_line(line: &CartLine, added_at: DateTime<Utc>) -> Self {
        Self {
            id: line.item.id.to_string(),
            sticker_id: line.item.id.clone(),
            sticker: StickerDto::from(&line.item),
            quantity: line.quantity(),
            added_at,
        }
    }
}

/// A user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    pub id: CartId,
    pub user_id: String,
    pub items: Vec<CartItemDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartDto {
    /// Snapshot of the local cart, stamped `now`.
    #[must_use]
    pub fn from_cart(cart: &Cart, id: CartId, user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemDto::from_line(line, now))
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `POST /cart/items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub sticker_id: ItemId,
    pub quantity: u32,
}

/// Body of `PATCH /cart/items/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

/// A history record as the backend serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItemDto {
    pub id: HistoryEntryId,
    pub user_id: String,
    pub sticker_id: ItemId,
    pub sticker: StickerDto,
    pub quantity: u32,
    #[serde(rename = "type")]
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<RecipientId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HistoryItemDto {
    /// Wire form of a history entry.
    ///
    /// The counterpart name stands in for the recipient or sender id until
    /// the backend issues real ones.
    #[must_use]
    pub fn from_entry(entry: &HistoryEntry, user_id: impl Into<String>) -> Self {
        let (recipient_id, sender_id) = match entry.direction {
            Direction::Sent => (entry.receiver_name.clone().map(RecipientId::new), None),
            Direction::Received => (None, entry.sender_name.clone()),
        };
        Self {
            id: entry.id,
            user_id: user_id.into(),
            sticker_id: entry.item.id.clone(),
            sticker: StickerDto::from(&entry.item),
            quantity: entry.quantity,
            direction: entry.direction,
            recipient_id,
            sender_id,
            created_at: entry.timestamp,
        }
    }
}

/// Body of `POST /cart/checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub cart_id: CartId,
    pub recipient_id: RecipientId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckoutRequest {
    /// Request for checking out `cart_id` to `receiver`.
    #[must_use]
    pub fn for_receiver(cart_id: CartId, receiver: &ReceiverDetails) -> Self {
        Self {
            cart_id,
            recipient_id: RecipientId::new(receiver.recipient_label()),
            message: receiver.message.clone(),
        }
    }
}

/// Response of `POST /cart/checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub items: Vec<CartItemDto>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for CheckoutResponse {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            status: order.status,
            items: order
                .lines
                .iter()
                .map(|line| CartItemDto::from_line(line, order.created_at))
                .collect(),
            total: order.total.amount,
            created_at: order.created_at,
        }
    }
}

/// A storefront user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub email: Email,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
