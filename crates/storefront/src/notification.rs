//! Transient notifications.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Toast shown after a successful checkout.
pub const CHECKOUT_SUCCESS_MESSAGE: &str = "Order Placed Successfully!";

/// Second line of the checkout toast.
pub const CHECKOUT_SUCCESS_DETAIL: &str = "Check your history for details";

/// Kind of toast, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Info,
}

/// A toast that dismisses itself once `expires_at` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub kind: NotificationKind,
    pub shown_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    /// A success toast shown at `now` for `ttl`.
    #[must_use]
    pub fn success(message: impl Into<String>, now: DateTime<Utc>, ttl: std::time::Duration) -> Self {
        Self::new(message, NotificationKind::Success, now, ttl)
    }

    /// A toast of any kind shown at `now` for `ttl`.
    ///
    /// A `ttl` too large for a calendar duration never expires in practice.
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        kind: NotificationKind,
        now: DateTime<Utc>,
        ttl: std::time::Duration,
    ) -> Self {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            message: message.into(),
            detail: None,
            kind,
            shown_at: now,
            expires_at,
        }
    }

    /// Attach a second, smaller line of text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Returns true once `now` has reached the expiry instant.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
