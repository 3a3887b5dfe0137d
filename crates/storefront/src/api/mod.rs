//! Contract for the future storefront backend.
//!
//! Nothing here is called by the local checkout. The endpoint list and wire
//! shapes pin down what a backend has to serve so both sides can be built
//! against the same definitions.

pub mod types;

use std::fmt;

use chrono::SecondsFormat;
use mithai_core::{CategoryId, HistoryEntryId, ItemId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::form_urlencoded;

use crate::history::{HistoryFilters, HistoryKind};

pub use types::{
    AddCartItemRequest, CartDto, CartItemDto, CheckoutRequest, CheckoutResponse, HistoryItemDto,
    StickerDto, UpdateQuantityRequest, UserDto,
};

/// Envelope status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
}

/// Errors unwrapping an [`ApiResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend reported an error.
    #[error("API error: {0}")]
    Remote(String),

    /// A success envelope carried no data.
    #[error("API response has no data")]
    MissingData,
}

/// Envelope around every response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub status: ApiStatus,
}

impl<T> ApiResponse<T> {
    /// A success envelope.
    pub const fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            status: ApiStatus::Success,
        }
    }

    /// An error envelope.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
            status: ApiStatus::Error,
        }
    }

    /// Unwrap the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Remote`] for error envelopes and
    /// [`ApiError::MissingData`] for a success without data.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self.status {
            ApiStatus::Success => self.data.ok_or(ApiError::MissingData),
            ApiStatus::Error => Err(ApiError::Remote(
                self.error.unwrap_or_else(|| "Unknown error".to_string()),
            )),
        }
    }
}

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        })
    }
}

/// Every backend endpoint the storefront expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Stickers,
    TrendingStickers,
    StickersByCategory(CategoryId),
    Cart,
    AddCartItem,
    UpdateCartItem(ItemId),
    RemoveCartItem(ItemId),
    ClearCart,
    Checkout,
    History(HistoryFilters),
    HistoryItem(HistoryEntryId),
}

impl Endpoint {
    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        match self {
            Self::Stickers
            | Self::TrendingStickers
            | Self::StickersByCategory(_)
            | Self::Cart
            | Self::History(_)
            | Self::HistoryItem(_) => Method::Get,
            Self::AddCartItem | Self::Checkout => Method::Post,
            Self::UpdateCartItem(_) => Method::Patch,
            Self::RemoveCartItem(_) | Self::ClearCart => Method::Delete,
        }
    }

    /// Path plus query string, relative to the API base.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Stickers => "/stickers".to_string(),
            Self::TrendingStickers => "/stickers/trending".to_string(),
            Self::StickersByCategory(category) => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("category", category.as_str())
                    .finish();
                format!("/stickers?{query}")
            }
            Self::Cart | Self::ClearCart => "/cart".to_string(),
            Self::AddCartItem => "/cart/items".to_string(),
            Self::UpdateCartItem(id) | Self::RemoveCartItem(id) => {
                format!("/cart/items/{}", encode_segment(id.as_str()))
            }
            Self::Checkout => "/cart/checkout".to_string(),
            Self::History(filters) => {
                let query = filters.to_query_string();
                if query.is_empty() {
                    "/history".to_string()
                } else {
                    format!("/history?{query}")
                }
            }
            Self::HistoryItem(id) => format!("/history/{id}"),
        }
    }

    /// Full URL under `base` (absolute or a path such as `/api`).
    #[must_use]
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }
}

impl HistoryFilters {
    /// Render as a URL query string without the leading `?`.
    ///
    /// `type=all` and zero limit or offset are left out, as are unset fields.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        match self.kind {
            Some(HistoryKind::Sent) => {
                query.append_pair("type", "sent");
            }
            Some(HistoryKind::Received) => {
                query.append_pair("type", "received");
            }
            Some(HistoryKind::All) | None => {}
        }
        if let Some(start) = self.start_date {
            query.append_pair("startDate", &start.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
        if let Some(end) = self.end_date {
            query.append_pair("endDate", &end.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
        if let Some(limit) = self.limit.filter(|&n| n > 0) {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = self.offset.filter(|&n| n > 0) {
            query.append_pair("offset", &offset.to_string());
        }
        query.finish()
    }
}

fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_endpoint_methods_and_paths() {
        let cases = [
            (Endpoint::Stickers, "GET", "/stickers"),
            (Endpoint::TrendingStickers, "GET", "/stickers/trending"),
            (
                Endpoint::StickersByCategory("milk-based".into()),
                "GET",
                "/stickers?category=milk-based",
            ),
            (Endpoint::Cart, "GET", "/cart"),
            (Endpoint::AddCartItem, "POST", "/cart/items"),
            (Endpoint::UpdateCartItem("kheer".into()), "PATCH", "/cart/items/kheer"),
            (Endpoint::RemoveCartItem("kheer".into()), "DELETE", "/cart/items/kheer"),
            (Endpoint::ClearCart, "DELETE", "/cart"),
            (Endpoint::Checkout, "POST", "/cart/checkout"),
            (Endpoint::History(HistoryFilters::default()), "GET", "/history"),
        ];
        for (endpoint, method, path) in cases {
            assert_eq!(endpoint.method().to_string(), method, "{endpoint:?}");
            assert_eq!(endpoint.path(), path, "{endpoint:?}");
        }
    }

    #[test]
    fn test_url_joins_base() {
        assert_eq!(Endpoint::Cart.url("/api"), "/api/cart");
        assert_eq!(
            Endpoint::Checkout.url("https://api.example.com/v1/"),
            "https://api.example.com/v1/cart/checkout"
        );
    }

    #[test]
    fn test_history_query_string() {
        let filters = HistoryFilters {
            kind: Some(HistoryKind::Sent),
            start_date: Some(Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()),
            end_date: None,
            limit: Some(10),
            offset: Some(0),
        };
        assert_eq!(
            filters.to_query_string(),
            "type=sent&startDate=2026-10-01T00%3A00%3A00.000Z&limit=10"
        );
    }

    #[test]
    fn test_history_query_omits_all() {
        let filters = HistoryFilters {
            kind: Some(HistoryKind::All),
            limit: Some(0),
            ..HistoryFilters::default()
        };
        assert_eq!(filters.to_query_string(), "");
        assert_eq!(Endpoint::History(filters).path(), "/history");
    }

    #[test]
    fn test_category_is_encoded() {
        let endpoint = Endpoint::StickersByCategory("a b&c".into());
        assert_eq!(endpoint.path(), "/stickers?category=a+b%26c");
    }

    #[test]
    fn test_path_segment_is_percent_encoded() {
        let endpoint = Endpoint::RemoveCartItem("gift box+1/2".into());
        assert_eq!(endpoint.path(), "/cart/items/gift%20box%2B1%2F2");
        assert_eq!(
            Endpoint::UpdateCartItem("kaju-katli".into()).path(),
            "/cart/items/kaju-katli"
        );
    }

    #[test]
    fn test_response_envelope() {
        let ok: ApiResponse<u32> = serde_json::from_value(json!({
            "data": 3,
            "error": null,
            "status": "success",
        }))
        .unwrap();
        assert_eq!(ok.into_result().unwrap(), 3);

        let err = ApiResponse::<u32>::error("HTTP error 500");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"data": null, "error": "HTTP error 500", "status": "error"})
        );
        assert_eq!(
            err.into_result().unwrap_err(),
            ApiError::Remote("HTTP error 500".to_string())
        );

        let empty = ApiResponse::<u32> {
            data: None,
            error: None,
            status: ApiStatus::Success,
        };
        assert_eq!(empty.into_result().unwrap_err(), ApiError::MissingData);
        assert_eq!(ApiResponse::success(1).status, ApiStatus::Success);
    }
}
