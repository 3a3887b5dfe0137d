//! Backend contract shapes built from real store output.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::Utc;
use mithai_core::CartId;
use mithai_integration_tests::{store, today, valid_card, walk_to_payment};
use mithai_storefront::api::{
    ApiResponse, CartDto, CheckoutRequest, CheckoutResponse, Endpoint, HistoryItemDto,
};
use mithai_storefront::history::{HistoryFilters, HistoryKind};
use serde_json::json;

#[tokio::test]
async fn test_checkout_response_matches_order() {
    let mut store = store();
    store.add_item("besan").unwrap();
    store.add_item("besan").unwrap();
    store.add_item("coconut").unwrap();

    let cart_id = CartId::generate();
    let cart = CartDto::from_cart(store.state().cart(), cart_id, "user-1", Utc::now());
    assert_eq!(cart.items.len(), 2);

    walk_to_payment(&mut store).unwrap();
    let order = store.pay(&valid_card(), today()).await.unwrap();

    let request = CheckoutRequest::for_receiver(cart_id, &order.receiver);
    let request_json = serde_json::to_value(&request).unwrap();
    assert_eq!(request_json["cartId"], json!(cart_id.to_string()));
    assert_eq!(request_json["recipientId"], json!("Meera"));
    assert_eq!(request_json["message"], json!("Happy Diwali!"));

    let response = CheckoutResponse::from(&order);
    let envelope = serde_json::to_value(ApiResponse::success(response)).unwrap();
    assert_eq!(envelope["status"], json!("success"));
    assert_eq!(envelope["data"]["status"], json!("completed"));
    assert_eq!(envelope["data"]["total"], json!(74.0));
    assert_eq!(envelope["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(envelope["data"]["items"][0]["sticker"]["emoji"], json!("🌕"));
}

#[tokio::test]
async fn test_history_items_for_sent_entries() {
    let mut store = store();
    store.add_item("kalakand").unwrap();
    walk_to_payment(&mut store).unwrap();
    store.pay(&valid_card(), today()).await.unwrap();

    let dtos: Vec<_> = store
        .state()
        .history()
        .entries()
        .map(|entry| HistoryItemDto::from_entry(entry, "user-1"))
        .collect();
    let value = serde_json::to_value(&dtos).unwrap();
    assert_eq!(value[0]["type"], json!("sent"));
    assert_eq!(value[0]["stickerId"], json!("kalakand"));
    assert_eq!(value[0]["recipientId"], json!("Meera"));
}

#[test]
fn test_endpoints_join_configured_base() {
    let store = store();
    let base = &store.config().api_base_url;

    assert_eq!(Endpoint::TrendingStickers.url(base), "/api/stickers/trending");
    let history = Endpoint::History(HistoryFilters {
        kind: Some(HistoryKind::Received),
        limit: Some(20),
        offset: Some(40),
        ..HistoryFilters::default()
    });
    assert_eq!(
        history.url(base),
        "/api/history?type=received&limit=20&offset=40"
    );
}
