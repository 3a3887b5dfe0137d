//! Mithai Stickers storefront library.
//!
//! Catalog browsing, cart, the checkout wizard and send/receive history, all
//! held in memory and driven through [`state::Store`]. Hosts render from
//! [`state::AppState`] and re-render on [`state::StateChange`] notifications.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod history;
pub mod notification;
pub mod order;
pub mod search;
pub mod state;
pub mod validation;
pub mod view;

pub use config::StorefrontConfig;
pub use error::{AppError, Result};
pub use state::{Action, AppState, StateChange, Store};
