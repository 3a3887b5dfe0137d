//! Mithai Stickers Core - Shared types library.
//!
//! This crate provides common types used across all Mithai Stickers components:
//! - `storefront` - Catalog, cart, checkout and history state
//! - `cli` - Command-line host for browsing and checking out
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no clocks, no
//! async runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, contact details and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
