//! Newtype IDs for type-safe entity references.
//!
//! Two flavours exist:
//! - `define_id!` wraps a [`Uuid`] for records minted at runtime (history
//!   entries, orders, carts).
//! - `define_slug!` wraps a human-readable string for records defined at
//!   build time (catalog items and categories).

use uuid::Uuid;

/// Macro to define a type-safe UUID-backed ID wrapper.
///
/// Creates a newtype wrapper around [`Uuid`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `generate()`, `as_uuid()`
/// - `From<Uuid>` and `Into<Uuid>` implementations
///
/// # Example
///
/// ```rust
/// # use mithai_core::define_id;
/// define_id!(ReceiptId);
/// define_id!(ShipmentId);
///
/// let receipt = ReceiptId::generate();
/// let shipment = ShipmentId::new(receipt.as_uuid());
///
/// // These are different types, so this won't compile:
/// // let _: ReceiptId = shipment;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Create an ID from an existing UUID.
            #[must_use]
            pub const fn new(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Mint a fresh random (v4) ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Macro to define a type-safe string slug wrapper.
///
/// Slugs are stable identifiers such as `"gulab-jamun"`. The wrapper derives
/// `Ord` so slug-keyed maps iterate deterministically, and implements
/// `Borrow<str>` so maps keyed by the slug can be queried with a `&str`.
#[macro_export]
macro_rules! define_slug {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a slug from any string-like value.
            #[must_use]
            pub fn new(slug: impl Into<String>) -> Self {
                Self(slug.into())
            }

            /// Returns the slug as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(slug: &str) -> Self {
                Self(slug.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(slug: String) -> Self {
                Self(slug)
            }
        }

        impl ::core::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Runtime-minted records
define_id!(HistoryEntryId);
define_id!(OrderId);
define_id!(CartId);

// Build-time catalog records
define_slug!(ItemId);
define_slug!(CategoryId);

/// Placeholder recipient identifier for the future backend checkout contract.
///
/// The local checkout addresses gifts by contact details, so this is only
/// ever produced when mapping to the wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RecipientId(String);

impl RecipientId {
    /// Create a recipient ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the recipient ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Uuid> for RecipientId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(OrderId::generate(), OrderId::generate());
    }

    #[test]
    fn test_id_serializes_transparently() {
        let uuid = Uuid::nil();
        let id = HistoryEntryId::new(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }

    #[test]
    fn test_slug_display_and_borrow() {
        let id = ItemId::from("kaju-katli");
        assert_eq!(id.to_string(), "kaju-katli");

        let mut map = HashMap::new();
        map.insert(id, 45);
        assert_eq!(map.get("kaju-katli"), Some(&45));
    }

    #[test]
    fn test_slugs_order_lexically() {
        let mut ids = vec![ItemId::from("rava"), ItemId::from("besan")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "besan");
    }
}
