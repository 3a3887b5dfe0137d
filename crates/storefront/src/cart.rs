//! Cart state.
//!
//! The cart holds at most one line per item, in the order items were first
//! added. Every operation is total: unknown ids and non-positive quantities
//! are handled by removing or ignoring, never by failing.

use mithai_core::{CurrencyCode, ItemId, Price};
use serde::Serialize;

use crate::catalog::Item;

/// One item plus a positive quantity held pending checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub item: Item,
    quantity: u32,
}

impl CartLine {
    /// Quantity of this line. Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.item.price.times(self.quantity)
    }
}

/// Mutations accepted by the cart reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Increment the item's quantity, inserting it with quantity 1 if absent.
    Add(Item),
    /// Overwrite the quantity; `n <= 0` removes the line.
    SetQuantity(ItemId, i64),
    /// Remove the line for an item.
    Remove(ItemId),
    /// Drop every line.
    Clear,
}

/// Selected items and quantities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Apply one action to the cart.
    ///
    /// Returns true if the cart changed.
    pub fn apply(&mut self, action: CartAction) -> bool {
        match action {
            CartAction::Add(item) => {
                self.add(item);
                true
            }
            CartAction::SetQuantity(id, n) => self.set_quantity(&id, n),
            CartAction::Remove(id) => self.remove(&id),
            CartAction::Clear => {
                let changed = !self.lines.is_empty();
                self.clear();
                changed
            }
        }
    }

    /// Add one unit of `item`.
    pub fn add(&mut self, item: Item) {
        if let Some(line) = self.line_mut(&item.id) {
            line.quantity = line.quantity.saturating_add(1);
            tracing::debug!(item = %item.id, quantity = line.quantity, "cart line incremented");
            return;
        }

        tracing::debug!(item = %item.id, "cart line created");
        self.lines.push(CartLine { item, quantity: 1 });
    }

    /// Set the quantity of an existing line.
    ///
    /// `n <= 0` removes the line. Quantities above `u32::MAX` saturate.
    /// Returns true if the cart changed; unknown ids are ignored.
    pub fn set_quantity(&mut self, id: &ItemId, n: i64) -> bool {
        if n <= 0 {
            return self.remove(id);
        }

        let quantity = u32::try_from(n).unwrap_or(u32::MAX);
        match self.line_mut(id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                tracing::debug!(item = %id, quantity, "cart line quantity set");
                true
            }
            _ => false,
        }
    }

    /// Remove the line for `id`. Returns true if a line was removed.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.item.id != id);
        let removed = self.lines.len() != before;
        if removed {
            tracing::debug!(item = %id, "cart line removed");
        }
        removed
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up the line for an item.
    #[must_use]
    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item.id.as_str() == id)
    }

    /// Quantity of an item in the cart (0 when absent).
    #[must_use]
    pub fn quantity_of(&self, id: &str) -> u32 {
        self.line(id).map_or(0, CartLine::quantity)
    }

    /// Returns true if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of unit price times quantity across all lines.
    ///
    /// An empty cart totals zero in `currency`.
    #[must_use]
    pub fn total_price(&self, currency: CurrencyCode) -> Price {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(Price::zero(currency), |acc, line| acc + line)
    }

    /// Take every line out of the cart, leaving it empty.
    pub fn drain(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }

    fn line_mut(&mut self, id: &ItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.item.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::catalog::Catalog;

    fn item(catalog: &Catalog, id: &str) -> Item {
        catalog.item(id).cloned().unwrap()
    }

    #[test]
    fn test_add_same_item_twice_yields_one_line() {
        let catalog = Catalog::default();
        let mut cart = Cart::new();
        cart.add(item(&catalog, "jalebi"));
        cart.add(item(&catalog, "jalebi"));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of("jalebi"), 2);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let catalog = Catalog::default();
        let mut cart = Cart::new();
        cart.add(item(&catalog, "kheer"));

        assert!(cart.set_quantity(&ItemId::from("kheer"), 5));
        assert_eq!(cart.quantity_of("kheer"), 5);
        assert!(!cart.set_quantity(&ItemId::from("kheer"), 5));
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let catalog = Catalog::default();
        let mut cart = Cart::new();
        cart.add(item(&catalog, "kheer"));
        cart.add(item(&catalog, "rabri"));

        assert!(cart.set_quantity(&ItemId::from("kheer"), 0));
        assert!(cart.line("kheer").is_none());
        assert!(cart.set_quantity(&ItemId::from("rabri"), -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_item_is_ignored() {
        let mut cart = Cart::new();
        assert!(!cart.set_quantity(&ItemId::from("ghost"), 4));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let catalog = Catalog::default();
        let mut cart = Cart::new();
        cart.add(item(&catalog, "samosa"));
        cart.add(item(&catalog, "kachori"));

        assert!(cart.remove(&ItemId::from("samosa")));
        assert!(!cart.remove(&ItemId::from("samosa")));
        assert_eq!(cart.lines().len(), 1);

        assert!(cart.apply(CartAction::Clear));
        assert!(!cart.apply(CartAction::Clear));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_price() {
        let catalog = Catalog::default();
        let mut cart = Cart::new();
        cart.add(item(&catalog, "jalebi")); // 25
        cart.add(item(&catalog, "jalebi"));
        cart.add(item(&catalog, "kaju-katli")); // 45
        cart.set_quantity(&ItemId::from("kaju-katli"), 3);

        assert_eq!(
            cart.total_price(CurrencyCode::INR),
            Price::whole(25 * 2 + 45 * 3, CurrencyCode::INR)
        );
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new();
        assert_eq!(cart.total_items(), 0);
        assert!(cart.total_price(CurrencyCode::INR).is_zero());
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let catalog = Catalog::default();
        let mut cart = Cart::new();
        for id in ["rava", "besan", "rava", "boondi"] {
            cart.add(item(&catalog, id));
        }
        let order: Vec<_> = cart.lines().iter().map(|l| l.item.id.as_str()).collect();
        assert_eq!(order, ["rava", "besan", "boondi"]);
    }

    #[test]
    fn test_drain_empties_cart() {
        let catalog = Catalog::default();
        let mut cart = Cart::new();
        cart.add(item(&catalog, "gujiya"));
        let lines = cart.drain();
        assert_eq!(lines.len(), 1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_random_sequences_preserve_invariants() {
        let catalog = Catalog::default();
        let ids: Vec<ItemId> = catalog.items().iter().take(5).map(|i| i.id.clone()).collect();
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let mut cart = Cart::new();
            for _ in 0..40 {
                let id = ids[rng.random_range(0..ids.len())].clone();
                let action = match rng.random_range(0..4) {
                    0 | 1 => CartAction::Add(catalog.item(id.as_str()).cloned().unwrap()),
                    2 => CartAction::SetQuantity(id, rng.random_range(-2..6)),
                    _ => CartAction::Remove(id),
                };
                cart.apply(action);

                let sum: u64 = cart.lines().iter().map(|l| u64::from(l.quantity())).sum();
                assert_eq!(cart.total_items(), sum);
                assert!(cart.lines().iter().all(|l| l.quantity() >= 1));

                let mut seen: Vec<_> = cart.lines().iter().map(|l| l.item.id.clone()).collect();
                seen.sort();
                seen.dedup();
                assert_eq!(seen.len(), cart.lines().len());

                let expected = cart
                    .lines()
                    .iter()
                    .fold(rust_decimal::Decimal::ZERO, |acc, l| {
                        acc + l.item.price.amount * rust_decimal::Decimal::from(l.quantity())
                    });
                assert_eq!(cart.total_price(CurrencyCode::INR).amount, expected);
            }
        }
    }
}
