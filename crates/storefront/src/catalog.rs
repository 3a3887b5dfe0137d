//! Static sticker catalog.
//!
//! The catalog is defined at build time and never mutated. Items are kept in
//! declaration order so listings are stable, and categories are iterated in
//! the order they are declared here.

use mithai_core::{CategoryId, CurrencyCode, ItemId, Price};
use serde::Serialize;

/// Number of items shown on the landing view.
pub const TRENDING_COUNT: usize = 6;

/// A purchasable sticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub category: CategoryId,
    /// Glyph rendered when no artwork is available.
    pub glyph: String,
}

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Raw catalog row: (id, name, price in whole units, category id, glyph).
type ItemRow = (&'static str, &'static str, i64, &'static str, &'static str);

const CATEGORIES: &[(&str, &str)] = &[
    ("syrup-based", "Syrup Based"),
    ("milk-based", "Milk Based"),
    ("laddoo-specials", "Laddoo Specials"),
    ("festive-favorites", "Festive Favorites"),
];

const ITEMS: &[ItemRow] = &[
    // Syrup Based
    ("jalebi", "Jalebi", 25, "syrup-based", "🥨"),
    ("gulab-jamun", "Gulab Jamun", 30, "syrup-based", "🟤"),
    ("rasgulla", "Rasgulla", 28, "syrup-based", "⚪"),
    ("imarti", "Imarti", 26, "syrup-based", "🌸"),
    ("balushahi", "Balushahi", 24, "syrup-based", "🍩"),
    ("cham-cham", "Cham Cham", 32, "syrup-based", "🍬"),
    // Milk Based
    ("rasmalai", "Rasmalai", 35, "milk-based", "🥛"),
    ("kheer", "Kheer", 22, "milk-based", "🍚"),
    ("rabri", "Rabri", 28, "milk-based", "🥣"),
    ("malai-peda", "Malai Peda", 30, "milk-based", "🟡"),
    ("sandesh", "Sandesh", 26, "milk-based", "🧁"),
    ("kalakand", "Kalakand", 32, "milk-based", "🍰"),
    // Laddoo Specials
    ("motichoor", "Motichoor Laddoo", 28, "laddoo-specials", "🟠"),
    ("besan", "Besan Laddoo", 24, "laddoo-specials", "🌕"),
    ("coconut", "Coconut Laddoo", 26, "laddoo-specials", "🥥"),
    ("rava", "Rava Laddoo", 25, "laddoo-specials", "🔵"),
    ("dry-fruit", "Dry Fruit Laddoo", 40, "laddoo-specials", "🥜"),
    ("boondi", "Boondi Laddoo", 22, "laddoo-specials", "🟡"),
    // Festive Favorites
    ("kaju-katli", "Kaju Katli", 45, "festive-favorites", "💎"),
    ("samosa", "Samosa", 15, "festive-favorites", "🔺"),
    ("gujiya", "Gujiya", 28, "festive-favorites", "🥟"),
    ("malpua", "Malpua", 30, "festive-favorites", "🥞"),
    ("kachori", "Kachori", 18, "festive-favorites", "🥯"),
    ("namkeen", "Namkeen", 20, "festive-favorites", "🥨"),
];

/// The full catalog of items grouped into categories.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    items: Vec<Item>,
}

impl Catalog {
    /// Build the built-in catalog priced in the given currency.
    #[must_use]
    pub fn builtin(currency: CurrencyCode) -> Self {
        let categories = CATEGORIES
            .iter()
            .map(|&(id, name)| Category {
                id: CategoryId::from(id),
                name: name.to_owned(),
            })
            .collect();

        let items = ITEMS
            .iter()
            .map(|&(id, name, price, category, glyph)| Item {
                id: ItemId::from(id),
                name: name.to_owned(),
                price: Price::whole(price, currency),
                category: CategoryId::from(category),
                glyph: glyph.to_owned(),
            })
            .collect();

        Self { categories, items }
    }

    /// Build a catalog from explicit parts.
    #[must_use]
    pub const fn from_parts(categories: Vec<Category>, items: Vec<Item>) -> Self {
        Self { categories, items }
    }

    /// All categories in display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All items in display order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Look up an item by its id.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id.as_str() == id)
    }

    /// Look up a category by its id.
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id.as_str() == id)
    }

    /// Items belonging to one category, in display order.
    pub fn in_category<'a>(&'a self, id: &'a CategoryId) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |item| &item.category == id)
    }

    /// Items featured on the landing view.
    #[must_use]
    pub fn trending(&self) -> &[Item] {
        let end = TRENDING_COUNT.min(self.items.len());
        self.items.get(..end).unwrap_or_default()
    }

    /// Currency the catalog is priced in.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.items
            .first()
            .map_or_else(CurrencyCode::default, |item| item.price.currency_code)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin(CurrencyCode::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = Catalog::default();
        assert_eq!(catalog.categories().len(), 4);
        assert_eq!(catalog.items().len(), 24);
        for category in catalog.categories() {
            assert_eq!(catalog.in_category(&category.id).count(), 6);
        }
    }

    #[test]
    fn test_item_ids_are_unique() {
        let catalog = Catalog::default();
        let mut ids: Vec<_> = catalog.items().iter().map(|i| i.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.items().len());
    }

    #[test]
    fn test_every_item_has_a_known_category() {
        let catalog = Catalog::default();
        for item in catalog.items() {
            assert!(catalog.category(item.category.as_str()).is_some());
        }
    }

    #[test]
    fn test_lookup_and_price() {
        let catalog = Catalog::default();
        let item = catalog.item("kaju-katli").unwrap();
        assert_eq!(item.name, "Kaju Katli");
        assert_eq!(item.price, Price::whole(45, CurrencyCode::INR));
        assert!(catalog.item("ghost").is_none());
    }

    #[test]
    fn test_trending_is_first_six() {
        let catalog = Catalog::default();
        let trending: Vec<_> = catalog.trending().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            trending,
            [
                "jalebi",
                "gulab-jamun",
                "rasgulla",
                "imarti",
                "balushahi",
                "cham-cham"
            ]
        );
    }

    #[test]
    fn test_catalog_currency() {
        assert_eq!(
            Catalog::builtin(CurrencyCode::USD).currency(),
            CurrencyCode::USD
        );
    }
}
