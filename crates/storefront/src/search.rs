//! Catalog search.
//!
//! Search is a plain case-insensitive substring match over the item name and
//! the category display name. It runs synchronously against the in-memory
//! catalog on every keystroke, so there is no index and no debouncing.

use tracing::instrument;

use crate::catalog::{Catalog, Category, Item};

/// Items from one category that matched a query.
#[derive(Debug, Clone)]
pub struct CategoryGroup<'a> {
    pub category: &'a Category,
    pub items: Vec<&'a Item>,
}

/// Grouped search results, in catalog category order.
///
/// Categories without any matching item are omitted.
#[derive(Debug, Clone, Default)]
pub struct SearchResults<'a> {
    pub groups: Vec<CategoryGroup<'a>>,
}

impl<'a> SearchResults<'a> {
    /// Returns true if nothing matched (the "no results" state).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of matching items across all groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    /// Iterate all matching items in display order.
    pub fn items(&self) -> impl Iterator<Item = &'a Item> + '_ {
        self.groups.iter().flat_map(|g| g.items.iter().copied())
    }
}

/// Filter the catalog by `query`.
///
/// An empty (or whitespace-only) query matches every item. The query is
/// trimmed before matching.
#[instrument(skip(catalog), fields(matches = tracing::field::Empty))]
pub fn search<'a>(catalog: &'a Catalog, query: &str) -> SearchResults<'a> {
    let needle = query.trim().to_lowercase();

    let groups: Vec<_> = catalog
        .categories()
        .iter()
        .filter_map(|category| {
            let category_matches = category.name.to_lowercase().contains(&needle);
            let items: Vec<&Item> = catalog
                .in_category(&category.id)
                .filter(|item| category_matches || item.name.to_lowercase().contains(&needle))
                .collect();
            (!items.is_empty()).then_some(CategoryGroup { category, items })
        })
        .collect();

    let results = SearchResults { groups };
    tracing::Span::current().record("matches", results.len());
    results
}
