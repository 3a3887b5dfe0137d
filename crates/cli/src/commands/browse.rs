//! Catalog listing and search.

use std::io::{self, Write};

use mithai_storefront::Store;
use mithai_storefront::catalog::Item;
use mithai_storefront::view::ViewAction;

use crate::error::CliError;

/// `mithai catalog [--category <id>]`
pub fn catalog(store: &Store, category: Option<&str>) -> Result<(), CliError> {
    let catalog = store.state().catalog();
    let categories: Vec<_> = match category {
        Some(id) => vec![
            catalog
                .category(id)
                .ok_or_else(|| CliError::UnknownCategory(id.to_string()))?,
        ],
        None => catalog.categories().iter().collect(),
    };

    let mut out = io::stdout().lock();
    for category in categories {
        writeln!(out, "{}", category.name)?;
        for item in catalog.in_category(&category.id) {
            write_item(&mut out, item)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// `mithai trending`
pub fn trending(store: &Store) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    for item in store.state().catalog().trending() {
        write_item(&mut out, item)?;
    }
    Ok(())
}

/// `mithai search <query>`
pub fn search(store: &mut Store, query: String) -> Result<(), CliError> {
    store.dispatch(ViewAction::ViewAll { focus_search: false }.into())?;
    store.dispatch(ViewAction::SetQuery(query).into())?;

    let results = store.state().search_results();
    let mut out = io::stdout().lock();
    if results.is_empty() {
        writeln!(out, "No stickers found for \"{}\"", store.state().view().query())?;
        return Ok(());
    }
    for group in &results.groups {
        writeln!(out, "{}", group.category.name)?;
        for item in &group.items {
            write_item(&mut out, item)?;
        }
        writeln!(out)?;
    }
    tracing::debug!(matches = results.len(), "search finished");
    Ok(())
}

pub fn write_item(out: &mut impl Write, item: &Item) -> io::Result<()> {
    writeln!(out, "  {} {:<20} {:>5}  ({})", item.glyph, item.name, item.price.to_string(), item.id)
}
