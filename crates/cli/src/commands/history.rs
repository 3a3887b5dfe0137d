//! History and collection views.

use std::io::{self, Write};

use mithai_core::Direction;
use mithai_storefront::Store;
use mithai_storefront::history::{HistoryFilters, HistoryKind};

use crate::error::CliError;

/// `mithai history [--type <kind>] [--limit N] [--offset N]`
pub fn history(
    store: &Store,
    kind: HistoryKind,
    limit: Option<usize>,
    offset: Option<usize>,
) -> Result<(), CliError> {
    let filters = HistoryFilters {
        kind: Some(kind),
        limit,
        offset,
        ..HistoryFilters::default()
    };
    let entries = store.state().history().query(&filters);

    let mut out = io::stdout().lock();
    if entries.is_empty() {
        writeln!(out, "No history yet")?;
        return Ok(());
    }
    for entry in entries {
        let arrow = match entry.direction {
            Direction::Sent => "to",
            Direction::Received => "from",
        };
        write!(
            out,
            "{}  {:<8} {} {} x{}",
            entry.timestamp.format("%d %b %Y"),
            entry.direction.to_string(),
            entry.item.glyph,
            entry.item.name,
            entry.quantity,
        )?;
        match entry.counterpart() {
            Some(name) => writeln!(out, "  {arrow} {name}")?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}

/// `mithai collection`
pub fn collection(store: &Store) -> Result<(), CliError> {
    let summary = store.state().collection_summary();

    let mut out = io::stdout().lock();
    writeln!(
        out,
        "{} stickers: {} sent, {} received",
        summary.total, summary.sent, summary.received
    )?;
    for row in &summary.items {
        writeln!(
            out,
            "  {} {:<20} {:>3} total  ({} sent, {} received)",
            row.glyph, row.name, row.total, row.sent, row.received
        )?;
    }
    Ok(())
}
