//! Send/receive history.
//!
//! History is append-only within a session: entries are prepended so the most
//! recent comes first, and are never edited or removed. The "my stickers"
//! collection view is derived from it on demand.

use std::collections::VecDeque;
use std::collections::hash_map::{Entry, HashMap};

use chrono::{DateTime, Duration, Utc};
use mithai_core::{Direction, HistoryEntryId, ItemId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::{Catalog, Item};

/// An immutable record of a completed send or receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    pub item: Item,
    pub quantity: u32,
    pub direction: Direction,
    pub timestamp: DateTime<Utc>,
    pub sender_name: Option<String>,
    pub receiver_name: Option<String>,
}

impl HistoryEntry {
    /// The other party: the receiver for sent gifts, the sender for received ones.
    #[must_use]
    pub fn counterpart(&self) -> Option<&str> {
        match self.direction {
            Direction::Sent => self.receiver_name.as_deref(),
            Direction::Received => self.sender_name.as_deref(),
        }
    }
}

/// Input for [`HistoryStore::add_entry`]; id and timestamp are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub item: Item,
    pub quantity: u32,
    pub direction: Direction,
    pub sender_name: Option<String>,
    pub receiver_name: Option<String>,
}

/// Direction filter for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    #[default]
    All,
    Sent,
    Received,
}

impl HistoryKind {
    const fn admits(self, direction: Direction) -> bool {
        match self {
            Self::All => true,
            Self::Sent => matches!(direction, Direction::Sent),
            Self::Received => matches!(direction, Direction::Received),
        }
    }
}

impl std::str::FromStr for HistoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "sent" => Ok(Self::Sent),
            "received" => Ok(Self::Received),
            _ => Err(format!("invalid history type: {s}")),
        }
    }
}

/// History query filters. Unset fields do not filter.
///
/// Dates are inclusive. `offset` is applied before `limit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFilters {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<HistoryKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

/// Per-item totals for the collection view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStats {
    pub item_id: ItemId,
    pub name: String,
    pub glyph: String,
    pub sent: u64,
    pub received: u64,
    pub total: u64,
}

/// The "my stickers" aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    /// One row per item, highest total first.
    pub items: Vec<ItemStats>,
    pub total: u64,
    pub sent: u64,
    pub received: u64,
}

/// Mock entries shown on a fresh session: (item id, quantity, direction, days ago).
const SEED: &[(&str, u32, Direction, i64)] = &[
    ("jalebi", 2, Direction::Sent, 2),
    ("kaju-katli", 1, Direction::Received, 1),
    ("rasmalai", 3, Direction::Sent, 5),
];

/// Append-only history log, newest first.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryStore {
    /// An empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// A history holding the mock seed entries, dated relative to `now`.
    #[must_use]
    pub fn seeded(catalog: &Catalog, now: DateTime<Utc>) -> Self {
        let entries = SEED
            .iter()
            .filter_map(|&(id, quantity, direction, days_ago)| {
                let item = catalog.item(id)?.clone();
                Some(HistoryEntry {
                    id: HistoryEntryId::generate(),
                    item,
                    quantity,
                    direction,
                    timestamp: now - Duration::days(days_ago),
                    sender_name: None,
                    receiver_name: None,
                })
            })
            .collect();
        Self { entries }
    }

    /// Prepend a new entry stamped `at`, returning its id.
    #[instrument(skip(self, entry), fields(item = %entry.item.id, quantity = entry.quantity, direction = %entry.direction))]
    pub fn add_entry(&mut self, entry: NewHistoryEntry, at: DateTime<Utc>) -> HistoryEntryId {
        let id = HistoryEntryId::generate();
        self.entries.push_front(HistoryEntry {
            id,
            item: entry.item,
            quantity: entry.quantity,
            direction: entry.direction,
            timestamp: at,
            sender_name: entry.sender_name,
            receiver_name: entry.receiver_name,
        });
        tracing::debug!(%id, "history entry added");
        id
    }

    /// All entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Sent entries, newest first.
    pub fn sent(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries
            .iter()
            .filter(|e| e.direction == Direction::Sent)
    }

    /// Received entries, newest first.
    pub fn received(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries
            .iter()
            .filter(|e| e.direction == Direction::Received)
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: HistoryEntryId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries matching `filters`, newest first.
    #[must_use]
    pub fn query(&self, filters: &HistoryFilters) -> Vec<&HistoryEntry> {
        let kind = filters.kind.unwrap_or_default();
        self.entries
            .iter()
            .filter(|e| kind.admits(e.direction))
            .filter(|e| filters.start_date.is_none_or(|start| e.timestamp >= start))
            .filter(|e| filters.end_date.is_none_or(|end| e.timestamp <= end))
            .skip(filters.offset.unwrap_or(0))
            .take(filters.limit.unwrap_or(usize::MAX))
            .collect()
    }

    /// Aggregate history into per-item sent/received totals.
    ///
    /// Rows are ordered by total, highest first. Ties keep the order in which
    /// the item first appears in the (newest-first) log.
    #[must_use]
    pub fn collection_summary(&self) -> CollectionSummary {
        let mut rows: Vec<ItemStats> = Vec::new();
        let mut index: HashMap<&ItemId, usize> = HashMap::new();

        for entry in &self.entries {
            let row = match index.entry(&entry.item.id) {
                Entry::Occupied(slot) => *slot.get(),
                Entry::Vacant(slot) => {
                    rows.push(ItemStats {
                        item_id: entry.item.id.clone(),
                        name: entry.item.name.clone(),
                        glyph: entry.item.glyph.clone(),
                        sent: 0,
                        received: 0,
                        total: 0,
                    });
                    *slot.insert(rows.len() - 1)
                }
            };

            let Some(stats) = rows.get_mut(row) else {
                continue;
            };
            let quantity = u64::from(entry.quantity);
            match entry.direction {
                Direction::Sent => stats.sent += quantity,
                Direction::Received => stats.received += quantity,
            }
            stats.total = stats.sent + stats.received;
        }

        rows.sort_by(|a, b| b.total.cmp(&a.total));

        CollectionSummary {
            total: rows.iter().map(|r| r.total).sum(),
            sent: rows.iter().map(|r| r.sent).sum(),
            received: rows.iter().map(|r| r.received).sum(),
            items: rows,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn new_entry(catalog: &Catalog, id: &str, quantity: u32, direction: Direction) -> NewHistoryEntry {
        NewHistoryEntry {
            item: catalog.item(id).cloned().unwrap(),
            quantity,
            direction,
            sender_name: Some("Asha".to_string()),
            receiver_name: Some("Meera".to_string()),
        }
    }

    #[test]
    fn test_seeded_history() {
        let catalog = Catalog::default();
        let history = HistoryStore::seeded(&catalog, now());
        assert_eq!(history.len(), 3);
        assert_eq!(history.sent().count(), 2);
        assert_eq!(history.received().count(), 1);
        let first = history.entries().next().unwrap();
        assert_eq!(first.item.id.as_str(), "jalebi");
        assert_eq!(first.timestamp, now() - Duration::days(2));
    }

    #[test]
    fn test_add_entry_prepends() {
        let catalog = Catalog::default();
        let mut history = HistoryStore::seeded(&catalog, now());
        let id = history.add_entry(new_entry(&catalog, "samosa", 4, Direction::Sent), now());

        let first = history.entries().next().unwrap();
        assert_eq!(first.id, id);
        assert_eq!(first.counterpart(), Some("Meera"));
        assert_eq!(history.len(), 4);
        assert!(history.get(id).is_some());
    }

    #[test]
    fn test_counterpart_for_received() {
        let catalog = Catalog::default();
        let mut history = HistoryStore::new();
        let id = history.add_entry(new_entry(&catalog, "kheer", 1, Direction::Received), now());
        assert_eq!(history.get(id).unwrap().counterpart(), Some("Asha"));
    }

    #[test]
    fn test_adding_never_touches_earlier_entries() {
        let catalog = Catalog::default();
        let mut history = HistoryStore::seeded(&catalog, now());
        let before: Vec<_> = history.entries().cloned().collect();

        history.add_entry(new_entry(&catalog, "samosa", 1, Direction::Sent), now());
        history.add_entry(new_entry(&catalog, "kheer", 2, Direction::Received), now());

        let after: Vec<_> = history.entries().skip(2).cloned().collect();
        assert_eq!(after, before);
    }

    #[test]
    fn test_collection_summary_groups_and_sorts() {
        let catalog = Catalog::default();
        let mut history = HistoryStore::seeded(&catalog, now());
        history.add_entry(new_entry(&catalog, "jalebi", 5, Direction::Received), now());

        let summary = history.collection_summary();
        let order: Vec<_> = summary.items.iter().map(|r| r.item_id.as_str()).collect();
        assert_eq!(order, ["jalebi", "rasmalai", "kaju-katli"]);

        let jalebi = &summary.items[0];
        assert_eq!((jalebi.sent, jalebi.received, jalebi.total), (2, 5, 7));
        assert_eq!(summary.total, 11);
        assert_eq!(summary.sent, 5);
        assert_eq!(summary.received, 6);
    }

    #[test]
    fn test_collection_summary_ties_keep_first_appearance() {
        let catalog = Catalog::default();
        let mut history = HistoryStore::new();
        history.add_entry(new_entry(&catalog, "kheer", 1, Direction::Sent), now());
        history.add_entry(new_entry(&catalog, "rabri", 1, Direction::Sent), now());

        let summary = history.collection_summary();
        let order: Vec<_> = summary.items.iter().map(|r| r.item_id.as_str()).collect();
        assert_eq!(order, ["rabri", "kheer"]);
    }

    #[test]
    fn test_empty_summary() {
        let summary = HistoryStore::new().collection_summary();
        assert!(summary.items.is_empty());
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn test_query_filters() {
        let catalog = Catalog::default();
        let history = HistoryStore::seeded(&catalog, now());

        let sent = history.query(&HistoryFilters {
            kind: Some(HistoryKind::Sent),
            ..HistoryFilters::default()
        });
        assert_eq!(sent.len(), 2);

        let recent = history.query(&HistoryFilters {
            start_date: Some(now() - Duration::days(3)),
            ..HistoryFilters::default()
        });
        let ids: Vec<_> = recent.iter().map(|e| e.item.id.as_str()).collect();
        assert_eq!(ids, ["jalebi", "kaju-katli"]);

        let older = history.query(&HistoryFilters {
            end_date: Some(now() - Duration::days(2)),
            ..HistoryFilters::default()
        });
        assert_eq!(older.len(), 2);

        let page = history.query(&HistoryFilters {
            offset: Some(1),
            limit: Some(1),
            ..HistoryFilters::default()
        });
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].item.id.as_str(), "kaju-katli");
    }
}
