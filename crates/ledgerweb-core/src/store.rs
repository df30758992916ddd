//! Storage contract for ledger entries, plus an in-memory implementation
//!
//! A store only needs three things: an atomic multi-record put under parent
//! keys, a query scoped by key prefix, and a single-key delete. Each call is
//! its own transaction.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::key::{KeyId, KeyPath, ENTRY_KIND};
use crate::models::{Entry, StoredEntry};
use crate::types::EntryId;

/// Shared store handle
pub type StoreRef = Arc<dyn LedgerStore>;

/// Result ordering for [`EntryQuery`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrder {
    /// Ascending identifier
    #[default]
    Insertion,
    /// Day of month descending, ties by ascending identifier
    DayDescending,
}

/// Prefix-scoped entry query
#[derive(Debug, Clone, PartialEq)]
pub struct EntryQuery {
    pub prefix: KeyPath,
    /// Only entries whose `year` field equals this value
    pub year: Option<i32>,
    pub order: EntryOrder,
}

impl EntryQuery {
    pub fn under(prefix: KeyPath) -> Self {
        Self {
            prefix,
            year: None,
            order: EntryOrder::Insertion,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn ordered(mut self, order: EntryOrder) -> Self {
        self.order = order;
        self
    }

    /// Shared filter for stores that evaluate queries in process
    pub fn matches(&self, key: &KeyPath, entry: &Entry) -> bool {
        self.prefix.is_prefix_of(key) && self.year.map_or(true, |y| entry.year == y)
    }
}

/// Sort query results in place according to `order`
pub fn sort_entries(entries: &mut [StoredEntry], order: EntryOrder) {
    match order {
        EntryOrder::Insertion => entries.sort_by_key(|e| e.id),
        EntryOrder::DayDescending => {
            entries.sort_by(|a, b| b.entry.day.cmp(&a.entry.day).then(a.id.cmp(&b.id)))
        }
    }
}

/// Reject parents that already name an entry
pub fn check_parent(parent: &KeyPath) -> Result<(), StoreError> {
    match parent.segments().last() {
        Some(segment) if segment.kind != ENTRY_KIND => Ok(()),
        _ => Err(StoreError::InvalidKey { key: parent.to_string() }),
    }
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persist every record under its parent key, or none of them
    async fn atomic_put(&self, records: &[(KeyPath, Entry)]) -> Result<Vec<EntryId>, StoreError>;

    async fn query(&self, query: &EntryQuery) -> Result<Vec<StoredEntry>, StoreError>;

    /// Remove one entry by its full key; a missing key is not an error
    async fn delete(&self, key: &KeyPath) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct MemoryData {
    entries: BTreeMap<KeyPath, Entry>,
    last_id: i64,
}

/// Process-local store; contents are lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn atomic_put(&self, records: &[(KeyPath, Entry)]) -> Result<Vec<EntryId>, StoreError> {
        for (parent, _) in records {
            check_parent(parent)?;
        }

        let mut data = self.data.write().await;
        let mut ids = Vec::with_capacity(records.len());
        for (parent, entry) in records {
            data.last_id += 1;
            let id = EntryId(data.last_id);
            let key = parent.child(ENTRY_KIND, KeyId::Int(id.0));
            data.entries.insert(key, entry.clone());
            ids.push(id);
        }
        Ok(ids)
    }

    async fn query(&self, query: &EntryQuery) -> Result<Vec<StoredEntry>, StoreError> {
        let data = self.data.read().await;
        let mut found: Vec<StoredEntry> = data
            .entries
            .iter()
            .filter(|(key, entry)| query.matches(key, entry))
            .filter_map(|(key, entry)| {
                key.entry_id().map(|id| StoredEntry { id, entry: entry.clone() })
            })
            .collect();
        sort_entries(&mut found, query.order);
        Ok(found)
    }

    async fn delete(&self, key: &KeyPath) -> Result<(), StoreError> {
        if key.entry_id().is_none() {
            return Err(StoreError::InvalidKey { key: key.to_string() });
        }
        self.data.write().await.entries.remove(key);
        Ok(())
    }
}
