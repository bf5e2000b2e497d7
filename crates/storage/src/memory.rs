//! In-memory storage backend.
//!
//! Keeps every collection as an insertion-ordered vector behind a tokio
//! `RwLock`. Used by tests and by embedders that load their own data.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::query::{execute, Collection, Filter, OrderBy, Value};
use crate::record::Record;
use crate::trait_::{DataSource, RecordStore, Result};

/// Volatile storage backend.
#[derive(Default)]
pub struct MemoryStorage {
    collections: RwLock<HashMap<Collection, Vec<Record>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut collections: HashMap<Collection, Vec<Record>> = HashMap::new();
        for record in records {
            upsert_by_id(collections.entry(record.collection()).or_default(), record);
        }
        Self { collections: RwLock::new(collections) }
    }

    async fn snapshot(&self, collection: Collection) -> Vec<Record> {
        self.collections
            .read()
            .await
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }
}

fn upsert_by_id(rows: &mut Vec<Record>, record: Record) {
    let id = record.id();
    match rows.iter_mut().find(|r| r.id() == id) {
        Some(slot) => *slot = record,
        None => rows.push(record),
    }
}

/// Distinct values of `field` over already-filtered rows.
pub(crate) fn distinct_values(rows: &[Record], field: &str) -> BTreeSet<Value> {
    rows.iter().filter_map(|r| r.field(field)).collect()
}

#[async_trait]
impl DataSource for MemoryStorage {
    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64> {
        let rows = execute(collection, self.snapshot(collection).await, filter, None, None)?;
        Ok(rows.len() as u64)
    }

    async fn list(
        &self,
        collection: Collection,
        filter: &Filter,
        order: Option<&OrderBy>,
        limit: Option<usize>,
    ) -> Result<Vec<Record>> {
        execute(collection, self.snapshot(collection).await, filter, order, limit)
    }

    async fn distinct(
        &self,
        collection: Collection,
        field: &str,
        filter: &Filter,
    ) -> Result<BTreeSet<Value>> {
        collection.require_field(field)?;
        let rows = execute(collection, self.snapshot(collection).await, filter, None, None)?;
        Ok(distinct_values(&rows, field))
    }
}

#[async_trait]
impl RecordStore for MemoryStorage {
    async fn insert(&self, record: Record) -> Result<()> {
        let mut collections = self.collections.write().await;
        upsert_by_id(collections.entry(record.collection()).or_default(), record);
        Ok(())
    }
}
