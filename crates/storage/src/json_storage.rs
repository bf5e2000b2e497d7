//! JSON file storage implementation.
//!
//! Stores one JSON file per record under `<root>/<collection>/<id>.json`.
//! Each file carries the record's insertion sequence number; loads return
//! records in that order and rewriting a record keeps its number.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::memory::distinct_values;
use crate::query::{execute, Collection, Filter, OrderBy, Value};
use crate::record::Record;
use crate::trait_::{DataSource, RecordStore, Result, StorageError};

/// On-disk layout of one record file.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    /// Insertion sequence within the collection
    seq: u64,
    record: Record,
}

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
    /// Serializes writers so sequence numbers stay unique.
    write_lock: Mutex<()>,
}

impl JsonStorage {
    /// Open storage at `root`, creating one directory per collection.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        for collection in Collection::ALL {
            fs::create_dir_all(root.join(collection.name())).await?;
        }

        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, collection: Collection, id: &str) -> PathBuf {
        self.root.join(collection.name()).join(format!("{}.json", id))
    }

    async fn load_stored(&self, collection: Collection) -> Result<Vec<StoredRecord>> {
        let mut stored: Vec<StoredRecord> = list_dir(&self.root.join(collection.name())).await?;
        if let Some(stray) = stored.iter().find(|s| s.record.collection() != collection) {
            return Err(StorageError::TypeMismatch {
                expected: collection.name(),
                found: stray.record.collection(),
            });
        }
        stored.sort_by_cached_key(|s| (s.seq, s.record.id()));
        Ok(stored)
    }

    async fn load(&self, collection: Collection) -> Result<Vec<Record>> {
        let records: Vec<Record> = self
            .load_stored(collection)
            .await?
            .into_iter()
            .map(|s| s.record)
            .collect();
        debug!(collection = %collection, rows = records.len(), "loaded collection");
        Ok(records)
    }
}

#[async_trait]
impl DataSource for JsonStorage {
    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64> {
        let rows = execute(collection, self.load(collection).await?, filter, None, None)?;
        Ok(rows.len() as u64)
    }

    async fn list(
        &self,
        collection: Collection,
        filter: &Filter,
        order: Option<&OrderBy>,
        limit: Option<usize>,
    ) -> Result<Vec<Record>> {
        execute(collection, self.load(collection).await?, filter, order, limit)
    }

    async fn distinct(
        &self,
        collection: Collection,
        field: &str,
        filter: &Filter,
    ) -> Result<BTreeSet<Value>> {
        collection.require_field(field)?;
        let rows = execute(collection, self.load(collection).await?, filter, None, None)?;
        Ok(distinct_values(&rows, field))
    }
}

#[async_trait]
impl RecordStore for JsonStorage {
    async fn insert(&self, record: Record) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let collection = record.collection();
        let id = record.id();
        let existing = self.load_stored(collection).await?;
        let seq = match existing.iter().find(|s| s.record.id() == id) {
            Some(current) => current.seq,
            None => existing.iter().map(|s| s.seq + 1).max().unwrap_or(0),
        };

        let json = serde_json::to_string_pretty(&StoredRecord { seq, record })?;
        fs::write(self.record_path(collection, &id), json.as_bytes()).await?;
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        // A file removed between read_dir and read is simply gone.
        if let Some(item) = read_json(&entry.path()).await? {
            items.push(item);
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::OrderBy;
    use crate::record::typed;
    use crate::seed::seed_practices;
    use cuidar_core::{Dimension, Practice};

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let practice = Practice::new("Carta de Amor Próprio", Dimension::Emocional, 10, "d");

        {
            let storage = JsonStorage::new(dir.path()).await.unwrap();
            storage.insert(Record::from(practice.clone())).await.unwrap();
        }

        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let rows = storage
            .list(Collection::Practices, &Filter::new(), None, None)
            .await
            .unwrap();
        assert_eq!(rows, vec![Record::from(practice)]);
    }

    #[tokio::test]
    async fn test_unordered_list_keeps_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        seed_practices(&storage).await.unwrap();

        let practices: Vec<Practice> = typed(
            storage
                .list(Collection::Practices, &Filter::new(), None, None)
                .await
                .unwrap(),
        )
        .unwrap();
        let positions: Vec<_> = practices.iter().filter_map(|p| p.order_index).collect();
        assert_eq!(positions, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_rewrite_keeps_position_and_ties_keep_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let mut first = Practice::new("Primeira", Dimension::Social, 5, "d");
        let second = Practice::new("Segunda", Dimension::Social, 5, "d");
        let third = Practice::new("Terceira", Dimension::Social, 5, "d");
        for p in [&third, &first, &second] {
            storage.insert(Record::from(p.clone())).await.unwrap();
        }
        first.description = "editada".into();
        storage.insert(Record::from(first.clone())).await.unwrap();

        let reopened = JsonStorage::new(dir.path()).await.unwrap();
        let rows: Vec<Practice> = typed(
            reopened
                .list(Collection::Practices, &Filter::new(), Some(&OrderBy::asc("duration_minutes")), None)
                .await
                .unwrap(),
        )
        .unwrap();
        let titles: Vec<_> = rows.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Terceira", "Primeira", "Segunda"]);
        assert_eq!(rows[1].description, "editada");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("practices").join("broken.json"), b"{ nope").unwrap();

        let result = storage.count(Collection::Practices, &Filter::new()).await;
        assert!(matches!(result, Err(StorageError::Json(_))));
    }

    #[tokio::test]
    async fn test_non_json_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("practices").join("README"), b"notes").unwrap();

        let total = storage.count(Collection::Practices, &Filter::new()).await.unwrap();
        assert_eq!(total, 0);
    }
}
