//! Shared fixtures for engine tests.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use cuidar_core::{CompletedPractice, Dimension, Practice, Time, UserId};
use cuidar_storage::{
    Collection, DataSource, Filter, MemoryStorage, OrderBy, Record, RecordStore, StorageError, Value,
};

pub(crate) fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Noon UTC on `date`.
pub(crate) fn noon(date: NaiveDate) -> Time {
    Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
}

pub(crate) async fn add_practice(
    store: &MemoryStorage,
    title: &str,
    dimension: Dimension,
    minutes: u32,
) -> Practice {
    let practice = Practice::new(title, dimension, minutes, "fixture");
    store.insert(Record::from(practice.clone())).await.unwrap();
    practice
}

pub(crate) async fn complete_on(store: &MemoryStorage, user: UserId, practice: &Practice, date: NaiveDate) {
    let completion = CompletedPractice::new(user, practice.id, noon(date), date);
    store.insert(Record::from(completion)).await.unwrap();
}

/// A data source whose every call fails.
pub(crate) struct FailingSource;

fn unreachable_backend() -> StorageError {
    StorageError::Database("connection refused".to_string())
}

#[async_trait]
impl DataSource for FailingSource {
    async fn count(&self, _collection: Collection, _filter: &Filter) -> cuidar_storage::Result<u64> {
        Err(unreachable_backend())
    }

    async fn list(
        &self,
        _collection: Collection,
        _filter: &Filter,
        _order: Option<&OrderBy>,
        _limit: Option<usize>,
    ) -> cuidar_storage::Result<Vec<Record>> {
        Err(unreachable_backend())
    }

    async fn distinct(
        &self,
        _collection: Collection,
        _field: &str,
        _filter: &Filter,
    ) -> cuidar_storage::Result<BTreeSet<Value>> {
        Err(unreachable_backend())
    }
}

#[async_trait]
impl RecordStore for FailingSource {
    async fn insert(&self, _record: Record) -> cuidar_storage::Result<()> {
        Err(unreachable_backend())
    }
}
