//! Storage trait abstraction.

use std::collections::BTreeSet;

use async_trait::async_trait;
use cuidar_core::{DailyHabit, DimensionProgress};

use crate::query::{Collection, Filter, OrderBy, Value};
use crate::record::Record;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database driver error
    #[error("Database error: {0}")]
    Database(String),

    /// Query names an unknown field or compares against the wrong kind
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A record came back from the wrong collection
    #[error("Expected a {expected} record, found one from {found}")]
    TypeMismatch {
        /// Requested record type
        expected: &'static str,
        /// Collection the record belongs to
        found: Collection,
    },

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Read access to the record collections.
///
/// Every call either returns what the store holds or an error; a failed
/// query never looks like an empty one.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Count records matching `filter`.
    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64>;

    /// List records matching `filter`, optionally sorted and truncated.
    async fn list(
        &self,
        collection: Collection,
        filter: &Filter,
        order: Option<&OrderBy>,
        limit: Option<usize>,
    ) -> Result<Vec<Record>>;

    /// Distinct non-null values of `field` among records matching `filter`.
    async fn distinct(
        &self,
        collection: Collection,
        field: &str,
        filter: &Filter,
    ) -> Result<BTreeSet<Value>>;
}

/// Write access on top of [`DataSource`].
#[async_trait]
pub trait RecordStore: DataSource {
    /// Insert a record, replacing any record with the same id.
    async fn insert(&self, record: Record) -> Result<()>;

    /// Write a progress snapshot keyed by (user, dimension).
    ///
    /// An existing row keeps its id; everything else is overwritten.
    async fn upsert_dimension_progress(&self, progress: &DimensionProgress) -> Result<DimensionProgress> {
        let filter = Filter::new()
            .eq("user_id", Value::text(progress.user_id))
            .eq("dimension", Value::text(progress.dimension));
        let existing = self
            .list(Collection::DimensionProgress, &filter, None, Some(1))
            .await?;

        let mut row = progress.clone();
        if let Some(current) = existing.into_iter().next() {
            row.id = DimensionProgress::try_from(current)?.id;
        }
        self.insert(Record::DimensionProgress(row.clone())).await?;
        Ok(row)
    }

    /// Write a habit row keyed by (user, date).
    ///
    /// An existing row keeps its id and `created_at`.
    async fn upsert_daily_habit(&self, habit: &DailyHabit) -> Result<DailyHabit> {
        let filter = Filter::new()
            .eq("user_id", Value::text(habit.user_id))
            .eq("date", habit.date);
        let existing = self.list(Collection::DailyHabits, &filter, None, Some(1)).await?;

        let mut row = habit.clone();
        if let Some(current) = existing.into_iter().next() {
            let current = DailyHabit::try_from(current)?;
            row.id = current.id;
            row.created_at = current.created_at;
        }
        self.insert(Record::DailyHabit(row.clone())).await?;
        Ok(row)
    }
}
