//! SQLite storage backend.
//!
//! One table per collection. Every queryable field is a real column so
//! filters, ordering and `DISTINCT` run in SQL; the full record is kept as
//! JSON in a `data` column. Dates are stored as `YYYY-MM-DD` text and
//! timestamps as epoch milliseconds so both compare correctly in SQL.

use std::collections::BTreeSet;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use crate::query::{Collection, FieldKind, Filter, OrderBy, Predicate, Value};
use crate::record::Record;
use crate::trait_::{DataSource, RecordStore, Result, StorageError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite storage implementation.
#[derive(Clone)]
pub struct SqliteStorage {
    /// Database connection pool
    pool: SqlitePool,
}

fn db_err(e: sqlx::Error) -> StorageError {
    StorageError::Database(e.to_string())
}

impl SqliteStorage {
    /// Open (creating if needed) the database at `url`, e.g. `sqlite://cuidar.db`.
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(db_err)?;

        let storage = Self { pool };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Create an in-memory SQLite storage for testing.
    ///
    /// The pool is capped at one connection; every connection to
    /// `:memory:` would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(db_err)?;

        let storage = Self { pool };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Create tables and indexes if missing.
    async fn init_schema(&self) -> Result<()> {
        for collection in Collection::ALL {
            let columns: Vec<String> = collection
                .fields()
                .iter()
                .map(|(name, kind)| {
                    if *name == "id" {
                        "id TEXT PRIMARY KEY".to_string()
                    } else {
                        format!("{} {}", name, sql_type(*kind))
                    }
                })
                .collect();
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {} ({}, data TEXT NOT NULL)",
                collection.name(),
                columns.join(", ")
            );
            sqlx::query(&ddl).execute(&self.pool).await.map_err(db_err)?;
        }

        let indexes = [
            "CREATE INDEX IF NOT EXISTS idx_practices_dimension ON practices(dimension)",
            "CREATE INDEX IF NOT EXISTS idx_completed_user_date ON completed_practices(user_id, date)",
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_progress_user_dimension ON dimension_progress(user_id, dimension)",
            "CREATE INDEX IF NOT EXISTS idx_checkins_user_date ON emotional_checkins(user_id, date)",
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_habits_user_date ON daily_habits(user_id, date)",
        ];
        for index in indexes {
            sqlx::query(index).execute(&self.pool).await.map_err(db_err)?;
        }

        Ok(())
    }
}

fn sql_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text | FieldKind::Date => "TEXT",
        FieldKind::Int | FieldKind::Bool | FieldKind::Timestamp => "INTEGER",
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Sqlite>, value: &Value) {
    match value {
        Value::Text(s) => qb.push_bind(s.clone()),
        Value::Int(n) => qb.push_bind(*n),
        Value::Bool(b) => qb.push_bind(*b),
        Value::Date(d) => qb.push_bind(d.format(DATE_FORMAT).to_string()),
        Value::Timestamp(t) => qb.push_bind(t.timestamp_millis()),
    };
}

fn push_list(qb: &mut QueryBuilder<'_, Sqlite>, values: &[Value]) {
    qb.push("(");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        push_value(qb, value);
    }
    qb.push(")");
}

/// Append `WHERE ...` for a validated filter.
fn push_where(qb: &mut QueryBuilder<'_, Sqlite>, filter: &Filter) {
    for (i, predicate) in filter.predicates.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        let field = predicate.field();
        match predicate {
            Predicate::Eq(_, v) => {
                qb.push(field).push(" = ");
                push_value(qb, v);
            }
            Predicate::Gte(_, v) => {
                qb.push(field).push(" >= ");
                push_value(qb, v);
            }
            Predicate::Lte(_, v) => {
                qb.push(field).push(" <= ");
                push_value(qb, v);
            }
            Predicate::In(_, vs) if vs.is_empty() => {
                qb.push("0");
            }
            Predicate::In(_, vs) => {
                qb.push(field).push(" IN ");
                push_list(qb, vs);
            }
            Predicate::NotIn(_, vs) if vs.is_empty() => {
                qb.push("1");
            }
            Predicate::NotIn(_, vs) => {
                qb.push("(").push(field).push(" IS NULL OR ").push(field).push(" NOT IN ");
                push_list(qb, vs);
                qb.push(")");
            }
        }
    }
}

fn decode_value(row: &SqliteRow, kind: FieldKind) -> Result<Option<Value>> {
    let value = match kind {
        FieldKind::Text => row.try_get::<Option<String>, _>(0).map_err(db_err)?.map(Value::Text),
        FieldKind::Int => row.try_get::<Option<i64>, _>(0).map_err(db_err)?.map(Value::Int),
        FieldKind::Bool => row.try_get::<Option<bool>, _>(0).map_err(db_err)?.map(Value::Bool),
        FieldKind::Date => match row.try_get::<Option<String>, _>(0).map_err(db_err)? {
            Some(s) => Some(Value::Date(
                NaiveDate::parse_from_str(&s, DATE_FORMAT)
                    .map_err(|e| StorageError::Other(format!("bad stored date '{}': {}", s, e)))?,
            )),
            None => None,
        },
        FieldKind::Timestamp => match row.try_get::<Option<i64>, _>(0).map_err(db_err)? {
            Some(ms) => Some(Value::Timestamp(DateTime::from_timestamp_millis(ms).ok_or_else(
                || StorageError::Other(format!("bad stored timestamp {}", ms)),
            )?)),
            None => None,
        },
    };
    Ok(value)
}

#[async_trait]
impl DataSource for SqliteStorage {
    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64> {
        filter.validate(collection)?;

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM ");
        qb.push(collection.name());
        push_where(&mut qb, filter);

        let row = qb.build().fetch_one(&self.pool).await.map_err(db_err)?;
        let count: i64 = row.try_get(0).map_err(db_err)?;
        Ok(count as u64)
    }

    async fn list(
        &self,
        collection: Collection,
        filter: &Filter,
        order: Option<&OrderBy>,
        limit: Option<usize>,
    ) -> Result<Vec<Record>> {
        filter.validate(collection)?;

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT data FROM ");
        qb.push(collection.name());
        push_where(&mut qb, filter);

        qb.push(" ORDER BY ");
        if let Some(order) = order {
            collection.require_field(&order.field)?;
            qb.push(&order.field)
                .push(if order.ascending { " ASC, " } else { " DESC, " });
        }
        qb.push("rowid ASC");

        if let Some(limit) = limit {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows = qb.build().fetch_all(&self.pool).await.map_err(db_err)?;
        debug!(collection = %collection, rows = rows.len(), "sqlite list");

        rows.into_iter()
            .map(|row| -> Result<Record> {
                let data: String = row.try_get("data").map_err(db_err)?;
                Ok(serde_json::from_str(&data)?)
            })
            .collect()
    }

    async fn distinct(
        &self,
        collection: Collection,
        field: &str,
        filter: &Filter,
    ) -> Result<BTreeSet<Value>> {
        let kind = collection.require_field(field)?;
        filter.validate(collection)?;

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT DISTINCT ");
        qb.push(field).push(" FROM ").push(collection.name());
        push_where(&mut qb, filter);

        let rows = qb.build().fetch_all(&self.pool).await.map_err(db_err)?;
        let mut values = BTreeSet::new();
        for row in &rows {
            if let Some(value) = decode_value(row, kind)? {
                values.insert(value);
            }
        }
        Ok(values)
    }
}

#[async_trait]
impl RecordStore for SqliteStorage {
    async fn insert(&self, record: Record) -> Result<()> {
        let collection = record.collection();
        let fields = collection.fields();
        let data = serde_json::to_string(&record)?;

        let mut qb = QueryBuilder::<Sqlite>::new("INSERT INTO ");
        qb.push(collection.name()).push(" (");
        for (name, _) in fields {
            qb.push(*name).push(", ");
        }
        qb.push("data) VALUES (");
        for (name, _) in fields {
            match record.field(name) {
                Some(value) => push_value(&mut qb, &value),
                None => {
                    qb.push("NULL");
                }
            }
            qb.push(", ");
        }
        qb.push_bind(data);
        qb.push(") ON CONFLICT(id) DO UPDATE SET ");
        for (name, _) in fields.iter().filter(|(name, _)| *name != "id") {
            qb.push(*name).push(" = excluded.").push(*name).push(", ");
        }
        qb.push("data = excluded.data");

        qb.build().execute(&self.pool).await.map_err(db_err)?;
        Ok(())
    }
}
