//! Storage abstraction and implementations for Cuidar de Mim.
//!
//! This crate provides the [`DataSource`] query interface over the record
//! collections, a [`RecordStore`] write extension, and in-memory,
//! JSON-file (feature `json`, on by default) and SQLite (feature `sqlite`)
//! backends.

#![warn(missing_docs)]

pub mod trait_;
pub mod query;
pub mod record;
pub mod memory;
#[cfg(feature = "json")]
pub mod json_storage;
pub mod seed;

#[cfg(feature = "sqlite")]
pub mod sqlite_storage;

pub use trait_::{DataSource, RecordStore, StorageError, Result};
pub use query::{Collection, FieldKind, Filter, OrderBy, Predicate, Value};
pub use record::{typed, Record};
pub use memory::MemoryStorage;
#[cfg(feature = "json")]
pub use json_storage::JsonStorage;
pub use seed::{seed_practices, seed_quotes, SeedPractice, CATALOG, QUOTES};

#[cfg(feature = "sqlite")]
pub use sqlite_storage::SqliteStorage;
