//! Query model shared by every backend.
//!
//! Filters are conjunctions of simple predicates over named fields of one
//! collection. Field names and value kinds are checked against the
//! collection schema before anything runs, so a typo fails loudly instead
//! of matching no rows.

use chrono::NaiveDate;
use cuidar_core::Time;
use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::trait_::{Result, StorageError};

/// A named record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Reference practices
    Practices,
    /// Completion events
    CompletedPractices,
    /// User profiles
    Profiles,
    /// Per-dimension progress snapshots
    DimensionProgress,
    /// Shared quote catalog
    MotivationalQuotes,
    /// Mood check-ins
    EmotionalCheckins,
    /// One habit row per user and day
    DailyHabits,
}

impl Collection {
    /// Every collection.
    pub const ALL: [Collection; 7] = [
        Collection::Practices,
        Collection::CompletedPractices,
        Collection::Profiles,
        Collection::DimensionProgress,
        Collection::MotivationalQuotes,
        Collection::EmotionalCheckins,
        Collection::DailyHabits,
    ];

    /// Table / directory name.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Practices => "practices",
            Collection::CompletedPractices => "completed_practices",
            Collection::Profiles => "profiles",
            Collection::DimensionProgress => "dimension_progress",
            Collection::MotivationalQuotes => "motivational_quotes",
            Collection::EmotionalCheckins => "emotional_checkins",
            Collection::DailyHabits => "daily_habits",
        }
    }

    /// Queryable fields and their kinds.
    pub fn fields(&self) -> &'static [(&'static str, FieldKind)] {
        use FieldKind::*;
        match self {
            Collection::Practices => &[
                ("id", Text),
                ("title", Text),
                ("dimension", Text),
                ("duration_minutes", Int),
                ("order_index", Int),
                ("created_at", Timestamp),
            ],
            Collection::CompletedPractices => &[
                ("id", Text),
                ("user_id", Text),
                ("practice_id", Text),
                ("completed_at", Timestamp),
                ("date", Date),
            ],
            Collection::Profiles => &[
                ("id", Text),
                ("email", Text),
                ("available_time", Int),
                ("onboarding_completed", Bool),
                ("subscription_status", Text),
            ],
            Collection::DimensionProgress => &[
                ("id", Text),
                ("user_id", Text),
                ("dimension", Text),
                ("percentage", Int),
                ("last_practice_date", Date),
                ("updated_at", Timestamp),
            ],
            Collection::MotivationalQuotes => &[
                ("id", Text),
                ("author", Text),
                ("created_at", Timestamp),
            ],
            Collection::EmotionalCheckins => &[
                ("id", Text),
                ("user_id", Text),
                ("date", Date),
                ("mood", Text),
                ("created_at", Timestamp),
            ],
            Collection::DailyHabits => &[
                ("id", Text),
                ("user_id", Text),
                ("date", Date),
                ("water_glasses", Int),
                ("good_sleep", Bool),
                ("exercised", Bool),
                ("updated_at", Timestamp),
            ],
        }
    }

    /// Kind of `field`, if the collection has it.
    pub fn field_kind(&self, field: &str) -> Option<FieldKind> {
        self.fields()
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, kind)| *kind)
    }

    /// Kind of `field`, or an error naming the collection.
    pub fn require_field(&self, field: &str) -> Result<FieldKind> {
        self.field_kind(field).ok_or_else(|| {
            StorageError::InvalidQuery(format!("{} has no field '{}'", self.name(), field))
        })
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of a queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// String (ids, labels)
    Text,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// Calendar date
    Date,
    /// UTC instant
    Timestamp,
}

/// A scalar field value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// String
    Text(String),
    /// Integer
    Int(i64),
    /// Boolean
    Bool(bool),
    /// Calendar date
    Date(NaiveDate),
    /// UTC instant
    Timestamp(Time),
}

impl Value {
    /// Kind of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Text(_) => FieldKind::Text,
            Value::Int(_) => FieldKind::Int,
            Value::Bool(_) => FieldKind::Bool,
            Value::Date(_) => FieldKind::Date,
            Value::Timestamp(_) => FieldKind::Timestamp,
        }
    }

    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Date content, if this is a date value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Text value from anything displayable (ids, dimensions).
    pub fn text(value: impl std::fmt::Display) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<Time> for Value {
    fn from(t: Time) -> Self {
        Value::Timestamp(t)
    }
}

/// One condition on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// field = value
    Eq(String, Value),
    /// field >= value
    Gte(String, Value),
    /// field <= value
    Lte(String, Value),
    /// field is one of the values
    In(String, Vec<Value>),
    /// field is none of the values
    NotIn(String, Vec<Value>),
}

impl Predicate {
    /// Field this predicate tests.
    pub fn field(&self) -> &str {
        match self {
            Predicate::Eq(f, _)
            | Predicate::Gte(f, _)
            | Predicate::Lte(f, _)
            | Predicate::In(f, _)
            | Predicate::NotIn(f, _) => f,
        }
    }

    /// Values this predicate compares against.
    pub fn values(&self) -> Vec<&Value> {
        match self {
            Predicate::Eq(_, v) | Predicate::Gte(_, v) | Predicate::Lte(_, v) => vec![v],
            Predicate::In(_, vs) | Predicate::NotIn(_, vs) => vs.iter().collect(),
        }
    }

    /// Evaluate against a field value; `None` is a null field.
    ///
    /// Nulls never match a comparison or membership test and always pass
    /// an exclusion.
    pub fn matches(&self, actual: Option<&Value>) -> bool {
        match (self, actual) {
            (Predicate::NotIn(_, excluded), Some(v)) => !excluded.contains(v),
            (Predicate::NotIn(_, _), None) => true,
            (_, None) => false,
            (Predicate::Eq(_, expected), Some(v)) => v == expected,
            (Predicate::Gte(_, bound), Some(v)) => v >= bound,
            (Predicate::Lte(_, bound), Some(v)) => v <= bound,
            (Predicate::In(_, allowed), Some(v)) => allowed.contains(v),
        }
    }
}

/// Conjunction of predicates. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// All must hold
    pub predicates: Vec<Predicate>,
}

impl Filter {
    /// Match everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field = value`.
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Eq(field.to_string(), value.into()));
        self
    }

    /// Require `field >= value`.
    pub fn gte(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Gte(field.to_string(), value.into()));
        self
    }

    /// Require `field <= value`.
    pub fn lte(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Lte(field.to_string(), value.into()));
        self
    }

    /// Require `field` to be one of `values`.
    pub fn is_in(mut self, field: &str, values: impl IntoIterator<Item = Value>) -> Self {
        self.predicates.push(Predicate::In(field.to_string(), values.into_iter().collect()));
        self
    }

    /// Require `field` to be none of `values`. A no-op when `values` is empty.
    pub fn not_in(mut self, field: &str, values: impl IntoIterator<Item = Value>) -> Self {
        let values: Vec<Value> = values.into_iter().collect();
        if !values.is_empty() {
            self.predicates.push(Predicate::NotIn(field.to_string(), values));
        }
        self
    }

    /// Check every predicate names a field of `collection` with a value of
    /// the right kind.
    pub fn validate(&self, collection: Collection) -> Result<()> {
        for predicate in &self.predicates {
            let kind = collection.require_field(predicate.field())?;
            if let Some(bad) = predicate.values().into_iter().find(|v| v.kind() != kind) {
                return Err(StorageError::InvalidQuery(format!(
                    "{}.{} is {:?}, compared against {:?}",
                    collection, predicate.field(), kind, bad
                )));
            }
        }
        Ok(())
    }

    /// Whether `record` satisfies every predicate.
    pub fn matches(&self, record: &Record) -> bool {
        self.predicates
            .iter()
            .all(|p| p.matches(record.field(p.field()).as_ref()))
    }
}

/// Sort order for `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Field to sort on
    pub field: String,
    /// Ascending when true
    pub ascending: bool,
}

impl OrderBy {
    /// Ascending on `field`.
    pub fn asc(field: &str) -> Self {
        Self { field: field.to_string(), ascending: true }
    }

    /// Descending on `field`.
    pub fn desc(field: &str) -> Self {
        Self { field: field.to_string(), ascending: false }
    }
}

/// Run a query over records already loaded in memory.
///
/// Records must all belong to `collection` and arrive in insertion order;
/// the sort is stable so ties keep that order.
pub fn execute(
    collection: Collection,
    records: impl IntoIterator<Item = Record>,
    filter: &Filter,
    order: Option<&OrderBy>,
    limit: Option<usize>,
) -> Result<Vec<Record>> {
    filter.validate(collection)?;
    if let Some(order) = order {
        collection.require_field(&order.field)?;
    }

    let mut rows: Vec<Record> = records
        .into_iter()
        .filter(|r| r.collection() == collection && filter.matches(r))
        .collect();

    if let Some(order) = order {
        rows.sort_by(|a, b| {
            let ord = a.field(&order.field).cmp(&b.field(&order.field));
            if order.ascending { ord } else { ord.reverse() }
        });
    }

    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuidar_core::{Dimension, Practice};

    fn practice(title: &str, dimension: Dimension, minutes: u32) -> Record {
        Record::Practice(Practice::new(title, dimension, minutes, "desc"))
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let filter = Filter::new().eq("colour", "blue");
        let err = filter.validate(Collection::Practices).unwrap_err();
        assert!(matches!(err, StorageError::InvalidQuery(_)));
    }

    #[test]
    fn test_wrong_value_kind_is_rejected() {
        let filter = Filter::new().lte("duration_minutes", "ten");
        assert!(filter.validate(Collection::Practices).is_err());
        let filter = Filter::new().lte("duration_minutes", 10u32);
        assert!(filter.validate(Collection::Practices).is_ok());
    }

    #[test]
    fn test_null_fields_and_exclusion() {
        let p = Predicate::NotIn("order_index".into(), vec![Value::Int(1)]);
        assert!(p.matches(None));
        let p = Predicate::Gte("order_index".into(), Value::Int(1));
        assert!(!p.matches(None));
        let p = Predicate::In("order_index".into(), vec![Value::Int(1)]);
        assert!(p.matches(Some(&Value::Int(1))));
    }

    #[test]
    fn test_empty_not_in_adds_nothing() {
        let filter = Filter::new().not_in("id", Vec::new());
        assert!(filter.predicates.is_empty());
    }

    #[test]
    fn test_execute_filters_sorts_and_limits() {
        let records = vec![
            practice("long", Dimension::Fisico, 15),
            practice("short", Dimension::Fisico, 2),
            practice("other", Dimension::Social, 1),
            practice("mid", Dimension::Fisico, 5),
        ];
        let filter = Filter::new()
            .eq("dimension", Value::text(Dimension::Fisico))
            .lte("duration_minutes", 10u32);
        let rows = execute(
            Collection::Practices,
            records,
            &filter,
            Some(&OrderBy::asc("duration_minutes")),
            Some(1),
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        match &rows[0] {
            Record::Practice(p) => assert_eq!(p.title, "short"),
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_execute_descending_keeps_ties_in_insertion_order() {
        let records = vec![
            practice("a", Dimension::Fisico, 5),
            practice("b", Dimension::Fisico, 5),
            practice("c", Dimension::Fisico, 10),
        ];
        let rows = execute(
            Collection::Practices,
            records,
            &Filter::new(),
            Some(&OrderBy::desc("duration_minutes")),
            None,
        )
        .unwrap();
        let titles: Vec<_> = rows
            .iter()
            .map(|r| match r {
                Record::Practice(p) => p.title.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    }
}
