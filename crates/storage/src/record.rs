//! Records as stored in a collection.

use cuidar_core::{
    CompletedPractice, DailyHabit, DimensionProgress, EmotionalCheckin, MotivationalQuote, Practice, Profile,
};
use serde::{Deserialize, Serialize};

use crate::query::{Collection, Value};
use crate::trait_::StorageError;

/// Any stored record, tagged with its collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "collection", content = "data", rename_all = "snake_case")]
pub enum Record {
    /// Row of `practices`
    Practice(Practice),
    /// Row of `completed_practices`
    CompletedPractice(CompletedPractice),
    /// Row of `profiles`
    Profile(Profile),
    /// Row of `dimension_progress`
    DimensionProgress(DimensionProgress),
    /// Row of `motivational_quotes`
    MotivationalQuote(MotivationalQuote),
    /// Row of `emotional_checkins`
    EmotionalCheckin(EmotionalCheckin),
    /// Row of `daily_habits`
    DailyHabit(DailyHabit),
}

impl Record {
    /// Collection this record lives in.
    pub fn collection(&self) -> Collection {
        match self {
            Record::Practice(_) => Collection::Practices,
            Record::CompletedPractice(_) => Collection::CompletedPractices,
            Record::Profile(_) => Collection::Profiles,
            Record::DimensionProgress(_) => Collection::DimensionProgress,
            Record::MotivationalQuote(_) => Collection::MotivationalQuotes,
            Record::EmotionalCheckin(_) => Collection::EmotionalCheckins,
            Record::DailyHabit(_) => Collection::DailyHabits,
        }
    }

    /// Primary key as text.
    pub fn id(&self) -> String {
        match self {
            Record::Practice(p) => p.id.to_string(),
            Record::CompletedPractice(c) => c.id.to_string(),
            Record::Profile(p) => p.id.to_string(),
            Record::DimensionProgress(d) => d.id.to_string(),
            Record::MotivationalQuote(q) => q.id.to_string(),
            Record::EmotionalCheckin(c) => c.id.to_string(),
            Record::DailyHabit(h) => h.id.to_string(),
        }
    }

    /// Value of a queryable field. `None` for nulls and unknown names.
    pub fn field(&self, name: &str) -> Option<Value> {
        match self {
            Record::Practice(p) => match name {
                "id" => Some(Value::text(p.id)),
                "title" => Some(Value::Text(p.title.clone())),
                "dimension" => Some(Value::text(p.dimension)),
                "duration_minutes" => Some(Value::from(p.duration_minutes)),
                "order_index" => p.order_index.map(|i| Value::Int(i as i64)),
                "created_at" => Some(Value::Timestamp(p.created_at)),
                _ => None,
            },
            Record::CompletedPractice(c) => match name {
                "id" => Some(Value::text(c.id)),
                "user_id" => Some(Value::text(c.user_id)),
                "practice_id" => Some(Value::text(c.practice_id)),
                "completed_at" => Some(Value::Timestamp(c.completed_at)),
                "date" => Some(Value::Date(c.date)),
                _ => None,
            },
            Record::Profile(p) => match name {
                "id" => Some(Value::text(p.id)),
                "email" => Some(Value::Text(p.email.clone())),
                "available_time" => p.available_time.map(Value::from),
                "onboarding_completed" => Some(Value::Bool(p.onboarding_completed)),
                "subscription_status" => Some(Value::Text(p.subscription_status.clone())),
                _ => None,
            },
            Record::DimensionProgress(d) => match name {
                "id" => Some(Value::text(d.id)),
                "user_id" => Some(Value::text(d.user_id)),
                "dimension" => Some(Value::text(d.dimension)),
                "percentage" => Some(Value::Int(d.percentage as i64)),
                "last_practice_date" => d.last_practice_date.map(Value::Date),
                "updated_at" => Some(Value::Timestamp(d.updated_at)),
                _ => None,
            },
            Record::MotivationalQuote(q) => match name {
                "id" => Some(Value::text(q.id)),
                "author" => q.author.clone().map(Value::Text),
                "created_at" => Some(Value::Timestamp(q.created_at)),
                _ => None,
            },
            Record::EmotionalCheckin(c) => match name {
                "id" => Some(Value::text(c.id)),
                "user_id" => Some(Value::text(c.user_id)),
                "date" => Some(Value::Date(c.date)),
                "mood" => Some(Value::Text(c.mood.clone())),
                "created_at" => Some(Value::Timestamp(c.created_at)),
                _ => None,
            },
            Record::DailyHabit(h) => match name {
                "id" => Some(Value::text(h.id)),
                "user_id" => Some(Value::text(h.user_id)),
                "date" => Some(Value::Date(h.date)),
                "water_glasses" => Some(Value::from(h.water_glasses)),
                "good_sleep" => h.good_sleep.map(Value::Bool),
                "exercised" => h.exercised.map(Value::Bool),
                "updated_at" => Some(Value::Timestamp(h.updated_at)),
                _ => None,
            },
        }
    }
}

macro_rules! record_conversions {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Record {
            fn from(value: $ty) -> Self {
                Record::$variant(value)
            }
        }

        impl TryFrom<Record> for $ty {
            type Error = StorageError;

            fn try_from(record: Record) -> Result<Self, Self::Error> {
                match record {
                    Record::$variant(value) => Ok(value),
                    other => Err(StorageError::TypeMismatch {
                        expected: stringify!($variant),
                        found: other.collection(),
                    }),
                }
            }
        }
    };
}

record_conversions!(Practice, Practice);
record_conversions!(CompletedPractice, CompletedPractice);
record_conversions!(Profile, Profile);
record_conversions!(DimensionProgress, DimensionProgress);
record_conversions!(MotivationalQuote, MotivationalQuote);
record_conversions!(EmotionalCheckin, EmotionalCheckin);
record_conversions!(DailyHabit, DailyHabit);

/// Convert a list result into typed records, failing on the first mismatch.
pub fn typed<T>(records: Vec<Record>) -> Result<Vec<T>, StorageError>
where
    T: TryFrom<Record, Error = StorageError>,
{
    records.into_iter().map(T::try_from).collect()
}
