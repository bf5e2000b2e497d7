//! Day-to-day wellbeing records: quotes, mood check-ins and habits.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::{CheckinId, HabitId, QuoteId, UserId};
use crate::Time;

/// A motivational quote from the shared catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotivationalQuote {
    /// Unique identifier
    pub id: QuoteId,

    /// Quote text
    pub text: String,

    /// Attribution, when known
    #[serde(default)]
    pub author: Option<String>,

    /// When created
    pub created_at: Time,
}

impl MotivationalQuote {
    /// Create an unattributed quote.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: QuoteId::new(),
            text: text.into(),
            author: None,
            created_at: chrono::Utc::now(),
        }
    }
}

/// One mood check-in. A user may check in several times a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalCheckin {
    /// Unique identifier
    pub id: CheckinId,

    /// Owner
    pub user_id: UserId,

    /// Local calendar date
    pub date: NaiveDate,

    /// Local time of day ("21:05")
    pub time: String,

    /// Mood label ("calma", "cansada", ...)
    pub mood: String,

    /// Emoji shown next to the mood
    pub mood_emoji: String,

    /// Free-form note
    #[serde(default)]
    pub note: Option<String>,

    /// When recorded
    pub created_at: Time,
}

impl EmotionalCheckin {
    /// Create a check-in without a note.
    pub fn new(
        user_id: UserId,
        date: NaiveDate,
        time: impl Into<String>,
        mood: impl Into<String>,
        mood_emoji: impl Into<String>,
    ) -> Self {
        Self {
            id: CheckinId::new(),
            user_id,
            date,
            time: time.into(),
            mood: mood.into(),
            mood_emoji: mood_emoji.into(),
            note: None,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Habit tracking for one user on one day.
///
/// `None` on a yes/no habit means the user has not answered yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyHabit {
    /// Unique identifier
    pub id: HabitId,

    /// Owner
    pub user_id: UserId,

    /// Local calendar date
    pub date: NaiveDate,

    /// Glasses of water drunk
    #[serde(default)]
    pub water_glasses: u32,

    /// Slept well last night
    #[serde(default)]
    pub good_sleep: Option<bool>,

    /// Exercised today
    #[serde(default)]
    pub exercised: Option<bool>,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl DailyHabit {
    /// Empty row for `date`.
    pub fn new(user_id: UserId, date: NaiveDate) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: HabitId::new(),
            user_id,
            date,
            water_glasses: 0,
            good_sleep: None,
            exercised: None,
            created_at: now,
            updated_at: now,
        }
    }
}
