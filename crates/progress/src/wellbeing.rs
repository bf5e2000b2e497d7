//! Mood check-ins, daily habits and the quote of the day.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use cuidar_core::{DailyHabit, EmotionalCheckin, MotivationalQuote, UserId};
use cuidar_storage::{typed, Collection, DataSource, Filter, OrderBy, Record, RecordStore, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProgressError, Result};

/// Partial update to a day's habits. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitUpdate {
    /// Glasses of water drunk
    #[serde(default)]
    pub water_glasses: Option<u32>,
    /// Slept well last night
    #[serde(default)]
    pub good_sleep: Option<bool>,
    /// Exercised today
    #[serde(default)]
    pub exercised: Option<bool>,
}

/// Record a mood check-in at local time `at`.
pub async fn record_checkin<Tz: TimeZone>(
    store: &dyn RecordStore,
    user: UserId,
    mood: &str,
    mood_emoji: &str,
    note: Option<String>,
    at: DateTime<Tz>,
) -> Result<EmotionalCheckin> {
    let mood = mood.trim();
    if mood.is_empty() {
        return Err(ProgressError::InvalidCheckin("mood is required".into()));
    }

    let mut checkin = EmotionalCheckin::new(
        user,
        at.date_naive(),
        at.time().format("%H:%M").to_string(),
        mood,
        mood_emoji,
    );
    checkin.note = note.filter(|n| !n.trim().is_empty());
    checkin.created_at = at.with_timezone(&Utc);
    store.insert(Record::from(checkin.clone())).await?;

    info!(%user, mood, date = %checkin.date, "mood check-in recorded");
    Ok(checkin)
}

/// Check-ins of `user` on `date`, earliest first.
pub async fn checkins_on<S: DataSource + ?Sized>(source: &S, user: UserId, date: NaiveDate) -> Result<Vec<EmotionalCheckin>> {
    let filter = Filter::new().eq("user_id", Value::text(user)).eq("date", date);
    let rows = source
        .list(Collection::EmotionalCheckins, &filter, Some(&OrderBy::asc("created_at")), None)
        .await?;
    Ok(typed(rows)?)
}

/// Habits of `user` on `date`, if any were tracked.
pub async fn habits_on<S: DataSource + ?Sized>(source: &S, user: UserId, date: NaiveDate) -> Result<Option<DailyHabit>> {
    let filter = Filter::new().eq("user_id", Value::text(user)).eq("date", date);
    let rows = source.list(Collection::DailyHabits, &filter, None, Some(1)).await?;
    Ok(typed::<DailyHabit>(rows)?.into_iter().next())
}

/// Merge `changes` into the habits of `user` on `date`, creating the row on
/// first use.
pub async fn update_habits(
    store: &dyn RecordStore,
    user: UserId,
    date: NaiveDate,
    changes: &HabitUpdate,
    now: DateTime<Utc>,
) -> Result<DailyHabit> {
    let mut habit = match habits_on(store, user, date).await? {
        Some(habit) => habit,
        None => {
            let mut habit = DailyHabit::new(user, date);
            habit.created_at = now;
            habit
        }
    };

    if let Some(glasses) = changes.water_glasses {
        habit.water_glasses = glasses;
    }
    if let Some(slept) = changes.good_sleep {
        habit.good_sleep = Some(slept);
    }
    if let Some(exercised) = changes.exercised {
        habit.exercised = Some(exercised);
    }
    habit.updated_at = now;

    let saved = store.upsert_daily_habit(&habit).await?;
    debug!(%user, %date, water = saved.water_glasses, "habits updated");
    Ok(saved)
}

/// The quote shown on `date`.
///
/// Walks the catalog one quote per day, in catalog order. `None` when the
/// catalog is empty.
pub async fn quote_of_the_day<S: DataSource + ?Sized>(source: &S, date: NaiveDate) -> Result<Option<MotivationalQuote>> {
    let quotes: Vec<MotivationalQuote> = typed(
        source
            .list(Collection::MotivationalQuotes, &Filter::new(), None, None)
            .await?,
    )?;
    if quotes.is_empty() {
        return Ok(None);
    }

    let day = usize::try_from(date.num_days_from_ce().rem_euclid(quotes.len() as i32)).unwrap_or(0);
    Ok(quotes.into_iter().nth(day))
}
