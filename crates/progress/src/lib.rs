//! Cuidar de Mim progress engine.
//!
//! Dimension progress, streaks and practice recommendations computed over an
//! injected [`cuidar_storage::DataSource`], plus the write paths around them
//! (completions, onboarding, snapshot refresh) and the day-to-day wellbeing
//! records (mood check-ins, habits, quote of the day).

#![warn(missing_docs)]

mod dimension;
mod engine;
mod error;
mod onboarding;
mod recommender;
mod streak;
mod wellbeing;

#[cfg(test)]
mod testing;

pub use dimension::{percentage, DimensionProgressCalculator, DEFAULT_WINDOW_DAYS};
pub use engine::{Dashboard, DimensionSummary, EngineConfig, ProgressEngine};
pub use error::{ProgressError, Result};
pub use onboarding::{complete_onboarding, OnboardingAnswers, AVAILABLE_TIME_OPTIONS};
pub use recommender::{weakest_dimension, PracticeRecommender, DEFAULT_AVAILABLE_MINUTES};
pub use streak::{streak_from_dates, StreakCalculator};
pub use wellbeing::{checkins_on, habits_on, quote_of_the_day, record_checkin, update_habits, HabitUpdate};
