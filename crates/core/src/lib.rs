//! Cuidar de Mim core data models.
//!
//! Typed records for practices, completions, profiles, dimension progress,
//! quotes, mood check-ins and daily habits, plus the small pure helpers the
//! app shows around them.

#![warn(missing_docs)]

// Identities
mod id;

// Records
mod dimension;
mod practice;
mod profile;
mod wellbeing;

// Pure helpers
mod access;
mod format;

// Re-exports
pub use id::*;

pub use dimension::{Dimension, ParseDimensionError};
pub use practice::{CompletedPractice, Practice};
pub use profile::{DimensionProgress, Profile};
pub use wellbeing::{DailyHabit, EmotionalCheckin, MotivationalQuote};

pub use access::{decide_route, is_gated, RouteDecision, PUBLIC_ROUTES};
pub use format::{format_date_br, format_duration, format_relative_date, DayPeriod};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
