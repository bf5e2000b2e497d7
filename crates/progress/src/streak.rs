//! Consecutive-day completion streaks.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use cuidar_core::UserId;
use cuidar_storage::{Collection, DataSource, Filter, StorageError, Value};
use tracing::debug;

use crate::error::Result;

/// Length of the streak ending at `as_of` or the day before.
///
/// Dates are collapsed to unique days first. A newest day two or more days
/// before `as_of` means the streak is broken. Otherwise count back from the
/// newest day and stop at the first gap.
pub fn streak_from_dates(dates: impl IntoIterator<Item = NaiveDate>, as_of: NaiveDate) -> u32 {
    let unique: BTreeSet<NaiveDate> = dates.into_iter().collect();
    let newest_first: Vec<NaiveDate> = unique.into_iter().rev().collect();

    let Some(most_recent) = newest_first.first() else {
        return 0;
    };

    if (as_of - *most_recent).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    for pair in newest_first.windows(2) {
        if (pair[0] - pair[1]).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Computes a user's current streak.
pub struct StreakCalculator<S: ?Sized = dyn DataSource> {
    source: Arc<S>,
}

impl<S: DataSource + ?Sized> StreakCalculator<S> {
    /// Create a calculator.
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Days in a row, ending today or yesterday, with at least one completion.
    pub async fn compute(&self, user: UserId, as_of: NaiveDate) -> Result<u32> {
        let values = self
            .source
            .distinct(
                Collection::CompletedPractices,
                "date",
                &Filter::new().eq("user_id", Value::text(user)),
            )
            .await?;

        let dates = values
            .iter()
            .map(|v| {
                v.as_date().ok_or_else(|| {
                    StorageError::Other(format!("completion date is not a date: {:?}", v))
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let streak = streak_from_dates(dates, as_of);
        debug!(%user, %as_of, days = values.len(), streak, "streak");
        Ok(streak)
    }
}
