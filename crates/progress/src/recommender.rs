//! Practice recommendation.
//!
//! Picks the shortest practice that fits the user's time budget, belongs to
//! the user's weakest dimension and was not already done today.

use std::sync::Arc;

use chrono::NaiveDate;
use cuidar_core::{Dimension, DimensionProgress, Practice, Profile, UserId};
use cuidar_storage::{typed, Collection, DataSource, Filter, OrderBy, Value};
use tracing::{debug, info};

use crate::error::Result;

/// Time budget assumed when the profile has none.
pub const DEFAULT_AVAILABLE_MINUTES: u32 = 10;

/// Dimension with the lowest percentage.
///
/// Ties go to the dimension that comes first in [`Dimension::ALL`].
pub fn weakest_dimension(progress: &[DimensionProgress]) -> Option<Dimension> {
    progress
        .iter()
        .min_by_key(|p| (p.percentage, p.dimension))
        .map(|p| p.dimension)
}

/// Recommends one practice for a user.
pub struct PracticeRecommender<S: ?Sized = dyn DataSource> {
    source: Arc<S>,
    default_available_minutes: u32,
}

impl<S: DataSource + ?Sized> PracticeRecommender<S> {
    /// Create a recommender with the default 10-minute budget.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            default_available_minutes: DEFAULT_AVAILABLE_MINUTES,
        }
    }

    /// Budget used for profiles without one.
    pub fn with_default_available_minutes(mut self, minutes: u32) -> Self {
        self.default_available_minutes = minutes;
        self
    }

    async fn profile(&self, user: UserId) -> Result<Option<Profile>> {
        let rows = self
            .source
            .list(
                Collection::Profiles,
                &Filter::new().eq("id", Value::text(user)),
                None,
                Some(1),
            )
            .await?;
        Ok(typed::<Profile>(rows)?.into_iter().next())
    }

    async fn progress(&self, user: UserId) -> Result<Vec<DimensionProgress>> {
        let rows = self
            .source
            .list(
                Collection::DimensionProgress,
                &Filter::new().eq("user_id", Value::text(user)),
                Some(&OrderBy::asc("percentage")),
                None,
            )
            .await?;
        Ok(typed(rows)?)
    }

    async fn completed_on(&self, user: UserId, today: NaiveDate) -> Result<Vec<Value>> {
        let ids = self
            .source
            .distinct(
                Collection::CompletedPractices,
                "practice_id",
                &Filter::new()
                    .eq("user_id", Value::text(user))
                    .eq("date", today),
            )
            .await?;
        Ok(ids.into_iter().collect())
    }

    /// Recommend a practice for `today`, or `None` when nothing fits.
    ///
    /// Users without a profile get no recommendation. A missing or zero
    /// budget reads as the default.
    pub async fn recommend(&self, user: UserId, today: NaiveDate) -> Result<Option<Practice>> {
        let Some(profile) = self.profile(user).await? else {
            debug!(%user, "no profile, nothing to recommend");
            return Ok(None);
        };
        let budget = profile
            .available_time
            .filter(|minutes| *minutes > 0)
            .unwrap_or(self.default_available_minutes);

        let dimension = weakest_dimension(&self.progress(user).await?);
        let done_today = self.completed_on(user, today).await?;

        let mut filter = Filter::new().lte("duration_minutes", budget);
        if let Some(dimension) = dimension {
            filter = filter.eq("dimension", Value::text(dimension));
        }
        filter = filter.not_in("id", done_today);

        let rows = self
            .source
            .list(
                Collection::Practices,
                &filter,
                Some(&OrderBy::asc("duration_minutes")),
                Some(1),
            )
            .await?;
        let practice = typed::<Practice>(rows)?.into_iter().next();

        match &practice {
            Some(p) => info!(%user, budget, dimension = ?dimension, practice = %p.id, "recommended practice"),
            None => info!(%user, budget, dimension = ?dimension, "no eligible practice"),
        }
        Ok(practice)
    }
}
