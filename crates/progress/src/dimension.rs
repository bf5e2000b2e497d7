//! Dimension progress: share of a dimension's practices done recently.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use cuidar_core::{CompletedPractice, Dimension, Time, UserId};
use cuidar_storage::{Collection, DataSource, Filter, OrderBy, Value};
use tracing::debug;

use crate::error::Result;

/// Trailing window used when none is configured.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Percentage of `total` represented by `done`, rounded, capped at 100.
///
/// Zero practices in a dimension means zero progress.
pub fn percentage(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = (done as f64 / total as f64).min(1.0);
    (ratio * 100.0).round() as u8
}

/// Computes how much of a dimension a user covered in a trailing window.
pub struct DimensionProgressCalculator<S: ?Sized = dyn DataSource> {
    source: Arc<S>,
    window_days: u32,
}

impl<S: DataSource + ?Sized> DimensionProgressCalculator<S> {
    /// Create a calculator with the default 30-day window.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    /// Set the trailing window in days.
    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }

    /// Oldest completion instant counted for `as_of`.
    ///
    /// A window reaching past the earliest representable instant covers the
    /// whole history.
    fn window_start(&self, as_of: Time) -> Time {
        Duration::try_days(i64::from(self.window_days))
            .and_then(|window| as_of.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Ids of every practice tagged with `dimension`.
    async fn practice_ids(&self, dimension: Dimension) -> Result<Vec<Value>> {
        let ids = self
            .source
            .distinct(
                Collection::Practices,
                "id",
                &Filter::new().eq("dimension", Value::text(dimension)),
            )
            .await?;
        Ok(ids.into_iter().collect())
    }

    /// Percentage (0-100) of the dimension's practices the user completed
    /// at least once since `as_of - window`.
    pub async fn compute(&self, user: UserId, dimension: Dimension, as_of: Time) -> Result<u8> {
        let total = self
            .source
            .count(
                Collection::Practices,
                &Filter::new().eq("dimension", Value::text(dimension)),
            )
            .await?;
        if total == 0 {
            debug!(%user, %dimension, "dimension has no practices");
            return Ok(0);
        }

        let since = self.window_start(as_of);
        let done = self
            .source
            .distinct(
                Collection::CompletedPractices,
                "practice_id",
                &Filter::new()
                    .eq("user_id", Value::text(user))
                    .gte("completed_at", since)
                    .is_in("practice_id", self.practice_ids(dimension).await?),
            )
            .await?
            .len() as u64;

        let result = percentage(done, total);
        debug!(%user, %dimension, done, total, percentage = result, "dimension progress");
        Ok(result)
    }

    /// Newest completion date within `dimension`, over the whole history.
    pub async fn last_practice_date(&self, user: UserId, dimension: Dimension) -> Result<Option<NaiveDate>> {
        let ids = self.practice_ids(dimension).await?;
        if ids.is_empty() {
            return Ok(None);
        }

        let rows = self
            .source
            .list(
                Collection::CompletedPractices,
                &Filter::new()
                    .eq("user_id", Value::text(user))
                    .is_in("practice_id", ids),
                Some(&OrderBy::desc("date")),
                Some(1),
            )
            .await?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(CompletedPractice::try_from(row)?.date)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProgressError;
    use crate::testing::{add_practice, complete_on, day, noon, FailingSource};
    use cuidar_storage::MemoryStorage;

    #[test]
    fn test_percentage_bounds() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(percentage(0, 3), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(3, 3), 100);
        assert_eq!(percentage(9, 3), 100);
    }

    #[test]
    fn test_percentage_always_in_range() {
        for total in 0..20u64 {
            for done in 0..40u64 {
                assert!(percentage(done, total) <= 100);
            }
        }
    }

    #[tokio::test]
    async fn test_empty_dimension_is_zero() {
        let store = Arc::new(MemoryStorage::new());
        add_practice(&store, "Alongamento", Dimension::Fisico, 5).await;

        let calc = DimensionProgressCalculator::new(store);
        let user = UserId::new();
        let result = calc.compute(user, Dimension::Social, noon(day(2026, 10, 18))).await.unwrap();
        assert_eq!(result, 0);
    }

    #[tokio::test]
    async fn test_repeats_count_once_and_window_applies() {
        let store = Arc::new(MemoryStorage::new());
        let a = add_practice(&store, "Conexão Profunda", Dimension::Emocional, 2).await;
        let b = add_practice(&store, "Carta de Amor Próprio", Dimension::Emocional, 10).await;
        let c = add_practice(&store, "Mapeando a Felicidade", Dimension::Emocional, 5).await;
        let _d = add_practice(&store, "Valor Pessoal", Dimension::Emocional, 5).await;
        let other = add_practice(&store, "Alongamento", Dimension::Fisico, 5).await;

        let user = UserId::new();
        let today = day(2026, 10, 18);
        complete_on(&store, user, &a, today).await;
        complete_on(&store, user, &a, day(2026, 10, 17)).await;
        complete_on(&store, user, &b, day(2026, 10, 1)).await;
        // Outside the 30-day window.
        complete_on(&store, user, &c, day(2026, 9, 1)).await;
        // Other dimension and other user do not count.
        complete_on(&store, user, &other, today).await;
        complete_on(&store, UserId::new(), &c, today).await;

        let calc = DimensionProgressCalculator::new(store);
        let result = calc.compute(user, Dimension::Emocional, noon(today)).await.unwrap();
        assert_eq!(result, 50);
    }

    #[tokio::test]
    async fn test_custom_window() {
        let store = Arc::new(MemoryStorage::new());
        let a = add_practice(&store, "Santuário", Dimension::Espiritual, 15).await;
        let user = UserId::new();
        complete_on(&store, user, &a, day(2026, 10, 10)).await;

        let calc = DimensionProgressCalculator::new(store).with_window_days(7);
        let result = calc.compute(user, Dimension::Espiritual, noon(day(2026, 10, 18))).await.unwrap();
        assert_eq!(result, 0);
    }

    #[tokio::test]
    async fn test_huge_window_covers_all_history() {
        let store = Arc::new(MemoryStorage::new());
        let a = add_practice(&store, "Santuário", Dimension::Espiritual, 15).await;
        let user = UserId::new();
        complete_on(&store, user, &a, day(1990, 1, 1)).await;

        let calc = DimensionProgressCalculator::new(store).with_window_days(u32::MAX);
        let result = calc.compute(user, Dimension::Espiritual, noon(day(2026, 10, 18))).await.unwrap();
        assert_eq!(result, 100);
    }

    #[tokio::test]
    async fn test_last_practice_date() {
        let store = Arc::new(MemoryStorage::new());
        let a = add_practice(&store, "Conexão Sensorial", Dimension::Intelectual, 10).await;
        let user = UserId::new();
        complete_on(&store, user, &a, day(2026, 10, 12)).await;
        complete_on(&store, user, &a, day(2026, 10, 15)).await;

        let calc = DimensionProgressCalculator::new(store);
        assert_eq!(
            calc.last_practice_date(user, Dimension::Intelectual).await.unwrap(),
            Some(day(2026, 10, 15))
        );
        assert_eq!(calc.last_practice_date(user, Dimension::Social).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let calc = DimensionProgressCalculator::new(Arc::new(FailingSource));
        let err = calc
            .compute(UserId::new(), Dimension::Fisico, noon(day(2026, 10, 18)))
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::SourceUnavailable(_)));
    }
}
