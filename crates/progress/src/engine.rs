//! The progress engine - one entry point over a single record store.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use cuidar_core::{
    decide_route, format_date_br, format_duration, CompletedPractice, DailyHabit, DayPeriod, Dimension,
    DimensionProgress, EmotionalCheckin, Practice, PracticeId, RouteDecision, Time, UserId,
};
use cuidar_storage::{Collection, Filter, Record, RecordStore, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dimension::{DimensionProgressCalculator, DEFAULT_WINDOW_DAYS};
use crate::error::{ProgressError, Result};
use crate::onboarding::{self, load_profile, OnboardingAnswers};
use crate::recommender::{PracticeRecommender, DEFAULT_AVAILABLE_MINUTES};
use crate::streak::StreakCalculator;
use crate::wellbeing::{self, HabitUpdate};

/// Configuration for the progress engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Trailing window for dimension progress, in days
    pub window_days: u32,
    /// Time budget for profiles that never set one, in minutes
    pub default_available_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            default_available_minutes: DEFAULT_AVAILABLE_MINUTES,
        }
    }
}

/// One dimension as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSummary {
    /// Dimension
    pub dimension: Dimension,
    /// Percentage over the configured window
    pub percentage: u8,
}

/// Everything the home screen shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// "Bom dia, Ana"
    pub greeting: String,
    /// "18 de outubro de 2026"
    pub date_label: String,
    /// Consecutive days with a completion
    pub streak: u32,
    /// Every dimension in canonical order
    pub dimensions: Vec<DimensionSummary>,
    /// Suggested next practice
    pub recommendation: Option<Practice>,
    /// Recommended practice duration, formatted
    pub recommendation_duration: Option<String>,
    /// Quote of the day, when the catalog is seeded
    #[serde(default)]
    pub quote: Option<String>,
}

/// The progress engine.
///
/// Owns the injected store and hands out the three calculators over it.
pub struct ProgressEngine {
    store: Arc<dyn RecordStore>,
    config: EngineConfig,
}

impl ProgressEngine {
    /// Create an engine with the default configuration.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Dimension progress calculator over this engine's store.
    pub fn dimension_progress(&self) -> DimensionProgressCalculator<dyn RecordStore> {
        DimensionProgressCalculator::new(self.store.clone()).with_window_days(self.config.window_days)
    }

    /// Streak calculator over this engine's store.
    pub fn streak(&self) -> StreakCalculator<dyn RecordStore> {
        StreakCalculator::new(self.store.clone())
    }

    /// Recommender over this engine's store.
    pub fn recommender(&self) -> PracticeRecommender<dyn RecordStore> {
        PracticeRecommender::new(self.store.clone())
            .with_default_available_minutes(self.config.default_available_minutes)
    }

    /// Recompute and persist every dimension snapshot for `user`.
    pub async fn refresh_dimension_progress(&self, user: UserId, as_of: Time) -> Result<Vec<DimensionProgress>> {
        let calc = self.dimension_progress();
        let mut rows = Vec::with_capacity(Dimension::ALL.len());

        for dimension in Dimension::ALL {
            let mut snapshot = DimensionProgress::new(user, dimension, calc.compute(user, dimension, as_of).await?);
            snapshot.last_practice_date = calc.last_practice_date(user, dimension).await?;
            snapshot.updated_at = as_of;
            rows.push(self.store.upsert_dimension_progress(&snapshot).await?);
        }

        info!(%user, "dimension progress refreshed");
        Ok(rows)
    }

    /// Record that `user` did `practice` at `at`.
    ///
    /// The completion date is the calendar date of `at` in its own time zone.
    pub async fn complete_practice<Tz: TimeZone>(
        &self,
        user: UserId,
        practice: PracticeId,
        reflection: Option<String>,
        at: DateTime<Tz>,
    ) -> Result<CompletedPractice> {
        let exists = self
            .store
            .count(Collection::Practices, &Filter::new().eq("id", Value::text(practice)))
            .await?;
        if exists == 0 {
            return Err(ProgressError::UnknownPractice(practice));
        }

        let mut completion = CompletedPractice::new(user, practice, at.with_timezone(&Utc), at.date_naive());
        if let Some(text) = reflection.filter(|t| !t.trim().is_empty()) {
            completion = completion.with_reflection(text);
        }
        self.store.insert(Record::from(completion.clone())).await?;

        info!(%user, %practice, date = %completion.date, "practice completed");
        Ok(completion)
    }

    /// Apply onboarding answers to the user's profile.
    pub async fn complete_onboarding(
        &self,
        user: UserId,
        answers: &OnboardingAnswers,
        now: Time,
    ) -> Result<cuidar_core::Profile> {
        onboarding::complete_onboarding(self.store.as_ref(), user, answers, now).await
    }

    /// Route decision for `path` given the signed-in user, if any.
    pub async fn route_for(&self, path: &str, user: Option<UserId>) -> Result<RouteDecision> {
        let onboarding_completed = match user {
            Some(user) => load_profile(self.store.as_ref(), user)
                .await?
                .map(|p| p.onboarding_completed),
            None => None,
        };
        let decision = decide_route(path, user.is_some(), onboarding_completed);
        debug!(path, ?decision, "route");
        Ok(decision)
    }

    /// Build the home screen summary at local time `now`.
    ///
    /// Refreshes the stored dimension snapshots on the way.
    pub async fn dashboard<Tz: TimeZone>(&self, user: UserId, now: DateTime<Tz>) -> Result<Dashboard> {
        let today = now.date_naive();
        let as_of = now.with_timezone(&Utc);

        let profile = load_profile(self.store.as_ref(), user)
            .await?
            .ok_or(ProgressError::ProfileNotFound(user))?;

        let period = DayPeriod::from_hour(now.hour());
        let greeting = match profile.name.trim() {
            "" => period.greeting().to_string(),
            name => format!("{}, {}", period.greeting(), name),
        };

        // The recommender reads the stored snapshots.
        let dimensions = self
            .refresh_dimension_progress(user, as_of)
            .await?
            .into_iter()
            .map(|p| DimensionSummary {
                dimension: p.dimension,
                percentage: p.percentage,
            })
            .collect();

        let streak = self.streak().compute(user, today).await?;
        let recommendation = self.recommender().recommend(user, today).await?;
        let recommendation_duration = recommendation.as_ref().map(|p| format_duration(p.duration_minutes));
        let quote = wellbeing::quote_of_the_day(self.store.as_ref(), today)
            .await?
            .map(|q| q.text);

        Ok(Dashboard {
            greeting,
            date_label: format_date_br(today),
            streak,
            dimensions,
            recommendation,
            recommendation_duration,
            quote,
        })
    }

    /// Record a mood check-in at local time `at`.
    pub async fn record_checkin<Tz: TimeZone>(
        &self,
        user: UserId,
        mood: &str,
        mood_emoji: &str,
        note: Option<String>,
        at: DateTime<Tz>,
    ) -> Result<EmotionalCheckin> {
        wellbeing::record_checkin(self.store.as_ref(), user, mood, mood_emoji, note, at).await
    }

    /// Merge `changes` into the user's habits for `date`.
    pub async fn update_habits(
        &self,
        user: UserId,
        date: NaiveDate,
        changes: &HabitUpdate,
        now: Time,
    ) -> Result<DailyHabit> {
        wellbeing::update_habits(self.store.as_ref(), user, date, changes, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{day, noon, FailingSource};
    use chrono::FixedOffset;
    use cuidar_core::Profile;
    use cuidar_storage::{seed_practices, seed_quotes, typed, DataSource, JsonStorage, MemoryStorage, OrderBy, QUOTES};

    async fn seeded() -> (Arc<MemoryStorage>, ProgressEngine) {
        let store = Arc::new(MemoryStorage::new());
        seed_practices(store.as_ref()).await.unwrap();
        let engine = ProgressEngine::new(store.clone());
        (store, engine)
    }

    async fn practice_titled(store: &dyn DataSource, title: &str) -> Practice {
        let rows = store
            .list(Collection::Practices, &Filter::new().eq("title", title), None, Some(1))
            .await
            .unwrap();
        typed::<Practice>(rows).unwrap().remove(0)
    }

    async fn onboarded(engine: &ProgressEngine, store: &MemoryStorage, minutes: u32) -> UserId {
        let user = UserId::new();
        store
            .insert(Record::from(Profile::new(user, "", "ana@example.com")))
            .await
            .unwrap();
        let answers = OnboardingAnswers {
            name: "Ana".into(),
            is_mother: Some(false),
            available_time: minutes,
            ..Default::default()
        };
        engine
            .complete_onboarding(user, &answers, noon(day(2026, 10, 1)))
            .await
            .unwrap();
        user
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: EngineConfig = serde_json::from_str(r#"{"window_days": 7}"#).unwrap();
        assert_eq!(config.window_days, 7);
        assert_eq!(config.default_available_minutes, 10);
        assert_eq!(serde_json::from_str::<EngineConfig>("{}").unwrap(), EngineConfig::default());
    }

    #[tokio::test]
    async fn test_complete_practice_uses_local_date() {
        let (store, engine) = seeded().await;
        let practice = practice_titled(store.as_ref(), "Conexão Profunda").await;
        let user = UserId::new();

        // 22:30 in São Paulo is already the next day in UTC.
        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        let at = brt.with_ymd_and_hms(2026, 10, 18, 22, 30, 0).unwrap();

        let done = engine
            .complete_practice(user, practice.id, Some("  ".into()), at)
            .await
            .unwrap();
        assert_eq!(done.date, day(2026, 10, 18));
        assert_eq!(done.completed_at.date_naive(), day(2026, 10, 19));
        assert_eq!(done.reflection_text, None);
    }

    #[tokio::test]
    async fn test_complete_unknown_practice() {
        let (_store, engine) = seeded().await;
        let missing = PracticeId::new();
        let err = engine
            .complete_practice(UserId::new(), missing, None, noon(day(2026, 10, 18)))
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::UnknownPractice(id) if id == missing));
    }

    #[tokio::test]
    async fn test_refresh_updates_snapshots_in_place() {
        let (store, engine) = seeded().await;
        let user = onboarded(&engine, &store, 10).await;
        let stretch = practice_titled(store.as_ref(), "Alongamento e Conexão Corporal").await;

        engine
            .complete_practice(user, stretch.id, None, noon(day(2026, 10, 17)))
            .await
            .unwrap();
        let rows = engine
            .refresh_dimension_progress(user, noon(day(2026, 10, 18)))
            .await
            .unwrap();
        assert_eq!(rows.len(), 5);

        let stored: Vec<DimensionProgress> = typed(
            store
                .list(
                    Collection::DimensionProgress,
                    &Filter::new().eq("user_id", Value::text(user)),
                    Some(&OrderBy::desc("percentage")),
                    None,
                )
                .await
                .unwrap(),
        )
        .unwrap();
        assert_eq!(stored.len(), 5);
        assert_eq!(stored[0].dimension, Dimension::Fisico);
        assert!(stored[0].percentage > 0);
        assert_eq!(stored[0].last_practice_date, Some(day(2026, 10, 17)));
        assert!(stored[1..].iter().all(|p| p.percentage == 0 && p.last_practice_date.is_none()));
    }

    #[tokio::test]
    async fn test_recommendation_follows_weakest_dimension() {
        let (store, engine) = seeded().await;
        let user = onboarded(&engine, &store, 10).await;
        let today = day(2026, 10, 18);

        // All five dimensions tie at 0%, so Emocional wins and its 2-minute
        // practice is the shortest fit.
        let first = engine.recommender().recommend(user, today).await.unwrap().unwrap();
        assert_eq!(first.title, "Conexão Profunda");

        engine
            .complete_practice(user, first.id, None, noon(today))
            .await
            .unwrap();
        engine.refresh_dimension_progress(user, noon(today)).await.unwrap();

        let next = engine.recommender().recommend(user, today).await.unwrap().unwrap();
        assert_eq!(next.dimension, Dimension::Fisico);
        assert_eq!(next.title, "Alongamento e Conexão Corporal");
    }

    #[tokio::test]
    async fn test_route_for_reads_onboarding_flag() {
        let (store, engine) = seeded().await;

        let fresh = UserId::new();
        store
            .insert(Record::from(Profile::new(fresh, "", "nova@example.com")))
            .await
            .unwrap();
        assert_eq!(
            engine.route_for("/dashboard", Some(fresh)).await.unwrap(),
            RouteDecision::Redirect { location: "/onboarding".into() }
        );

        let done = onboarded(&engine, &store, 15).await;
        assert_eq!(engine.route_for("/dashboard", Some(done)).await.unwrap(), RouteDecision::Allow);
        assert_eq!(
            engine.route_for("/login", Some(done)).await.unwrap(),
            RouteDecision::Redirect { location: "/dashboard".into() }
        );

        // Signed in without a profile row is let through.
        assert_eq!(
            engine.route_for("/practices", Some(UserId::new())).await.unwrap(),
            RouteDecision::Allow
        );
        assert!(matches!(
            engine.route_for("/practices", None).await.unwrap(),
            RouteDecision::Redirect { .. }
        ));
    }

    #[tokio::test]
    async fn test_dashboard_summary() {
        let (store, engine) = seeded().await;
        let user = onboarded(&engine, &store, 5).await;
        let connect = practice_titled(store.as_ref(), "Conexão Profunda").await;

        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        let yesterday = brt.with_ymd_and_hms(2026, 10, 17, 20, 0, 0).unwrap();
        let now = brt.with_ymd_and_hms(2026, 10, 18, 8, 15, 0).unwrap();
        engine
            .complete_practice(user, connect.id, None, yesterday)
            .await
            .unwrap();

        let dash = engine.dashboard(user, now).await.unwrap();
        assert_eq!(dash.greeting, "Bom dia, Ana");
        assert_eq!(dash.date_label, "18 de outubro de 2026");
        assert_eq!(dash.streak, 1);
        assert_eq!(
            dash.dimensions.iter().map(|d| d.dimension).collect::<Vec<_>>(),
            Dimension::ALL.to_vec()
        );
        assert!(dash.dimensions[0].percentage > 0);
        assert_eq!(dash.recommendation.map(|p| p.title), Some("Alongamento e Conexão Corporal".to_string()));
        assert_eq!(dash.recommendation_duration.as_deref(), Some("5 minutos"));
        assert_eq!(dash.quote, None);
    }

    #[tokio::test]
    async fn test_dashboard_quote_and_wellbeing_records() {
        let (store, engine) = seeded().await;
        seed_quotes(store.as_ref()).await.unwrap();
        let user = onboarded(&engine, &store, 10).await;
        let now = noon(day(2026, 10, 18));

        let dash = engine.dashboard(user, now).await.unwrap();
        let quote = dash.quote.unwrap();
        assert!(QUOTES.contains(&quote.as_str()));

        engine.record_checkin(user, "calma", "😌", None, now).await.unwrap();
        let habit = engine
            .update_habits(user, now.date_naive(), &HabitUpdate { water_glasses: Some(6), ..Default::default() }, now)
            .await
            .unwrap();
        assert_eq!(habit.water_glasses, 6);
        assert_eq!(store.count(Collection::EmotionalCheckins, &Filter::new()).await.unwrap(), 1);
        assert_eq!(store.count(Collection::DailyHabits, &Filter::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_history_survives_reopening_json_store() {
        let dir = tempfile::tempdir().unwrap();
        let today = day(2026, 10, 18);
        let user = UserId::new();

        {
            let store = Arc::new(JsonStorage::new(dir.path()).await.unwrap());
            seed_practices(store.as_ref()).await.unwrap();
            let engine = ProgressEngine::new(store.clone());
            let practice = practice_titled(store.as_ref(), "Conexão Sensorial").await;
            for offset in 0..3 {
                let date = today - chrono::Duration::days(offset);
                engine.complete_practice(user, practice.id, None, noon(date)).await.unwrap();
            }
        }

        let reopened = ProgressEngine::new(Arc::new(JsonStorage::new(dir.path()).await.unwrap()));
        assert_eq!(reopened.streak().compute(user, today).await.unwrap(), 3);
        assert_eq!(
            reopened
                .dimension_progress()
                .compute(user, Dimension::Intelectual, noon(today))
                .await
                .unwrap(),
            100
        );
    }

    #[tokio::test]
    async fn test_dashboard_requires_profile() {
        let (_store, engine) = seeded().await;
        let err = engine.dashboard(UserId::new(), noon(day(2026, 10, 18))).await.unwrap_err();
        assert!(matches!(err, ProgressError::ProfileNotFound(_)));
    }

    #[tokio::test]
    async fn test_failures_surface_as_source_unavailable() {
        let engine = ProgressEngine::new(Arc::new(FailingSource));
        let user = UserId::new();
        let now = noon(day(2026, 10, 18));

        assert!(matches!(
            engine.refresh_dimension_progress(user, now).await,
            Err(ProgressError::SourceUnavailable(_))
        ));
        assert!(matches!(
            engine.route_for("/dashboard", Some(user)).await,
            Err(ProgressError::SourceUnavailable(_))
        ));
        assert!(matches!(
            engine.dashboard(user, now).await,
            Err(ProgressError::SourceUnavailable(_))
        ));
    }
}
