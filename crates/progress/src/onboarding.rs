//! Onboarding: turn the questionnaire answers into a completed profile.

use cuidar_core::{Dimension, DimensionProgress, Profile, Time, UserId};
use cuidar_storage::{typed, Collection, Filter, Record, RecordStore, Value};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ProgressError, Result};

/// Daily time budgets offered during onboarding, in minutes.
pub const AVAILABLE_TIME_OPTIONS: [u32; 4] = [5, 10, 15, 30];

/// Answers collected by the onboarding questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingAnswers {
    /// Display name
    pub name: String,
    /// Whether the user is a mother; must be answered
    pub is_mother: Option<bool>,
    /// Number of children as typed
    #[serde(default)]
    pub children_count: Option<String>,
    /// Comma-separated children ages as typed
    #[serde(default)]
    pub children_ages: String,
    /// Main difficulties
    #[serde(default)]
    pub difficulties: Vec<String>,
    /// Daily budget in minutes
    pub available_time: u32,
    /// Preferred time of day ("09:00")
    pub preferred_time: String,
    /// Interest areas
    #[serde(default)]
    pub interest_areas: Vec<String>,
}

impl Default for OnboardingAnswers {
    fn default() -> Self {
        Self {
            name: String::new(),
            is_mother: None,
            children_count: None,
            children_ages: String::new(),
            difficulties: Vec::new(),
            available_time: 10,
            preferred_time: "09:00".to_string(),
            interest_areas: Vec::new(),
        }
    }
}

impl OnboardingAnswers {
    /// Check the answers and apply them to `profile`.
    ///
    /// Child details are dropped for non-mothers; an unparsable child count
    /// reads as zero.
    pub fn apply_to(&self, profile: &mut Profile, now: Time) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProgressError::InvalidOnboarding("name is required".into()));
        }
        let Some(is_mother) = self.is_mother else {
            return Err(ProgressError::InvalidOnboarding("mother question not answered".into()));
        };
        if !AVAILABLE_TIME_OPTIONS.contains(&self.available_time) {
            return Err(ProgressError::InvalidOnboarding(format!(
                "available time must be one of {:?} minutes, got {}",
                AVAILABLE_TIME_OPTIONS, self.available_time
            )));
        }

        let ages: Vec<String> = if is_mother {
            self.children_ages
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect()
        } else {
            Vec::new()
        };

        profile.name = name.to_string();
        profile.is_mother = is_mother;
        profile.children_count = is_mother.then(|| {
            self.children_count
                .as_deref()
                .and_then(|c| c.trim().parse().ok())
                .unwrap_or(0)
        });
        profile.children_ages = ages;
        profile.main_difficulty = self.difficulties.clone();
        profile.available_time = Some(self.available_time);
        profile.preferred_time = Some(self.preferred_time.clone());
        profile.interest_areas = self.interest_areas.clone();
        profile.onboarding_completed = true;
        profile.updated_at = now;
        Ok(())
    }
}

/// Load a user's profile.
pub(crate) async fn load_profile(store: &dyn RecordStore, user: UserId) -> Result<Option<Profile>> {
    let rows = store
        .list(
            Collection::Profiles,
            &Filter::new().eq("id", Value::text(user)),
            None,
            Some(1),
        )
        .await?;
    Ok(typed::<Profile>(rows)?.into_iter().next())
}

/// Save the answers on the user's profile and start every dimension at 0%.
pub async fn complete_onboarding(
    store: &dyn RecordStore,
    user: UserId,
    answers: &OnboardingAnswers,
    now: Time,
) -> Result<Profile> {
    let mut profile = load_profile(store, user)
        .await?
        .ok_or(ProgressError::ProfileNotFound(user))?;

    answers.apply_to(&mut profile, now)?;
    store.insert(Record::from(profile.clone())).await?;

    for dimension in Dimension::ALL {
        let mut progress = DimensionProgress::new(user, dimension, 0);
        progress.updated_at = now;
        store.upsert_dimension_progress(&progress).await?;
    }

    info!(%user, available_time = answers.available_time, "onboarding completed");
    Ok(profile)
}
