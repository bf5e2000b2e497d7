//! User profile and per-dimension progress snapshots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::id::{ProgressId, UserId};
use crate::Time;

/// Per-user preferences collected during onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Same as the user's id
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Account email
    pub email: String,

    /// Whether the user is a mother
    #[serde(default)]
    pub is_mother: bool,

    /// Number of children, only set for mothers
    #[serde(default)]
    pub children_count: Option<u32>,

    /// Free-form ages of the children
    #[serde(default)]
    pub children_ages: Vec<String>,

    /// Main difficulties picked during onboarding
    #[serde(default)]
    pub main_difficulty: Vec<String>,

    /// Minutes per day the user can dedicate
    #[serde(default)]
    pub available_time: Option<u32>,

    /// Preferred time of day for practices ("09:00")
    #[serde(default)]
    pub preferred_time: Option<String>,

    /// Interest areas picked during onboarding
    #[serde(default)]
    pub interest_areas: Vec<String>,

    /// Whether onboarding finished
    #[serde(default)]
    pub onboarding_completed: bool,

    /// Subscription state ("free", ...)
    pub subscription_status: String,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl Profile {
    /// Create the bare profile written at sign-up.
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id,
            name: name.into(),
            email: email.into(),
            is_mother: false,
            children_count: None,
            children_ages: Vec::new(),
            main_difficulty: Vec::new(),
            available_time: None,
            preferred_time: None,
            interest_areas: Vec::new(),
            onboarding_completed: false,
            subscription_status: "free".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Percentage snapshot of one dimension for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionProgress {
    /// Unique identifier
    pub id: ProgressId,

    /// Owner
    pub user_id: UserId,

    /// Dimension measured
    pub dimension: Dimension,

    /// Percentage complete (0-100)
    pub percentage: u8,

    /// Newest completion date within the dimension
    #[serde(default)]
    pub last_practice_date: Option<NaiveDate>,

    /// Last recomputation
    pub updated_at: Time,
}

impl DimensionProgress {
    /// Largest representable percentage.
    pub const MAX_PERCENTAGE: u8 = 100;

    /// Create a snapshot, clamping the percentage to 100.
    pub fn new(user_id: UserId, dimension: Dimension, percentage: u8) -> Self {
        Self {
            id: ProgressId::new(),
            user_id,
            dimension,
            percentage: percentage.min(Self::MAX_PERCENTAGE),
            last_practice_date: None,
            updated_at: chrono::Utc::now(),
        }
    }
}
