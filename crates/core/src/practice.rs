//! Practice model - reference wellness activities and their completions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::id::{CompletionId, PracticeId, UserId};
use crate::Time;

/// A reference self-care activity.
///
/// Practices are seeded once and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Practice {
    /// Unique identifier
    pub id: PracticeId,

    /// Short title
    pub title: String,

    /// Dimension this practice feeds
    pub dimension: Dimension,

    /// Expected duration in minutes
    pub duration_minutes: u32,

    /// One-line description
    pub description: String,

    /// Ordered steps
    #[serde(default)]
    pub instructions: Vec<String>,

    /// Question offered after completing the practice
    #[serde(default)]
    pub reflection_prompt: Option<String>,

    /// Position in the catalog
    #[serde(default)]
    pub order_index: Option<i32>,

    /// When created
    pub created_at: Time,
}

impl Practice {
    /// Create a practice with no instructions or prompt.
    pub fn new(
        title: impl Into<String>,
        dimension: Dimension,
        duration_minutes: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: PracticeId::new(),
            title: title.into(),
            dimension,
            duration_minutes,
            description: description.into(),
            instructions: Vec::new(),
            reflection_prompt: None,
            order_index: None,
            created_at: chrono::Utc::now(),
        }
    }
}

/// A record of a user finishing a practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedPractice {
    /// Unique identifier
    pub id: CompletionId,

    /// Who completed it
    pub user_id: UserId,

    /// What was completed
    pub practice_id: PracticeId,

    /// Exact completion instant
    pub completed_at: Time,

    /// Optional answer to the practice's reflection prompt
    #[serde(default)]
    pub reflection_text: Option<String>,

    /// Local calendar date of the completion
    pub date: NaiveDate,
}

impl CompletedPractice {
    /// Create a completion at `completed_at`, attributed to the local `date`.
    pub fn new(user_id: UserId, practice_id: PracticeId, completed_at: Time, date: NaiveDate) -> Self {
        Self {
            id: CompletionId::new(),
            user_id,
            practice_id,
            completed_at,
            reflection_text: None,
            date,
        }
    }

    /// Attach a reflection.
    pub fn with_reflection(mut self, text: impl Into<String>) -> Self {
        self.reflection_text = Some(text.into());
        self
    }
}
