use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDraft {
    pub reps: u32,
    pub weight: Option<f64>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDraft {
    pub name: String,
    #[serde(default)]
    pub sets: Vec<SetDraft>,
}

/// An in-progress workout log, autosaved until the client submits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDraft {
    pub workout_id: Uuid,
    pub client_id: Uuid,
    #[serde(default)]
    pub exercises: Vec<ExerciseDraft>,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl WorkoutDraft {
    pub fn storage_key(client_id: Uuid, workout_id: Uuid) -> String {
        format!("workout_draft:{}:{}", client_id, workout_id)
    }

    pub fn key(&self) -> String {
        Self::storage_key(self.client_id, self.workout_id)
    }

    pub fn completed_sets(&self) -> usize {
        self.exercises
            .iter()
            .flat_map(|exercise| exercise.sets.iter())
            .filter(|set| set.completed)
            .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDraftRequest {
    #[serde(default)]
    pub exercises: Vec<ExerciseDraft>,
    pub notes: Option<String>,
}
