//! Autosaved workout drafts, scoped to the signed-in user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use fitcoach_core::{
    errors::CoachError,
    models::draft::{SaveDraftRequest, WorkoutDraft},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{auth::Session, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn get_workout_draft(
    State(state): State<Arc<ApiState>>,
    Session(session): Session,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<WorkoutDraft>, AppError> {
    let key = WorkoutDraft::storage_key(session.user_id, workout_id);
    let value = state
        .drafts
        .load(&key)
        .await
        .map_err(CoachError::Database)?
        .ok_or_else(|| CoachError::NotFound(format!("No draft saved for workout {}", workout_id)))?;

    let draft: WorkoutDraft = serde_json::from_value(value)
        .map_err(|e| CoachError::Internal(Box::new(e)))?;

    Ok(Json(draft))
}

#[axum::debug_handler]
pub async fn save_workout_draft(
    State(state): State<Arc<ApiState>>,
    Session(session): Session,
    Path(workout_id): Path<Uuid>,
    Json(payload): Json<SaveDraftRequest>,
) -> Result<Json<WorkoutDraft>, AppError> {
    let draft = WorkoutDraft {
        workout_id,
        client_id: session.user_id,
        exercises: payload.exercises,
        notes: payload.notes,
        updated_at: Utc::now(),
    };

    let value = serde_json::to_value(&draft).map_err(|e| CoachError::Internal(Box::new(e)))?;
    state
        .drafts
        .save(&draft.key(), value)
        .await
        .map_err(CoachError::Database)?;
    tracing::debug!(
        "Autosaved workout draft: workout_id={}, completed_sets={}",
        workout_id,
        draft.completed_sets()
    );

    Ok(Json(draft))
}

#[axum::debug_handler]
pub async fn discard_workout_draft(
    State(state): State<Arc<ApiState>>,
    Session(session): Session,
    Path(workout_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let key = WorkoutDraft::storage_key(session.user_id, workout_id);
    let removed = state.drafts.remove(&key).await.map_err(CoachError::Database)?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError(CoachError::NotFound(format!(
            "No draft saved for workout {}",
            workout_id
        ))))
    }
}
