use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/drafts/workouts/:workout_id",
        get(handlers::drafts::get_workout_draft)
            .put(handlers::drafts::save_workout_draft)
            .delete(handlers::drafts::discard_workout_draft),
    )
}
