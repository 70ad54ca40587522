use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/calendar/layout", get(handlers::calendar::get_layout))
        .route(
            "/api/calendar/events",
            get(handlers::calendar::list_events).post(handlers::calendar::create_event),
        )
        .route(
            "/api/calendar/events/:id",
            get(handlers::calendar::get_event)
                .put(handlers::calendar::update_event)
                .delete(handlers::calendar::delete_event),
        )
}
