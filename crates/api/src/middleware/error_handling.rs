//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! endpoint fails the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fitcoach_core::errors::CoachError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use fitcoach_api::middleware::error_handling::AppError;
/// use fitcoach_core::errors::CoachError;
///
/// async fn handler(title: String) -> Result<Json<String>, AppError> {
///     if title.is_empty() {
///         return Err(CoachError::Validation("title is required".to_string()).into());
///     }
///     Ok(Json(title))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub CoachError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CoachError::NotFound(_) => StatusCode::NOT_FOUND,
            CoachError::Validation(_) => StatusCode::BAD_REQUEST,
            CoachError::Authentication(_) => StatusCode::UNAUTHORIZED,
            CoachError::Authorization(_) => StatusCode::FORBIDDEN,
            CoachError::ConfirmationRequired(_) => StatusCode::CONFLICT,
            CoachError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CoachError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Allows `?` on `CoachResult` inside handlers.
impl From<CoachError> for AppError {
    fn from(err: CoachError) -> Self {
        AppError(err)
    }
}

/// Store failures surface as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(CoachError::Database(err))
    }
}
