//! The fallback handler for routes that do not exist.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Respond with a JSON 404 for unknown routes.
pub async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "the requested route does not exist"})),
    )
        .into_response()
}
