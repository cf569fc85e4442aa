use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;
use crate::services::search_service::SearchError;

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = match &self {
            SearchError::AddressNotFound { .. } => StatusCode::NOT_FOUND,
            SearchError::Geocoding(_) | SearchError::Places(_) => StatusCode::BAD_GATEWAY,
            SearchError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("Restaurant search failed with {}: {}", status, self);
        error_response(status, self.to_string())
    }
}
