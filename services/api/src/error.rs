use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sentinel_common::error::SentinelError;

pub struct ApiError(pub SentinelError);

impl From<SentinelError> for ApiError {
    fn from(err: SentinelError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SentinelError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            SentinelError::Validation(msg) | SentinelError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            SentinelError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            SentinelError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            SentinelError::AccountRestricted(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
