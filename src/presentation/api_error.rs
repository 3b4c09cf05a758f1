// Mapping of service errors onto HTTP responses
use crate::application::auth_service::AuthError;
use crate::application::streaming_service::LOAD_FAILED_MESSAGE;
use crate::domain::error::DashboardError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Dashboard(DashboardError::UnknownCity(_)) => StatusCode::NOT_FOUND,
            ApiError::Dashboard(DashboardError::InvalidWindow(_)) => StatusCode::BAD_REQUEST,
            ApiError::Dashboard(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message shown to the user; every no-data case reads the same
    pub fn message(&self) -> String {
        match self {
            ApiError::Dashboard(e) if e.is_no_data() => LOAD_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
