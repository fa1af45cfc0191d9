use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use podwarden_core::AppError;
use tracing::{error, warn};

use crate::dto::ApiEnvelope;

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl ApiError {
    /// Status code for the wrapped error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::AuditWrite(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(_) | AppError::ResolutionExhausted(_) => StatusCode::BAD_GATEWAY,
            AppError::Cancelled(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            if matches!(self.0, AppError::Internal(_)) {
                error!(error = %self.0, "request failed");
            } else {
                warn!(error = %self.0, status = status.as_u16(), "request failed upstream");
            }
        }

        let payload = Json(ApiEnvelope::<()>::failure(self.0.to_string()));
        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
