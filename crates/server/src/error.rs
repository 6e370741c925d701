use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hearth_core::FinanceError;
use hearth_storage::StorageError;
use serde_json::json;

/// Handler error: a domain error rendered as `{"error": "..."}` with a matching status.
#[derive(Debug)]
pub struct ApiError(pub FinanceError);

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            FinanceError::InvalidPeriod(_) | FinanceError::Validation(_) => StatusCode::BAD_REQUEST,
            FinanceError::NotFound(_) => StatusCode::NOT_FOUND,
            FinanceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FinanceError> for ApiError {
    fn from(e: FinanceError) -> Self {
        ApiError(e)
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.0.is_client_error() {
            tracing::warn!(error = %self.0, status = status.as_u16(), "Request rejected");
            self.0.to_string()
        } else {
            tracing::error!(error = %self.0, "Storage failure");
            "internal storage error".to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
