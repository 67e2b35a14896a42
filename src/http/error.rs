use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::application::{AppError, ErrorKind};

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::BadRequest | ErrorKind::InsufficientFunds => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_rejection(err: &AppError, status: StatusCode) {
    if status.is_server_error() {
        error!(error = %err, "Request failed");
    } else {
        warn!(status = status.as_u16(), error = %err, "Request rejected");
    }
}

/// Error returned by the simulated-ledger endpoints: `{"success": false, "message": ...}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind());
        log_rejection(&self.0, status);
        let body = Json(json!({
            "success": false,
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Error returned by the journal endpoint: `{"error": ...}`.
#[derive(Debug)]
pub struct JournalError(pub AppError);

impl From<AppError> for JournalError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for JournalError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind());
        log_rejection(&self.0, status);
        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
