//! Service error to HTTP response mapping.

use crate::review::services::{ErrorKind, ReviewServiceError};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// An error rendered as `{"error": code, "message": detail}`.
#[derive(Debug)]
pub enum ApiError {
    /// A review service rejected or failed the operation.
    Service(ReviewServiceError),
    /// The request body or path could not be decoded.
    Malformed(String),
}

impl ApiError {
    /// Returns the classification of the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Service(err) => err.kind(),
            Self::Malformed(_) => ErrorKind::InvalidInput,
        }
    }

    /// Returns the status code for the error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidState | ErrorKind::NoAvailableReviewer | ErrorKind::Conflict => {
                StatusCode::CONFLICT
            }
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Service(err) => err.to_string(),
            Self::Malformed(detail) => detail.clone(),
        }
    }
}

impl From<ReviewServiceError> for ApiError {
    fn from(err: ReviewServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = self.message();
        if kind == ErrorKind::Upstream {
            error!(error = %message, "request failed in persistence layer");
        }
        let body = Json(json!({
            "error": kind.as_str(),
            "message": message,
        }));
        (status, body).into_response()
    }
}
