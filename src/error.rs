//! Application error types and HTTP response mapping.
//!
//! Error mappings:
//! - `BadRequest`, `InvalidRange` → 400
//! - `Clone` → 401 / 404 / 408 / 503 / 500 by failure kind
//! - `FileNotFound` → 404
//! - `Git`, `Internal` → 500
//!
//! Bodies are `{ "error": ..., "details": ... }`; `details` carries the raw
//! cause and is only emitted by debug builds.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::content::ContentError;
use crate::analysis::range::RangeResolutionError;
use crate::git::{CloneFailure, CloneFailureKind, GitError};
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid commit range: {0}")]
    InvalidRange(#[from] RangeResolutionError),

    #[error(transparent)]
    Clone(#[from] CloneFailure),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<ContentError> for AppError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::FileNotAtRevision(path) => AppError::FileNotFound(path),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            AppError::Clone(failure) => match failure.kind {
                CloneFailureKind::Unauthorized => StatusCode::UNAUTHORIZED,
                CloneFailureKind::NotFound => StatusCode::NOT_FOUND,
                CloneFailureKind::TimedOut => StatusCode::REQUEST_TIMEOUT,
                CloneFailureKind::Network => StatusCode::SERVICE_UNAVAILABLE,
                CloneFailureKind::Other => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::FileNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Git(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the user. Raw causes only go into `details`.
    pub fn user_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::InvalidRange(_) => "Please select a valid commit range".to_string(),
            AppError::Clone(failure) => match failure.kind {
                CloneFailureKind::Unauthorized => {
                    "Authentication failed. Please check the URL and ensure it is a public repository or you have access."
                }
                CloneFailureKind::NotFound => "Repository not found. Please verify the URL is correct.",
                CloneFailureKind::TimedOut => {
                    "Repository clone timed out. The repository may be too large or the server is busy."
                }
                CloneFailureKind::Network => {
                    "Network error occurred. Please check your internet connection and try again."
                }
                CloneFailureKind::Other => "Failed to analyze repository. Please try again.",
            }
            .to_string(),
            AppError::FileNotFound(path) => format!("File not found: {}", path),
            AppError::Git(_) | AppError::Internal(_) => "Failed to analyze repository. Please try again.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        let body = if cfg!(debug_assertions) {
            json!({ "error": self.user_message(), "details": self.to_string() })
        } else {
            json!({ "error": self.user_message() })
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
