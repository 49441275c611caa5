//! Error types shared by the stores and the HTTP layer
//!
//! Every fallible operation returns [`AppError`]. The variants map one-to-one
//! onto HTTP status codes in the [`IntoResponse`] impl below.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed URL, unparseable date or limit, bad request body
    #[error("{0}")]
    InvalidInput(String),

    /// Unknown token or subject
    #[error("{0}")]
    NotFound(String),

    /// Persistence unavailable or a write failed
    #[error("store failure: {0}")]
    StoreFailure(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::InvalidInput(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::StoreFailure(detail) => {
                // Internal detail stays in the log
                tracing::error!(error = %detail, "request failed");
                "Server Error".to_string()
            }
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

macro_rules! store_failure_from {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for AppError {
                fn from(err: $source) -> Self {
                    AppError::StoreFailure(err.to_string())
                }
            }
        )+
    };
}

store_failure_from!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
    serde_json::Error,
);
