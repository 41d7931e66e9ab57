//! Request-level error handling.
//!
//! Every failure that reaches a handler boundary collapses into HTTP 500 with
//! a `{"error": "<message>"}` JSON body. The service draws no distinction
//! between connection, query, and decode failures - that is the contract the
//! inventory client was written against.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] DbError),
}

/// JSON body returned for every handled failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let body = ErrorBody {
            error: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_carries_driver_message() {
        let err = AppError::Database(DbError::Backend("login timeout expired".to_string()));
        assert_eq!(err.to_string(), "database error: login timeout expired");
    }
}
