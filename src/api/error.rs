//! API error responses
//!
//! Every failure leaves the API as `{"error": <code>, "detail": <message>}`
//! with a status derived from the error kind.

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::expenses::ExpenseError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Malformed request body or missing form field
    BadRequest(String),
    Expense(ExpenseError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Expense(ExpenseError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Expense(ExpenseError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Expense(ExpenseError::Persistence(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::BadRequest(msg) => ErrorBody {
                error: "BAD_REQUEST".to_string(),
                detail: msg.clone(),
            },
            // Storage details stay in the logs
            ApiError::Expense(err @ ExpenseError::Persistence(_)) => ErrorBody {
                error: err.error_code().to_string(),
                detail: "Internal server error".to_string(),
            },
            ApiError::Expense(err) => ErrorBody {
                error: err.error_code().to_string(),
                detail: err.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Expense(ExpenseError::Persistence(msg)) = &self {
            tracing::error!(target: "ledger::api", "persistence failure: {}", msg);
        }

        (self.status(), Json(self.body())).into_response()
    }
}

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        Self::Expense(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}
