use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::db::StoreError;
use crate::models::{Currency, PayoutMethod};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Payout with this id already exists")]
    AlreadyExists { id: String },

    #[error("Payout not found")]
    NotFound { id: String },

    #[error("Invalid payout method")]
    InvalidMethod { method: String },

    #[error("Invalid currency")]
    InvalidCurrency { currency: String },

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: &'static str },

    #[error("Invalid payout id: {reason}")]
    InvalidId { reason: &'static str },

    #[error("callback_url exceeds {max} characters")]
    InvalidCallbackUrl { max: usize },

    #[error("ttl_minutes must be between {min} and {max}")]
    InvalidTtl { ttl_minutes: i64, min: i64, max: i64 },

    #[error("{message}")]
    InvalidRequest { status: StatusCode, message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl AppError {
    /// Stable machine-readable code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::AlreadyExists { .. } => "PAYOUT_ALREADY_EXISTS",
            AppError::NotFound { .. } => "PAYOUT_NOT_FOUND",
            AppError::InvalidMethod { .. } => "INVALID_METHOD",
            AppError::InvalidCurrency { .. } => "INVALID_CURRENCY",
            AppError::InvalidAmount { .. } => "INVALID_AMOUNT",
            AppError::InvalidId { .. } => "INVALID_ID",
            AppError::InvalidCallbackUrl { .. } => "INVALID_CALLBACK_URL",
            AppError::InvalidTtl { .. } => "INVALID_TTL",
            AppError::InvalidRequest { .. } => "INVALID_REQUEST",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::AlreadyExists { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InvalidRequest { status, .. } => *status,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// True when the caller's input caused the error (4xx).
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::AlreadyExists { id } | AppError::NotFound { id } => Some(json!({ "id": id })),
            AppError::InvalidMethod { method } => Some(json!({
                "method": method,
                "allowed": PayoutMethod::ALL.map(|m| m.as_str()),
            })),
            AppError::InvalidCurrency { currency } => Some(json!({
                "currency": currency,
                "allowed": Currency::ALL.map(|c| c.as_str()),
            })),
            AppError::InvalidTtl { ttl_minutes, .. } => Some(json!({ "ttl_minutes": ttl_minutes })),
            _ => None,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let message = match self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        ErrorBody {
            code: self.code(),
            message,
            details: self.details(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(e) = &self {
            tracing::error!("Internal error: {e:?}");
        }

        (self.status(), Json(self.to_body())).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(id) => AppError::AlreadyExists { id },
            StoreError::Backend(e) => AppError::Internal(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
