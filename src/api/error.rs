//! API error types with structured JSON responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::analysis::{AnalysisError, ImageRejection};
use crate::db::DatabaseError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Identity required")]
    Unauthorized,
    #[error("Role not permitted")]
    Forbidden,
    #[error("Rate limit exceeded")]
    RateLimited { retry_after: u64 },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Request too large")]
    PayloadTooLarge,
    #[error("AI service not configured")]
    NotConfigured,
    #[error("Upstream rate limit exceeded")]
    UpstreamRateLimited,
    #[error("Upstream quota exceeded")]
    QuotaExceeded,
    /// Upstream failure with a client-facing message; details are logged.
    #[error("Upstream error: {message} ({detail})")]
    Upstream {
        message: &'static str,
        detail: String,
    },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "IDENTITY_REQUIRED",
                "X-User-Id and X-User-Role headers are required".to_string(),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Your role cannot perform this action".to_string(),
            ),
            ApiError::RateLimited { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                format!("Rate limit exceeded. Retry after {retry_after}s"),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "Request too large. Maximum size is 10MB".to_string(),
            ),
            ApiError::NotConfigured => {
                tracing::error!("AI gateway API key is not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI_NOT_CONFIGURED",
                    "AI service not configured".to_string(),
                )
            }
            ApiError::UpstreamRateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "AI_RATE_LIMITED",
                "Rate limit exceeded. Please try again in a moment.".to_string(),
            ),
            ApiError::QuotaExceeded => (
                StatusCode::PAYMENT_REQUIRED,
                "AI_QUOTA_EXCEEDED",
                "AI service quota exceeded.".to_string(),
            ),
            ApiError::Upstream { message, detail } => {
                tracing::error!(detail, "AI analysis failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI_ANALYSIS_FAILED",
                    message.to_string(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };

        let mut response = (status, Json(body)).into_response();
        if let ApiError::RateLimited { retry_after } = &self {
            if let Ok(val) = axum::http::HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert("Retry-After", val);
            }
        }
        response
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{entity_type} {id} not found"))
            }
            DatabaseError::InvalidEnum { field, value } => {
                ApiError::BadRequest(format!("Invalid {field}: {value}"))
            }
            DatabaseError::ConstraintViolation(detail) => ApiError::BadRequest(detail),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::RateLimited => ApiError::UpstreamRateLimited,
            AnalysisError::QuotaExceeded => ApiError::QuotaExceeded,
            AnalysisError::NoContent => ApiError::Upstream {
                message: "No analysis result received",
                detail: err.to_string(),
            },
            AnalysisError::ResponseParsing(_) => ApiError::Upstream {
                message: "Failed to parse analysis result",
                detail: err.to_string(),
            },
            other => ApiError::Upstream {
                message: "Failed to analyze image",
                detail: other.to_string(),
            },
        }
    }
}

impl From<ImageRejection> for ApiError {
    fn from(rejection: ImageRejection) -> Self {
        ApiError::BadRequest(rejection.message().to_string())
    }
}

/// Body rejections keep the JSON error shape; an over-limit body (declared or
/// streamed) becomes [`ApiError::PayloadTooLarge`].
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}
