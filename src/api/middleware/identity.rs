//! Caller identity middleware.
//!
//! Authentication happens upstream; this layer reads the asserted identity
//! from `X-User-Id` / `X-User-Role` and injects `UserContext` for handlers.
//! Role checks are done per handler via `UserContext::require`.

use std::str::FromStr;

use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::UserContext;
use crate::models::enums::UserRole;

pub async fn require_identity(mut req: Request<axum::body::Body>, next: Next) -> Response {
    match user_from_headers(req.headers()) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

fn user_from_headers(headers: &HeaderMap) -> Result<UserContext, ApiError> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let user_id = header("X-User-Id").ok_or(ApiError::Unauthorized)?;
    let role = header("X-User-Role")
        .and_then(|r| UserRole::from_str(&r.to_ascii_lowercase()).ok())
        .ok_or(ApiError::Unauthorized)?;

    Ok(UserContext {
        user_id: user_id.to_string(),
        role,
    })
}
