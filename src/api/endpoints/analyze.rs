//! `POST /api/analyze-wheat-disease` — vision model proxy.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;

use super::detect::ImageRequest;
use crate::analysis::{parse_analysis, validate_image_data_url, WheatAnalysis, MAX_REQUEST_BYTES};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// Reject declared oversize bodies before the JSON extractor reads them.
pub fn check_content_length(headers: &HeaderMap) -> Result<(), ApiError> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    match declared {
        Some(len) if len > MAX_REQUEST_BYTES => Err(ApiError::PayloadTooLarge),
        _ => Ok(()),
    }
}

pub async fn analyze(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<WheatAnalysis>, ApiError> {
    let Json(request) = payload?;
    let data_url = validate_image_data_url(request.image_base64.as_deref())?.to_string();

    let gateway = ctx.gateway.clone().ok_or(ApiError::NotConfigured)?;
    tracing::info!(model = gateway.model_name(), size = data_url.len(), "Analyzing wheat image");

    let content = tokio::task::spawn_blocking(move || gateway.analyze_image(&data_url))
        .await
        .map_err(|e| ApiError::Internal(format!("analysis task failed: {e}")))??;

    let analysis = parse_analysis(&content).map_err(|e| {
        tracing::warn!(content_len = content.len(), "Model reply was not the expected JSON");
        ApiError::from(e)
    })?;

    tracing::info!(
        is_wheat_leaf = analysis.is_wheat_leaf,
        disease = analysis.disease.name.as_deref().unwrap_or("-"),
        "Analysis complete"
    );
    Ok(Json(analysis))
}

/// Middleware form of [`check_content_length`] for the analysis route.
pub async fn limit_body(
    req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    match check_content_length(req.headers()) {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}
