//! `POST /api/detect` — on-server leaf gate plus demo disease picker.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::analysis::{decode_data_url, ImageRejection};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::detection::DetectionOutcome;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub image_base64: Option<String>,
}

pub async fn detect(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<DetectionOutcome>, ApiError> {
    let Json(request) = payload?;
    let encoded = request
        .image_base64
        .filter(|s| !s.is_empty())
        .ok_or(ImageRejection::Missing)?;

    // Undecodable base64 still goes through the gate as raw bytes; the gate
    // accepts photos it cannot decode.
    let bytes: Arc<[u8]> = match decode_data_url(&encoded) {
        Some(bytes) => bytes.into(),
        None => {
            tracing::debug!("Upload is not valid base64, classifying raw payload");
            encoded.into_bytes().into()
        }
    };

    Ok(Json(ctx.detection.detect(bytes).await))
}
