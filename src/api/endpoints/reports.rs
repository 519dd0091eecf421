//! Disease report endpoints.
//!
//! - `POST /api/reports` — farmer files a field report
//! - `GET /api/reports/mine` — farmer's own reports
//! - `GET /api/reports` — researcher review queue
//! - `PUT /api/reports/:id/status` — researcher moves a report along

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::repository;
use crate::models::enums::{ReportStatus, Severity, UserRole};
use crate::models::DiseaseReport;

#[derive(Deserialize)]
pub struct NewReportRequest {
    pub symptoms: String,
    pub location: String,
    pub ai_prediction: Option<String>,
    pub ai_confidence: Option<f64>,
    pub severity: Option<Severity>,
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ReportStatus,
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    payload: Result<Json<NewReportRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DiseaseReport>), ApiError> {
    user.require(UserRole::Farmer)?;
    let Json(request) = payload?;

    if request.symptoms.trim().is_empty() {
        return Err(ApiError::BadRequest("Symptoms are required".into()));
    }
    if request.location.trim().is_empty() {
        return Err(ApiError::BadRequest("Location is required".into()));
    }
    if let Some(confidence) = request.ai_confidence {
        if !(0.0..=100.0).contains(&confidence) {
            return Err(ApiError::BadRequest("AI confidence must be between 0 and 100".into()));
        }
    }

    let mut report = DiseaseReport::new(&user.user_id, request.symptoms.trim(), request.location.trim());
    report.ai_prediction = request.ai_prediction;
    report.ai_confidence = request.ai_confidence;
    report.severity = request.severity;

    let saved = report.clone();
    ctx.with_db(move |conn| repository::insert_report(conn, &saved)).await?;

    tracing::info!(report_id = %report.id, farmer = %user.user_id, "Disease report filed");
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn mine(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<Vec<DiseaseReport>>, ApiError> {
    user.require(UserRole::Farmer)?;
    let farmer_id = user.user_id.clone();
    let reports = ctx
        .with_db(move |conn| repository::list_reports_for_farmer(conn, &farmer_id))
        .await?;
    Ok(Json(reports))
}

pub async fn list_all(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<Vec<DiseaseReport>>, ApiError> {
    user.require(UserRole::Researcher)?;
    let reports = ctx.with_db(repository::list_all_reports).await?;
    Ok(Json(reports))
}

pub async fn update_status(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<DiseaseReport>, ApiError> {
    user.require(UserRole::Researcher)?;
    let Json(request) = payload?;
    let report_id =
        Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid report ID".into()))?;

    let report = ctx
        .with_db(move |conn| {
            repository::update_report_status(conn, &report_id, request.status)?;
            repository::get_report(conn, &report_id)
        })
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("DiseaseReport {report_id} not found")))?;

    tracing::info!(%report_id, status = request.status.as_str(), "Report status updated");
    Ok(Json(report))
}
