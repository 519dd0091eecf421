//! Research update endpoints.
//!
//! - `POST /api/research-updates` — researcher publishes guidance, optionally
//!   answering a report (which is then marked verified)
//! - `GET /api/research-updates` — verified guidance for farmers
//! - `GET /api/research-updates/mine` — everything the researcher published
//! - `PUT /api/research-updates/:id/verification` — verify or withdraw

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::repository;
use crate::models::enums::UserRole;
use crate::models::ResearchUpdate;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;

#[derive(Deserialize)]
pub struct NewUpdateRequest {
    pub title: String,
    pub disease_name: Option<String>,
    pub symptoms: Option<String>,
    pub cause: Option<String>,
    pub treatment: Option<String>,
    pub preventive_measures: Option<String>,
    pub disease_report_id: Option<Uuid>,
    pub is_verified: Option<bool>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

#[derive(Deserialize)]
pub struct VerificationRequest {
    pub is_verified: bool,
}

pub async fn publish(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    payload: Result<Json<NewUpdateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ResearchUpdate>), ApiError> {
    user.require(UserRole::Researcher)?;
    let Json(request) = payload?;
    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".into()));
    }

    let update = ResearchUpdate {
        id: Uuid::new_v4(),
        researcher_id: user.user_id.clone(),
        title: request.title.trim().to_string(),
        disease_name: request.disease_name,
        symptoms: request.symptoms,
        cause: request.cause,
        treatment: request.treatment,
        preventive_measures: request.preventive_measures,
        disease_report_id: request.disease_report_id,
        is_verified: request.is_verified.unwrap_or(true),
        created_at: chrono::Utc::now(),
    };

    let saved = update.clone();
    ctx.with_db(move |conn| repository::publish_research_update(conn, &saved))
        .await?;

    tracing::info!(
        update_id = %update.id,
        researcher = %user.user_id,
        answers_report = update.disease_report_id.is_some(),
        "Research update published"
    );
    Ok((StatusCode::CREATED, Json(update)))
}

pub async fn list_verified(
    State(ctx): State<ApiContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ResearchUpdate>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let updates = ctx
        .with_db(move |conn| repository::list_verified_updates(conn, limit))
        .await?;
    Ok(Json(updates))
}

pub async fn mine(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<Vec<ResearchUpdate>>, ApiError> {
    user.require(UserRole::Researcher)?;
    let researcher_id = user.user_id.clone();
    let updates = ctx
        .with_db(move |conn| repository::list_updates_by_researcher(conn, &researcher_id))
        .await?;
    Ok(Json(updates))
}

pub async fn set_verification(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    payload: Result<Json<VerificationRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    user.require(UserRole::Researcher)?;
    let Json(request) = payload?;
    let update_id =
        Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid update ID".into()))?;

    ctx.with_db(move |conn| repository::set_update_verified(conn, &update_id, request.is_verified))
        .await?;

    tracing::info!(
        %update_id,
        is_verified = request.is_verified,
        "Research update verification changed"
    );
    Ok(StatusCode::NO_CONTENT)
}
