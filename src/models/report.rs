use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{ReportStatus, Severity};

/// A field observation submitted by a farmer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseReport {
    pub id: Uuid,
    pub farmer_id: String,
    pub symptoms: String,
    pub location: String,
    pub ai_prediction: Option<String>,
    pub ai_confidence: Option<f64>,
    pub severity: Option<Severity>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl DiseaseReport {
    /// New report in the `pending` state.
    pub fn new(farmer_id: &str, symptoms: &str, location: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            farmer_id: farmer_id.to_string(),
            symptoms: symptoms.to_string(),
            location: location.to_string(),
            ai_prediction: None,
            ai_confidence: None,
            severity: None,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Guidance published by a researcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchUpdate {
    pub id: Uuid,
    pub researcher_id: String,
    pub title: String,
    pub disease_name: Option<String>,
    pub symptoms: Option<String>,
    pub cause: Option<String>,
    pub treatment: Option<String>,
    pub preventive_measures: Option<String>,
    /// Report this update answers; publishing it marks the report verified.
    pub disease_report_id: Option<Uuid>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}
