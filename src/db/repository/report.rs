use std::str::FromStr;

use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{timestamp_from_sql, timestamp_to_sql};
use crate::db::DatabaseError;
use crate::models::enums::*;
use crate::models::*;

const REPORT_COLUMNS: &str = "id, farmer_id, symptoms, location, ai_prediction, ai_confidence,
     severity, status, created_at";

pub fn insert_report(conn: &Connection, report: &DiseaseReport) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO disease_reports (id, farmer_id, symptoms, location, ai_prediction,
         ai_confidence, severity, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            report.id.to_string(),
            report.farmer_id,
            report.symptoms,
            report.location,
            report.ai_prediction,
            report.ai_confidence,
            report.severity.map(|s| s.as_str()),
            report.status.as_str(),
            timestamp_to_sql(&report.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_report(conn: &Connection, id: &Uuid) -> Result<Option<DiseaseReport>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REPORT_COLUMNS} FROM disease_reports WHERE id = ?1"
    ))?;

    let result = stmt.query_row(params![id.to_string()], read_report_row);

    match result {
        Ok(row) => Ok(Some(report_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Reports submitted by one farmer, newest first.
pub fn list_reports_for_farmer(
    conn: &Connection,
    farmer_id: &str,
) -> Result<Vec<DiseaseReport>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REPORT_COLUMNS} FROM disease_reports
         WHERE farmer_id = ?1
         ORDER BY created_at DESC, rowid DESC"
    ))?;

    let rows = stmt.query_map(params![farmer_id], read_report_row)?;
    collect_reports(rows)
}

/// Every report, newest first (researcher view).
pub fn list_all_reports(conn: &Connection) -> Result<Vec<DiseaseReport>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REPORT_COLUMNS} FROM disease_reports
         ORDER BY created_at DESC, rowid DESC"
    ))?;

    let rows = stmt.query_map([], read_report_row)?;
    collect_reports(rows)
}

/// Update only the review status of a report.
pub fn update_report_status(
    conn: &Connection,
    report_id: &Uuid,
    status: ReportStatus,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE disease_reports SET status = ?2 WHERE id = ?1",
        params![report_id.to_string(), status.as_str()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "DiseaseReport".into(),
            id: report_id.to_string(),
        });
    }
    Ok(())
}

struct ReportRow {
    id: String,
    farmer_id: String,
    symptoms: String,
    location: String,
    ai_prediction: Option<String>,
    ai_confidence: Option<f64>,
    severity: Option<String>,
    status: String,
    created_at: String,
}

fn read_report_row(row: &Row<'_>) -> rusqlite::Result<ReportRow> {
    Ok(ReportRow {
        id: row.get::<_, String>(0)?,
        farmer_id: row.get::<_, String>(1)?,
        symptoms: row.get::<_, String>(2)?,
        location: row.get::<_, String>(3)?,
        ai_prediction: row.get::<_, Option<String>>(4)?,
        ai_confidence: row.get::<_, Option<f64>>(5)?,
        severity: row.get::<_, Option<String>>(6)?,
        status: row.get::<_, String>(7)?,
        created_at: row.get::<_, String>(8)?,
    })
}

fn collect_reports(
    rows: impl Iterator<Item = rusqlite::Result<ReportRow>>,
) -> Result<Vec<DiseaseReport>, DatabaseError> {
    let mut reports = Vec::new();
    for row in rows {
        reports.push(report_from_row(row?)?);
    }
    Ok(reports)
}

fn report_from_row(row: ReportRow) -> Result<DiseaseReport, DatabaseError> {
    Ok(DiseaseReport {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        farmer_id: row.farmer_id,
        symptoms: row.symptoms,
        location: row.location,
        ai_prediction: row.ai_prediction,
        ai_confidence: row.ai_confidence,
        severity: row.severity.as_deref().map(Severity::from_str).transpose()?,
        status: ReportStatus::from_str(&row.status)?,
        created_at: timestamp_from_sql(&row.created_at)?,
    })
}
