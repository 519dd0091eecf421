use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::report::update_report_status;
use super::{timestamp_from_sql, timestamp_to_sql};
use crate::db::DatabaseError;
use crate::models::enums::ReportStatus;
use crate::models::*;

const UPDATE_COLUMNS: &str = "id, researcher_id, title, disease_name, symptoms, cause, treatment,
     preventive_measures, is_verified, created_at, disease_report_id";

pub fn insert_research_update(
    conn: &Connection,
    update: &ResearchUpdate,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO research_updates (id, researcher_id, title, disease_name, symptoms, cause,
         treatment, preventive_measures, is_verified, created_at, disease_report_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            update.id.to_string(),
            update.researcher_id,
            update.title,
            update.disease_name,
            update.symptoms,
            update.cause,
            update.treatment,
            update.preventive_measures,
            update.is_verified as i32,
            timestamp_to_sql(&update.created_at),
            update.disease_report_id.map(|id| id.to_string()),
        ],
    )?;
    Ok(())
}

/// Insert an update and, when it answers a report, mark that report
/// verified. Both writes commit together; an unknown report id is
/// `NotFound` and nothing is written.
pub fn publish_research_update(
    conn: &Connection,
    update: &ResearchUpdate,
) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    if let Some(report_id) = &update.disease_report_id {
        update_report_status(&tx, report_id, ReportStatus::Verified)?;
    }
    insert_research_update(&tx, update)?;
    tx.commit()?;
    Ok(())
}

/// Verified updates shown on the farmer dashboard, newest first.
pub fn list_verified_updates(
    conn: &Connection,
    limit: u32,
) -> Result<Vec<ResearchUpdate>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {UPDATE_COLUMNS} FROM research_updates
         WHERE is_verified = 1
         ORDER BY created_at DESC, rowid DESC
         LIMIT ?1"
    ))?;

    let rows = stmt.query_map(params![limit], read_update_row)?;
    collect_updates(rows)
}

/// Everything one researcher has published, verified or not.
pub fn list_updates_by_researcher(
    conn: &Connection,
    researcher_id: &str,
) -> Result<Vec<ResearchUpdate>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {UPDATE_COLUMNS} FROM research_updates
         WHERE researcher_id = ?1
         ORDER BY created_at DESC, rowid DESC"
    ))?;

    let rows = stmt.query_map(params![researcher_id], read_update_row)?;
    collect_updates(rows)
}

pub fn set_update_verified(
    conn: &Connection,
    update_id: &Uuid,
    verified: bool,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE research_updates SET is_verified = ?2 WHERE id = ?1",
        params![update_id.to_string(), verified as i32],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "ResearchUpdate".into(),
            id: update_id.to_string(),
        });
    }
    Ok(())
}

struct UpdateRow {
    id: String,
    researcher_id: String,
    title: String,
    disease_name: Option<String>,
    symptoms: Option<String>,
    cause: Option<String>,
    treatment: Option<String>,
    preventive_measures: Option<String>,
    is_verified: i32,
    created_at: String,
    disease_report_id: Option<String>,
}

fn read_update_row(row: &Row<'_>) -> rusqlite::Result<UpdateRow> {
    Ok(UpdateRow {
        id: row.get::<_, String>(0)?,
        researcher_id: row.get::<_, String>(1)?,
        title: row.get::<_, String>(2)?,
        disease_name: row.get::<_, Option<String>>(3)?,
        symptoms: row.get::<_, Option<String>>(4)?,
        cause: row.get::<_, Option<String>>(5)?,
        treatment: row.get::<_, Option<String>>(6)?,
        preventive_measures: row.get::<_, Option<String>>(7)?,
        is_verified: row.get::<_, i32>(8)?,
        created_at: row.get::<_, String>(9)?,
        disease_report_id: row.get::<_, Option<String>>(10)?,
    })
}

fn collect_updates(
    rows: impl Iterator<Item = rusqlite::Result<UpdateRow>>,
) -> Result<Vec<ResearchUpdate>, DatabaseError> {
    let mut updates = Vec::new();
    for row in rows {
        updates.push(update_from_row(row?)?);
    }
    Ok(updates)
}

fn update_from_row(row: UpdateRow) -> Result<ResearchUpdate, DatabaseError> {
    Ok(ResearchUpdate {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        researcher_id: row.researcher_id,
        title: row.title,
        disease_name: row.disease_name,
        symptoms: row.symptoms,
        cause: row.cause,
        treatment: row.treatment,
        preventive_measures: row.preventive_measures,
        disease_report_id: row
            .disease_report_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        is_verified: row.is_verified != 0,
        created_at: timestamp_from_sql(&row.created_at)?,
    })
}
