// src/db/reports.rs
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::report::{Actor, Assignment, Priority, Report, ReportStatus};
use crate::errors::ServerError;

const REPORT_COLUMNS: &str = "id, title, priority, due_date, questions,
     tdp_id, leader_identity, tdp_name, leader_name,
     assigned_by_identity, assigned_by_name,
     status, submitted_answers, submitted_at, completed_at, history,
     created_at, version";

/// Optional narrowing applied to a report listing.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Restrict to reports assigned to any of these identities.
    pub leader_ids: Option<Vec<String>>,
    pub status: Option<ReportStatus>,
    pub tdp_id: Option<String>,
    pub limit: Option<usize>,
}

impl ReportFilter {
    fn matches(&self, report: &Report) -> bool {
        if let Some(ids) = &self.leader_ids {
            if !ids.iter().any(|id| *id == report.assigned_to.leader_identity) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if report.status != status {
                return false;
            }
        }
        if let Some(tdp_id) = &self.tdp_id {
            if *tdp_id != report.assigned_to.tdp_id {
                return false;
            }
        }
        true
    }
}

fn conversion_error(idx: usize, e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn json_col<T: DeserializeOwned>(r: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = r.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

fn to_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String, ServerError> {
    serde_json::to_string(value)
        .map_err(|e| ServerError::DbError(format!("encode {what} failed: {e}")))
}

#[derive(Debug, thiserror::Error)]
#[error("unknown {0} '{1}'")]
struct UnknownValue(&'static str, String);

fn row_to_report(r: &Row<'_>) -> rusqlite::Result<Report> {
    let priority: String = r.get(2)?;
    let status: String = r.get(11)?;

    Ok(Report {
        id: r.get(0)?,
        title: r.get(1)?,
        priority: Priority::parse(&priority)
            .ok_or_else(|| conversion_error(2, UnknownValue("priority", priority.clone())))?,
        due_date: r.get(3)?,
        questions: json_col(r, 4)?,
        assigned_to: Assignment {
            tdp_id: r.get(5)?,
            leader_identity: r.get(6)?,
            tdp_name: r.get(7)?,
            leader_name: r.get(8)?,
        },
        assigned_by: Actor {
            identity: r.get(9)?,
            name: r.get(10)?,
        },
        status: ReportStatus::parse(&status)
            .ok_or_else(|| conversion_error(11, UnknownValue("status", status.clone())))?,
        submitted_answers: json_col(r, 12)?,
        submitted_at: r.get(13)?,
        completed_at: r.get(14)?,
        history: json_col(r, 15)?,
        created_at: r.get(16)?,
        version: r.get(17)?,
    })
}

pub fn insert_report(conn: &Connection, report: &Report) -> Result<(), ServerError> {
    conn.execute(
        "insert into reports (id, title, priority, due_date, questions,
                              tdp_id, leader_identity, tdp_name, leader_name,
                              assigned_by_identity, assigned_by_name,
                              status, submitted_answers, submitted_at, completed_at, history,
                              created_at, version)
         values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            report.id,
            report.title,
            report.priority.as_str(),
            report.due_date,
            to_json(&report.questions, "questions")?,
            report.assigned_to.tdp_id,
            report.assigned_to.leader_identity,
            report.assigned_to.tdp_name,
            report.assigned_to.leader_name,
            report.assigned_by.identity,
            report.assigned_by.name,
            report.status.as_str(),
            to_json(&report.submitted_answers, "answers")?,
            report.submitted_at,
            report.completed_at,
            to_json(&report.history, "history")?,
            report.created_at,
            report.version,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert report failed: {e}")))?;
    Ok(())
}

/// Newest first, then narrowed by `filter`.
pub fn list_reports(conn: &Connection, filter: &ReportFilter) -> Result<Vec<Report>, ServerError> {
    let mut stmt = conn
        .prepare(&format!(
            "select {REPORT_COLUMNS} from reports order by created_at desc, id"
        ))
        .map_err(|e| ServerError::DbError(format!("prepare list reports failed: {e}")))?;

    let rows = stmt
        .query_map([], row_to_report)
        .map_err(|e| ServerError::DbError(format!("list reports failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        let report = row.map_err(|e| ServerError::DbError(format!("read report row failed: {e}")))?;
        if filter.matches(&report) {
            out.push(report);
            if filter.limit.is_some_and(|limit| out.len() >= limit) {
                break;
            }
        }
    }
    Ok(out)
}

pub fn get_report(conn: &Connection, id: &str) -> Result<Option<Report>, ServerError> {
    conn.query_row(
        &format!("select {REPORT_COLUMNS} from reports where id = ?"),
        params![id],
        row_to_report,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("get report failed: {e}")))
}

/// Writes the mutable workflow fields of `report`, guarded by `expected_version`.
/// On success the stored version becomes `expected_version + 1`.
pub fn save_workflow_state(
    conn: &Connection,
    report: &Report,
    expected_version: i64,
) -> Result<(), ServerError> {
    let updated = conn
        .execute(
            "update reports
             set status = ?, submitted_answers = ?, submitted_at = ?, completed_at = ?,
                 history = ?, version = version + 1
             where id = ? and version = ?",
            params![
                report.status.as_str(),
                to_json(&report.submitted_answers, "answers")?,
                report.submitted_at,
                report.completed_at,
                to_json(&report.history, "history")?,
                report.id,
                expected_version,
            ],
        )
        .map_err(|e| ServerError::DbError(format!("update report failed: {e}")))?;

    if updated != 1 {
        return Err(ServerError::Conflict(format!(
            "report {} was modified concurrently",
            report.id
        )));
    }
    Ok(())
}

pub fn delete_report(conn: &Connection, id: &str) -> Result<(), ServerError> {
    let deleted = conn
        .execute("delete from reports where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete report failed: {e}")))?;

    if deleted == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}
