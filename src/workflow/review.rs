// src/workflow/review.rs
use log::info;
use rusqlite::Connection;
use serde::Deserialize;

use crate::db::reports::{get_report, save_workflow_state};
use crate::domain::report::{validate_answers, Actor, Answer, HistoryEntry, Report, ReportStatus};
use crate::errors::ServerError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: ReportStatus,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub expected_version: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub expected_version: Option<i64>,
}

fn check_version(report: &Report, expected: Option<i64>) -> Result<(), ServerError> {
    match expected {
        Some(v) if v != report.version => Err(ServerError::Conflict(format!(
            "report {} is at version {}, not {v}",
            report.id, report.version
        ))),
        _ => Ok(()),
    }
}

/// Read, mutate and conditionally write one report inside a transaction.
fn transition<F>(
    conn: &mut Connection,
    id: &str,
    expected_version: Option<i64>,
    mutate: F,
) -> Result<Report, ServerError>
where
    F: FnOnce(&mut Report) -> Result<(), ServerError>,
{
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let mut report = get_report(&tx, id)?.ok_or(ServerError::NotFound)?;
    check_version(&report, expected_version)?;

    let read_version = report.version;
    mutate(&mut report)?;
    save_workflow_state(&tx, &report, read_version)?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    report.version = read_version + 1;
    Ok(report)
}

/// Moves a report along a status edge. Submission is a separate operation
/// since it carries answers.
pub fn update_status(
    conn: &mut Connection,
    id: &str,
    change: StatusChange,
    actor: &Actor,
    now: i64,
) -> Result<Report, ServerError> {
    let next = change.status;
    let report = transition(conn, id, change.expected_version, |report| {
        if !report.status.can_update_to(next) {
            return Err(ServerError::Conflict(format!(
                "cannot move report from {} to {}",
                report.status.as_str(),
                next.as_str()
            )));
        }

        report.status = next;
        if next.is_review_outcome() {
            report.completed_at = Some(now);
        }
        report.history.push(HistoryEntry {
            action: next.history_action().to_string(),
            actor: actor.clone(),
            timestamp: now,
            note: change.note,
        });
        Ok(())
    })?;

    info!("report {id} -> {} by {}", next.as_str(), actor.identity);
    Ok(report)
}

pub fn submit_answers(
    conn: &mut Connection,
    id: &str,
    submission: Submission,
    actor: &Actor,
    now: i64,
) -> Result<Report, ServerError> {
    let report = transition(conn, id, submission.expected_version, |report| {
        if !report.status.accepts_submission() {
            return Err(ServerError::Conflict(format!(
                "report in status {} cannot be submitted",
                report.status.as_str()
            )));
        }
        validate_answers(&report.questions, &submission.answers)?;

        report.submitted_answers = submission.answers;
        report.submitted_at = Some(now);
        report.status = ReportStatus::Submitted;
        report.history.push(HistoryEntry {
            action: ReportStatus::Submitted.history_action().to_string(),
            actor: actor.clone(),
            timestamp: now,
            note: None,
        });
        Ok(())
    })?;

    info!("report {id} submitted by {}", actor.identity);
    Ok(report)
}
