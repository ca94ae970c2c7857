// src/workflow/assignment.rs
use log::{debug, info};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::db::{reports, tdp};
use crate::domain::report::{
    Actor, Assignment, HistoryEntry, Report, ReportStatus, ReportTemplate, ACTION_CREATED,
};
use crate::errors::ServerError;
use crate::ids::new_id;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[serde(flatten)]
    pub template: ReportTemplate,
    #[serde(alias = "targetTdpIds")]
    pub tdp_ids: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl AssignRequest {
    pub fn validate(&self) -> Result<(), ServerError> {
        self.template.validate()?;
        if self.tdp_ids.iter().all(|id| id.trim().is_empty()) {
            return Err(ServerError::BadRequest("at least one target TDP is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotFound,
    Inactive,
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedTarget {
    pub tdp_id: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentOutcome {
    pub created: Vec<String>,
    pub skipped: Vec<SkippedTarget>,
}

fn build_report(template: &ReportTemplate, assigned_to: Assignment, assignor: &Actor, note: Option<String>, now: i64) -> Report {
    Report {
        id: new_id(),
        title: template.title.trim().to_string(),
        priority: template.priority,
        due_date: template.due_date,
        questions: template.questions.clone(),
        assigned_to,
        assigned_by: assignor.clone(),
        status: ReportStatus::Pending,
        submitted_answers: Vec::new(),
        submitted_at: None,
        completed_at: None,
        history: vec![HistoryEntry {
            action: ACTION_CREATED.to_string(),
            actor: assignor.clone(),
            timestamp: now,
            note,
        }],
        created_at: now,
        version: 1,
    }
}

/// Creates one report per target TDP in a single transaction. Either every
/// report is written or none is. Unusable targets are skipped and listed in
/// the outcome.
pub fn assign_reports(
    conn: &mut Connection,
    request: AssignRequest,
    assignor: &Actor,
    now: i64,
) -> Result<AssignmentOutcome, ServerError> {
    request.validate()?;

    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let mut outcome = AssignmentOutcome::default();
    let mut seen = HashSet::new();

    for raw_id in &request.tdp_ids {
        let tdp_id = raw_id.trim();
        if tdp_id.is_empty() {
            continue;
        }

        let skip = |reason| SkippedTarget { tdp_id: tdp_id.to_string(), reason };

        if !seen.insert(tdp_id) {
            outcome.skipped.push(skip(SkipReason::Duplicate));
            continue;
        }

        let Some(target) = tdp::get_tdp(&tx, tdp_id)? else {
            debug!("assign: tdp {tdp_id} not found, skipping");
            outcome.skipped.push(skip(SkipReason::NotFound));
            continue;
        };
        if !target.active {
            outcome.skipped.push(skip(SkipReason::Inactive));
            continue;
        }

        let report = build_report(
            &request.template,
            Assignment {
                tdp_id: target.id,
                leader_identity: target.leader_identity,
                tdp_name: target.name,
                leader_name: target.leader_name,
            },
            assignor,
            request.note.clone(),
            now,
        );
        reports::insert_report(&tx, &report)?;
        outcome.created.push(report.id);
    }

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    info!(
        "assigned '{}' to {} TDP(s), {} skipped",
        request.template.title,
        outcome.created.len(),
        outcome.skipped.len()
    );
    Ok(outcome)
}
