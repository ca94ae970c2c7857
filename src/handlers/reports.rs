// src/handlers/reports.rs
use astra::Request;
use log::info;
use serde::Serialize;

use crate::app::App;
use crate::auth::{Caller, Permission};
use crate::db::reports::{self, ReportFilter};
use crate::domain::report::{Report, ReportStatus};
use crate::domain::stats::compute_stats;
use crate::errors::ServerError;
use crate::handlers::{query_number, query_params, read_json};
use crate::ids::now_millis;
use crate::responses::{json_response, ok_json, ResultResp};
use crate::workflow::{self, AssignRequest, StatusChange, Submission};

/// A report as served to clients, with the derived overdue flag.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView<'a> {
    #[serde(flatten)]
    pub report: &'a Report,
    pub is_overdue: bool,
    pub display_status: &'static str,
}

impl<'a> ReportView<'a> {
    pub fn new(report: &'a Report, now: i64) -> Self {
        Self {
            report,
            is_overdue: report.is_overdue(now),
            display_status: report.display_status(now),
        }
    }
}

/// Staff see every report, leaders only their own.
fn visibility_filter(caller: &Caller) -> Result<ReportFilter, ServerError> {
    if caller.role.has(Permission::ViewAllReports) {
        return Ok(ReportFilter::default());
    }
    caller.require(Permission::ViewOwnReports)?;
    caller.require_identity()?;
    Ok(ReportFilter {
        leader_ids: Some(caller.ids().map(str::to_string).collect()),
        ..Default::default()
    })
}

fn load_visible(app: &App, caller: &Caller, id: &str) -> Result<Report, ServerError> {
    let report = app
        .db
        .with_conn(|conn| reports::get_report(conn, id))?
        .ok_or_else(|| ServerError::NotFoundMsg(format!("report {id}")))?;

    if caller.role.has(Permission::ViewAllReports)
        || (caller.role.has(Permission::ViewOwnReports) && caller.owns(&report.assigned_to.leader_identity))
    {
        Ok(report)
    } else {
        Err(ServerError::Forbidden("report belongs to another leader".into()))
    }
}

/// `GET /api/reports?status=&tdpId=&limit=`
pub fn list_reports(req: &Request, app: &App, caller: &Caller) -> ResultResp {
    let mut filter = visibility_filter(caller)?;
    let params = query_params(req);

    if let Some(raw) = params.get("status").filter(|s| !s.is_empty()) {
        filter.status = Some(
            ReportStatus::parse(raw).ok_or_else(|| ServerError::BadRequest(format!("unknown status '{raw}'")))?,
        );
    }
    filter.tdp_id = params.get("tdpId").filter(|s| !s.is_empty()).cloned();
    filter.limit = query_number(&params, "limit")?;

    let found = app.db.with_conn(|conn| reports::list_reports(conn, &filter))?;
    let now = now_millis();
    let views: Vec<ReportView> = found.iter().map(|r| ReportView::new(r, now)).collect();
    ok_json(&views)
}

pub fn get_report(app: &App, caller: &Caller, id: &str) -> ResultResp {
    let report = load_visible(app, caller, id)?;
    ok_json(&ReportView::new(&report, now_millis()))
}

/// Staff get ward-wide numbers; a leader gets numbers for their own reports.
pub fn report_stats(app: &App, caller: &Caller) -> ResultResp {
    let filter = if caller.role.has(Permission::ViewStats) {
        ReportFilter::default()
    } else {
        visibility_filter(caller)?
    };
    let visible = app.db.with_conn(|conn| reports::list_reports(conn, &filter))?;
    ok_json(&compute_stats(&visible, now_millis(), app.display_offset()))
}

pub fn assign_reports(mut req: Request, app: &App, caller: &Caller) -> ResultResp {
    caller.require(Permission::CreateReport)?;
    caller.require_identity()?;
    let request: AssignRequest = read_json(&mut req, app.config.max_body_bytes)?;

    let assignor = caller.actor();
    let outcome = app
        .db
        .with_conn(|conn| workflow::assign_reports(conn, request, &assignor, now_millis()))?;
    json_response(201, &outcome, "Created")
}

/// Reviewers approve or reject; the assigned leader starts (or restarts) work.
pub fn update_status(mut req: Request, app: &App, caller: &Caller, id: &str) -> ResultResp {
    let change: StatusChange = read_json(&mut req, app.config.max_body_bytes)?;

    if change.status.is_review_outcome() {
        caller.require(Permission::ApproveReport)?;
    } else {
        caller.require(Permission::SubmitReport)?;
        let report = load_visible(app, caller, id)?;
        if !caller.owns(&report.assigned_to.leader_identity) {
            return Err(ServerError::Forbidden("only the assigned leader can do this".into()));
        }
    }

    let actor = caller.actor();
    let updated = app
        .db
        .with_conn(|conn| workflow::update_status(conn, id, change, &actor, now_millis()))?;
    ok_json(&ReportView::new(&updated, now_millis()))
}

pub fn submit_answers(mut req: Request, app: &App, caller: &Caller, id: &str) -> ResultResp {
    caller.require(Permission::SubmitReport)?;
    let submission: Submission = read_json(&mut req, app.config.max_body_bytes)?;

    let report = load_visible(app, caller, id)?;
    if !caller.owns(&report.assigned_to.leader_identity) {
        return Err(ServerError::Forbidden("only the assigned leader can submit".into()));
    }

    let actor = caller.actor();
    let updated = app
        .db
        .with_conn(|conn| workflow::submit_answers(conn, id, submission, &actor, now_millis()))?;
    ok_json(&ReportView::new(&updated, now_millis()))
}

pub fn delete_report(app: &App, caller: &Caller, id: &str) -> ResultResp {
    caller.require(Permission::DeleteReport)?;
    app.db.with_conn(|conn| reports::delete_report(conn, id))?;

    info!("report {id} deleted by {}", caller.actor().identity);
    ok_json(&serde_json::json!({ "id": id }))
}
