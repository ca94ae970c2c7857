// src/handlers/exports.rs
use astra::Request;
use log::info;

use crate::app::App;
use crate::auth::{Caller, Permission};
use crate::db::reports::{list_reports, ReportFilter};
use crate::domain::report::Report;
use crate::errors::ServerError;
use crate::handlers::query_params;
use crate::ids::now_millis;
use crate::responses::{xlsx_response, ResultResp};
use crate::spreadsheets::report_export::{
    tdp_file_prefix, DETAILS_FILE_PREFIX, STATS_FILE_PREFIX, SUMMARY_FILE_PREFIX,
};
use crate::spreadsheets::{export_details, export_for_tdp, export_stats, export_summary, render_workbook};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Summary,
    Details,
    Stats,
}

impl ExportKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "summary" => Some(ExportKind::Summary),
            "details" => Some(ExportKind::Details),
            "stats" => Some(ExportKind::Stats),
            _ => None,
        }
    }
}

fn all_reports(app: &App) -> Result<Vec<Report>, ServerError> {
    app.db
        .with_conn(|conn| list_reports(conn, &ReportFilter::default()))
}

/// `GET /api/exports/{summary,details,stats}`
pub fn export(app: &App, caller: &Caller, kind: ExportKind) -> ResultResp {
    caller.require(Permission::ViewStats)?;
    let reports = all_reports(app)?;
    let ctx = app.export_context(now_millis());

    let (sheets, prefix) = match kind {
        ExportKind::Summary => (export_summary(&reports, &ctx), SUMMARY_FILE_PREFIX),
        ExportKind::Details => (export_details(&reports, &ctx), DETAILS_FILE_PREFIX),
        ExportKind::Stats => (export_stats(&reports, &ctx), STATS_FILE_PREFIX),
    };

    let filename = ctx.file_name(prefix);
    info!("export {filename}: {} report(s)", reports.len());
    xlsx_response(render_workbook(&sheets)?, &filename)
}

/// `GET /api/exports/tdp?name=...`
pub fn export_tdp(req: &Request, app: &App, caller: &Caller) -> ResultResp {
    caller.require(Permission::ViewStats)?;
    let params = query_params(req);
    let name = params
        .get("name")
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ServerError::BadRequest("query parameter 'name' is required".into()))?;

    let reports = all_reports(app)?;
    let ctx = app.export_context(now_millis());
    let sheets = export_for_tdp(&reports, name, &ctx)?;

    xlsx_response(render_workbook(&sheets)?, &ctx.file_name(&tdp_file_prefix(name)))
}
