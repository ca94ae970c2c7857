// src/spreadsheets/report_export.rs
use chrono::FixedOffset;

use crate::domain::report::{Answer, Question, QuestionType, Report, ReportStatus};
use crate::domain::stats::local_time;
use crate::errors::ServerError;
use crate::spreadsheets::sheet::{Cell, Sheet};

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

const UNANSWERED: &str = "Chưa trả lời";
const UNKNOWN: &str = "Không rõ";
const DEFAULT_LEADER_NAME: &str = "Tổ trưởng";
const OVERDUE_LABEL: &str = "Quá hạn";

/// Clock and display zone an export is produced under.
#[derive(Debug, Clone, Copy)]
pub struct ExportContext {
    pub now: i64,
    pub offset: FixedOffset,
}

impl ExportContext {
    pub fn new(now: i64, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// `DD/MM/YYYY HH:mm`
    pub fn format_datetime(&self, millis: i64) -> String {
        local_time(millis, self.offset).format("%d/%m/%Y %H:%M").to_string()
    }

    fn format_opt(&self, millis: Option<i64>) -> String {
        millis.map(|m| self.format_datetime(m)).unwrap_or_default()
    }

    /// `<prefix>_<ddMMyyyy_HHmm>.xlsx`
    pub fn file_name(&self, prefix: &str) -> String {
        let stamp = local_time(self.now, self.offset).format("%d%m%Y_%H%M");
        format!("{prefix}_{stamp}.xlsx")
    }
}

pub const SUMMARY_FILE_PREFIX: &str = "BaoCao_TongQuan";
pub const DETAILS_FILE_PREFIX: &str = "BaoCao_ChiTiet";
pub const STATS_FILE_PREFIX: &str = "ThongKe_BaoCao";

pub fn tdp_file_prefix(tdp_name: &str) -> String {
    format!("BaoCao_{tdp_name}")
}

/// Time from assignment (first history entry, else the due date) to submission.
pub fn completion_time(report: &Report) -> String {
    let Some(submitted) = report.submitted_at else {
        return String::new();
    };
    let start = report
        .history
        .first()
        .map(|h| h.timestamp)
        .unwrap_or(report.due_date);

    let elapsed = submitted - start;
    let days = elapsed / DAY_MS;
    let hours = (elapsed / HOUR_MS) % 24;

    if days > 0 {
        format!("{days} ngày {hours} giờ")
    } else {
        format!("{hours} giờ")
    }
}

fn leader_name(report: &Report) -> &str {
    let name = report.assigned_to.leader_name.trim();
    if name.is_empty() {
        DEFAULT_LEADER_NAME
    } else {
        name
    }
}

fn format_answer(question: &Question, answer: Option<&Answer>) -> String {
    let Some(answer) = answer.filter(|a| !a.is_empty()) else {
        return UNANSWERED.to_string();
    };

    match (question.kind, answer) {
        (QuestionType::ShortAnswer, Answer::Text { value, .. }) => value.clone(),
        (QuestionType::SingleChoice, Answer::Text { value, .. }) => question
            .option_label(value)
            .unwrap_or(UNKNOWN)
            .to_string(),
        (QuestionType::MultipleChoice, Answer::Multi { value, .. }) => {
            let labels: Vec<&str> = question
                .options
                .iter()
                .filter(|opt| value.contains(&opt.id))
                .map(|opt| opt.value.as_str())
                .collect();
            if labels.is_empty() {
                UNKNOWN.to_string()
            } else {
                labels.join(", ")
            }
        }
        _ => UNKNOWN.to_string(),
    }
}

fn percent(part: usize, total: usize) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", part as f64 / total as f64 * 100.0)
}

/// Cells shared by the summary sheet and the per-TDP sheet.
fn summary_cells(report: &Report, ctx: &ExportContext, with_tdp: bool) -> Vec<Cell> {
    let mut row = vec![Cell::text(&report.id), Cell::text(&report.title)];
    if with_tdp {
        row.push(Cell::text(&report.assigned_to.tdp_name));
        row.push(Cell::text(leader_name(report)));
    }
    row.extend([
        Cell::text(&report.assigned_by.name),
        Cell::text(report.status.label()),
        Cell::text(report.priority.label()),
        Cell::text(ctx.format_datetime(report.due_date)),
        Cell::text(ctx.format_opt(report.submitted_at)),
        Cell::text(completion_time(report)),
        Cell::number(report.questions.len() as f64),
        Cell::number(report.submitted_answers.len() as f64),
    ]);
    row
}

pub fn export_summary(reports: &[Report], ctx: &ExportContext) -> Vec<Sheet> {
    let mut sheet = Sheet::new(
        "Tổng quan báo cáo",
        &[
            "Mã báo cáo",
            "Tiêu đề",
            "Tổ dân phố",
            "Tổ trưởng",
            "Người giao",
            "Trạng thái",
            "Ưu tiên",
            "Hạn nộp",
            "Thời gian nộp",
            "Thời gian hoàn thành",
            "Số câu hỏi",
            "Số câu trả lời",
        ],
    );
    for report in reports {
        sheet.push(summary_cells(report, ctx, true));
    }
    vec![sheet]
}

/// One row per (report, question). Reports without questions add no rows.
pub fn export_details(reports: &[Report], ctx: &ExportContext) -> Vec<Sheet> {
    let mut sheet = Sheet::new(
        "Chi tiết báo cáo",
        &[
            "Mã báo cáo",
            "Tiêu đề báo cáo",
            "Tổ dân phố",
            "STT câu hỏi",
            "ID câu hỏi",
            "Câu hỏi",
            "Loại câu hỏi",
            "Bắt buộc",
            "Câu trả lời",
            "Thời gian nộp",
        ],
    );

    for report in reports {
        for (i, question) in report.questions.iter().enumerate() {
            sheet.push(vec![
                Cell::text(&report.id),
                Cell::text(&report.title),
                Cell::text(&report.assigned_to.tdp_name),
                Cell::number((i + 1) as f64),
                Cell::text(&question.id),
                Cell::text(&question.text),
                Cell::text(question.kind.label()),
                Cell::text(if question.is_required { "Có" } else { "Không" }),
                Cell::text(format_answer(question, report.answer_for(&question.id))),
                Cell::text(ctx.format_opt(report.submitted_at)),
            ]);
        }
    }
    vec![sheet]
}

#[derive(Default)]
struct TdpTally {
    total: usize,
    completed: usize,
    pending: usize,
    overdue: usize,
}

fn is_open(status: ReportStatus) -> bool {
    matches!(status, ReportStatus::Pending | ReportStatus::InProgress)
}

/// Entry for `key` in a first-seen-ordered group list, inserted when missing.
fn tally<'g, 'a, T: Default>(groups: &'g mut Vec<(&'a str, T)>, key: &'a str) -> &'g mut T {
    let idx = match groups.iter().position(|(k, _)| *k == key) {
        Some(idx) => idx,
        None => {
            groups.push((key, T::default()));
            groups.len() - 1
        }
    };
    &mut groups[idx].1
}

pub fn export_stats(reports: &[Report], ctx: &ExportContext) -> Vec<Sheet> {
    let total = reports.len();
    let completed = reports.iter().filter(|r| r.status == ReportStatus::Approved).count();
    let in_progress = reports.iter().filter(|r| is_open(r.status)).count();
    let awaiting = reports.iter().filter(|r| r.status == ReportStatus::Submitted).count();
    let overdue = reports.iter().filter(|r| r.is_overdue(ctx.now)).count();

    let mut overview = Sheet::new("Thống kê tổng quan", &["Chỉ số", "Giá trị", "Ghi chú"]);
    overview.push(vec![
        Cell::text("Tổng số báo cáo"),
        Cell::number(total as f64),
        Cell::text(""),
    ]);
    for (label, count) in [
        ("Đã hoàn thành", completed),
        ("Đang xử lý", in_progress),
        ("Chờ duyệt", awaiting),
        (OVERDUE_LABEL, overdue),
    ] {
        overview.push(vec![
            Cell::text(label),
            Cell::number(count as f64),
            Cell::text(format!("{}%", percent(count, total))),
        ]);
    }

    let mut by_tdp: Vec<(&str, TdpTally)> = Vec::new();
    let mut by_status: Vec<(&str, usize)> = Vec::new();
    for report in reports {
        let t = tally(&mut by_tdp, &report.assigned_to.tdp_name);
        t.total += 1;
        if report.status == ReportStatus::Approved {
            t.completed += 1;
        }
        if is_open(report.status) {
            t.pending += 1;
        }
        if report.is_overdue(ctx.now) {
            t.overdue += 1;
        }

        *tally(&mut by_status, report.status.label()) += 1;
    }

    let mut tdp_sheet = Sheet::new(
        "Thống kê theo TDP",
        &["Tổ dân phố", "Tổng số", "Hoàn thành", "Chờ xử lý", "Quá hạn", "Tỷ lệ hoàn thành (%)"],
    );
    for (name, t) in &by_tdp {
        tdp_sheet.push(vec![
            Cell::text(*name),
            Cell::number(t.total as f64),
            Cell::number(t.completed as f64),
            Cell::number(t.pending as f64),
            Cell::number(t.overdue as f64),
            Cell::text(percent(t.completed, t.total)),
        ]);
    }

    let mut status_sheet = Sheet::new("Thống kê theo trạng thái", &["Trạng thái", "Số lượng", "Tỷ lệ (%)"]);
    for (label, count) in &by_status {
        status_sheet.push(vec![
            Cell::text(*label),
            Cell::number(*count as f64),
            Cell::text(percent(*count, total)),
        ]);
    }

    vec![overview, tdp_sheet, status_sheet]
}

/// Summary of one TDP's reports, without the TDP and leader columns.
pub fn export_for_tdp(reports: &[Report], tdp_name: &str, ctx: &ExportContext) -> Result<Vec<Sheet>, ServerError> {
    let mine: Vec<&Report> = reports
        .iter()
        .filter(|r| r.assigned_to.tdp_name == tdp_name)
        .collect();

    if mine.is_empty() {
        return Err(ServerError::NotFoundMsg(format!(
            "Không tìm thấy báo cáo nào cho TDP {tdp_name}"
        )));
    }

    let mut sheet = Sheet::new(
        &format!("Báo cáo {tdp_name}"),
        &[
            "Mã báo cáo",
            "Tiêu đề",
            "Người giao",
            "Trạng thái",
            "Ưu tiên",
            "Hạn nộp",
            "Thời gian nộp",
            "Thời gian hoàn thành",
            "Số câu hỏi",
            "Số câu trả lời",
        ],
    );
    for report in mine {
        sheet.push(summary_cells(report, ctx, false));
    }
    Ok(vec![sheet])
}
