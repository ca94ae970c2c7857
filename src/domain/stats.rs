// src/domain/stats.rs
use crate::domain::report::{Report, ReportStatus};
use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};
use serde::Serialize;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const MONTHS_SHOWN: i32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReportStats {
    /// "YYYY-MM"
    pub month: String,
    pub total_reports: usize,
    pub completed_reports: usize,
    pub completion_rate: f64,
    pub average_completion_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total_reports: usize,
    pub completed_reports: usize,
    pub pending_reports: usize,
    pub overdue_reports: usize,
    pub completion_rate: f64,
    /// Days, averaged over reports that carry a completion time.
    pub average_completion_time: f64,
    pub monthly_stats: Vec<MonthlyReportStats>,
}

pub fn local_time(millis: i64, offset: FixedOffset) -> DateTime<FixedOffset> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_default()
        .with_timezone(&offset)
}

fn month_key(millis: i64, offset: FixedOffset) -> String {
    let t = local_time(millis, offset);
    format!("{:04}-{:02}", t.year(), t.month())
}

fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn average_completion_days<'a, I>(reports: I) -> f64
where
    I: Iterator<Item = &'a Report>,
{
    let days: Vec<i64> = reports
        .filter_map(|r| r.completed_at.map(|done| done - r.created_at))
        .map(|elapsed| (elapsed + DAY_MS - 1).div_euclid(DAY_MS))
        .collect();

    if days.is_empty() {
        0.0
    } else {
        days.iter().sum::<i64>() as f64 / days.len() as f64
    }
}

/// Month keys for the window ending with the month containing `now`, oldest first.
fn month_window(now: i64, offset: FixedOffset) -> Vec<String> {
    let t = local_time(now, offset);
    let current = t.year() * 12 + t.month0() as i32;

    (0..MONTHS_SHOWN)
        .rev()
        .map(|back| {
            let idx = current - back;
            format!("{:04}-{:02}", idx.div_euclid(12), idx.rem_euclid(12) + 1)
        })
        .collect()
}

pub fn compute_stats(reports: &[Report], now: i64, offset: FixedOffset) -> ReportStats {
    let total = reports.len();
    let completed = reports
        .iter()
        .filter(|r| r.status == ReportStatus::Approved)
        .count();
    let pending = reports
        .iter()
        .filter(|r| {
            matches!(
                r.status,
                ReportStatus::Pending | ReportStatus::InProgress | ReportStatus::Submitted
            )
        })
        .count();
    let overdue = reports.iter().filter(|r| r.is_overdue(now)).count();

    let monthly_stats = month_window(now, offset)
        .into_iter()
        .map(|month| {
            let in_month: Vec<&Report> = reports
                .iter()
                .filter(|r| month_key(r.created_at, offset) == month)
                .collect();
            let done = in_month
                .iter()
                .filter(|r| r.status == ReportStatus::Approved)
                .count();

            MonthlyReportStats {
                total_reports: in_month.len(),
                completed_reports: done,
                completion_rate: rate(done, in_month.len()),
                average_completion_time: average_completion_days(in_month.iter().copied()),
                month,
            }
        })
        .collect();

    ReportStats {
        total_reports: total,
        completed_reports: completed,
        pending_reports: pending,
        overdue_reports: overdue,
        completion_rate: rate(completed, total),
        average_completion_time: average_completion_days(reports.iter()),
        monthly_stats,
    }
}
