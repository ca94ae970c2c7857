pub mod report_export;
pub mod sheet;

pub use report_export::{export_details, export_for_tdp, export_stats, export_summary, ExportContext};
pub use sheet::{render_workbook, Cell, Sheet};
