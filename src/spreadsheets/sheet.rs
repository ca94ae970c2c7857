// src/spreadsheets/sheet.rs
use crate::errors::ServerError;
use rust_xlsxwriter::Workbook;

const MIN_COLUMN_WIDTH: usize = 10;
const MAX_COLUMN_WIDTH: usize = 50;
const COLUMN_PADDING: usize = 2;
const MAX_SHEET_NAME_CHARS: usize = 31;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn number(value: impl Into<f64>) -> Self {
        Cell::Number(value.into())
    }

    #[cfg(test)]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Number(_) => None,
        }
    }

    /// Length in characters of the value as it appears in the sheet.
    fn display_len(&self) -> usize {
        match self {
            Cell::Text(s) => s.chars().count(),
            Cell::Number(n) => n.to_string().chars().count(),
        }
    }
}

/// One worksheet: a header row plus data rows, in the order they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: sheet_name(name),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// `min(max(10, longest cell) + 2, 50)` for every column, header included.
    pub fn column_widths(&self) -> Vec<usize> {
        (0..self.headers.len())
            .map(|col| {
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(Cell::display_len)
                    .chain(std::iter::once(self.headers[col].chars().count()))
                    .max()
                    .unwrap_or(0);
                (longest.max(MIN_COLUMN_WIDTH) + COLUMN_PADDING).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }
}

/// Excel refuses sheet names longer than 31 characters or containing `[]:*?/\`.
pub fn sheet_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME_CHARS)
        .collect()
}

/// Produces the `.xlsx` bytes for the given sheets.
pub fn render_workbook(sheets: &[Sheet]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&sheet.name)
            .map_err(|e| ServerError::XlsxError(format!("Invalid sheet name '{}': {}", sheet.name, e)))?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet
                .write_string(0, col as u16, header)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e)))?;
        }

        for (i, row) in sheet.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                let written = match cell {
                    Cell::Text(s) => worksheet.write_string(r, col, s),
                    Cell::Number(n) => worksheet.write_number(r, col, *n),
                };
                written.map_err(|e| ServerError::XlsxError(format!("Failed to write cell ({r}, {col}): {e}")))?;
            }
        }

        for (col, width) in sheet.column_widths().into_iter().enumerate() {
            worksheet
                .set_column_width(col as u16, width as f64)
                .map_err(|e| ServerError::XlsxError(format!("Failed to size column {col}: {e}")))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}
