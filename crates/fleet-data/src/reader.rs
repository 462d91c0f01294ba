//! Spreadsheet and CSV source reading.
//!
//! Turns a workbook sheet or a CSV file into a [`RawTable`] of untyped
//! [`CellValue`]s. No header handling happens here; see
//! [`crate::normalizer`].

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, DataType, Reader};
use fleet_core::error::{ReportError, Result};
use fleet_core::models::CellValue;
use tracing::{debug, warn};

// ── Public types ──────────────────────────────────────────────────────────────

/// Rows of cells exactly as found in the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Absolute sheet row index of `rows[0]`. Workbook ranges start at the
    /// first used cell, so leading blank rows are not materialised.
    pub first_row: usize,
    pub rows: Vec<Vec<CellValue>>,
}

/// Source kinds recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Csv,
}

impl SourceFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn detect(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Workbook),
            "csv" | "txt" => Ok(SourceFormat::Csv),
            _ => Err(ReportError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read `path` into a [`RawTable`]. `sheet` selects the worksheet of a
/// workbook and is ignored for CSV files.
pub fn read_source(path: &Path, sheet: &str) -> Result<RawTable> {
    let table = match SourceFormat::detect(path)? {
        SourceFormat::Workbook => read_workbook(path, sheet)?,
        SourceFormat::Csv => read_csv(path)?,
    };
    debug!(
        "Read {} rows from {} (first row {})",
        table.rows.len(),
        path.display(),
        table.first_row
    );
    Ok(table)
}

// ── Workbook ──────────────────────────────────────────────────────────────────

fn read_workbook(path: &Path, sheet: &str) -> Result<RawTable> {
    ensure_readable(path)?;

    let mut workbook = open_workbook_auto(path).map_err(|e| parse_error(path, e))?;

    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == sheet) {
        return Err(ReportError::SheetNotFound {
            sheet: sheet.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| parse_error(path, e))?;

    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let rows = range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Ok(RawTable { first_row, rows })
}

/// Map a calamine cell onto [`CellValue`]. Error cells read as empty.
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            CellValue::Text(s.clone())
        }
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) => CellValue::Date(dt.date()),
            None => CellValue::Empty,
        },
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

fn read_csv(path: &Path) -> Result<RawTable> {
    let bytes = std::fs::read(path).map_err(|e| ReportError::SourceOpen {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let delimiter = detect_delimiter(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes.as_slice());

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    let mut lossy_fields = 0usize;
    for result in reader.byte_records() {
        let record = result.map_err(|e| parse_error(path, e))?;

        // The csv reader skips empty lines; pad them back so row indices
        // stay equal to source line numbers.
        if let Some(position) = record.position() {
            let line_index = position.line().saturating_sub(1) as usize;
            while rows.len() < line_index {
                rows.push(Vec::new());
            }
        }

        let row: Vec<CellValue> = record
            .iter()
            .map(|field| {
                let text = String::from_utf8_lossy(field);
                if matches!(text, std::borrow::Cow::Owned(_)) {
                    lossy_fields += 1;
                }
                CellValue::Text(text.into_owned())
            })
            .collect();
        rows.push(row);
    }

    if lossy_fields > 0 {
        warn!(
            "{} CSV fields in {} were not valid UTF-8 and were decoded lossily",
            lossy_fields,
            path.display()
        );
    }

    Ok(RawTable { first_row: 0, rows })
}

/// `;` when the first line uses it more often than `,`, otherwise `,`.
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|&b| b == b'\n').next().unwrap_or(&[]);
    let semicolons = first_line.iter().filter(|&&b| b == b';').count();
    let commas = first_line.iter().filter(|&&b| b == b',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn ensure_readable(path: &Path) -> Result<()> {
    std::fs::File::open(path)
        .map(|_| ())
        .map_err(|e| ReportError::SourceOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> ReportError {
    ReportError::SourceParse {
        path: PathBuf::from(path),
        reason: err.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
