//! Header promotion and column validation.

use std::collections::HashMap;

use fleet_core::error::{ReportError, Result};
use fleet_core::models::CellValue;
use fleet_core::schema::Schema;
use tracing::{debug, warn};

use crate::reader::RawTable;

/// Column-oriented view of a source keyed by canonical (trimmed,
/// upper-cased) header names.
#[derive(Debug, Clone, Default)]
pub struct NormalizedTable {
    /// Canonical headers in source order, blanks removed.
    headers: Vec<String>,
    columns: HashMap<String, Vec<CellValue>>,
    row_count: usize,
}

impl NormalizedTable {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Values of column `name`; lookup canonicalises `name` the same way
    /// headers were.
    pub fn column(&self, name: &str) -> Option<&[CellValue]> {
        self.columns
            .get(&canonical_header(name))
            .map(|v| v.as_slice())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

/// Trim and upper-case a header so lookups ignore source casing and spacing.
pub fn canonical_header(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Promote the header row of `raw` and validate it against `schema`.
///
/// Rows whose absolute index is below `header_offset` are skipped, then fully
/// blank rows are dropped. The first remaining row becomes the header; the
/// rest are data. Fails with [`ReportError::MissingColumn`] on the first
/// required column that is absent.
pub fn normalize(raw: &RawTable, header_offset: usize, schema: &Schema) -> Result<NormalizedTable> {
    let mut rows = raw
        .rows
        .iter()
        .enumerate()
        .filter(|(i, _)| raw.first_row + i >= header_offset)
        .map(|(_, row)| row)
        .filter(|row| !row.iter().all(CellValue::is_blank));

    let header_row = rows.next().ok_or(ReportError::EmptySource { header_offset })?;

    // (column index, canonical name); blank and repeated headers are dropped.
    let mut header_slots: Vec<(usize, String)> = Vec::new();
    for (idx, cell) in header_row.iter().enumerate() {
        let Some(text) = cell.as_text() else {
            debug!("skipping blank header in column {}", idx);
            continue;
        };
        let name = canonical_header(&text);
        if header_slots.iter().any(|(_, existing)| existing == &name) {
            warn!("duplicate column '{}' ignored; first occurrence wins", name);
            continue;
        }
        header_slots.push((idx, name));
    }

    let headers: Vec<String> = header_slots.iter().map(|(_, name)| name.clone()).collect();

    for required in schema.required_columns() {
        if !headers.iter().any(|h| h == required) {
            return Err(ReportError::MissingColumn {
                column: required.to_string(),
                available: headers,
            });
        }
    }

    let mut columns: HashMap<String, Vec<CellValue>> = header_slots
        .iter()
        .map(|(_, name)| (name.clone(), Vec::new()))
        .collect();

    let mut row_count = 0usize;
    for row in rows {
        row_count += 1;
        for (idx, name) in &header_slots {
            let cell = row.get(*idx).cloned().unwrap_or_default();
            if let Some(values) = columns.get_mut(name) {
                values.push(cell);
            }
        }
    }

    debug!(
        "Normalized {} data rows across {} columns",
        row_count,
        headers.len()
    );

    Ok(NormalizedTable {
        headers,
        columns,
        row_count,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
