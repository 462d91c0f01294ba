use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the fleet maintenance report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The source file could not be opened at all.
    #[error("Failed to open source {path}: {reason}")]
    SourceOpen { path: PathBuf, reason: String },

    /// The source was opened but its contents could not be parsed.
    #[error("Failed to parse source {path}: {reason}")]
    SourceParse { path: PathBuf, reason: String },

    /// The workbook has no sheet with the requested name.
    #[error("Sheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    /// The file extension does not map to a supported reader.
    #[error("Unsupported source format: {0}")]
    UnsupportedFormat(PathBuf),

    /// No header row remained after skipping leading and empty rows.
    #[error("Source has no header row after skipping {header_offset} rows")]
    EmptySource { header_offset: usize },

    /// A required column is absent from the header row.
    #[error("Column '{column}' not found in source (found: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A category label is not one of the recognised values.
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    /// The process-wide dataset was initialised more than once.
    #[error("Dataset already loaded")]
    AlreadyLoaded,

    /// The process-wide dataset was queried before initialisation.
    #[error("Dataset not loaded")]
    NotLoaded,

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the fleet crates.
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_column_lists_available() {
        let err = ReportError::MissingColumn {
            column: "TYPE".to_string(),
            available: vec!["VEHICLE".to_string(), "DATE".to_string()],
        };
        let msg = err.to_string();
        assert_eq!(msg, "Column 'TYPE' not found in source (found: VEHICLE, DATE)");
    }

    #[test]
    fn test_error_display_sheet_not_found() {
        let err = ReportError::SheetNotFound {
            sheet: "Maintenance".to_string(),
            available: vec!["Sheet1".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Sheet 'Maintenance' not found (available: Sheet1)"
        );
    }

    #[test]
    fn test_error_display_source_open() {
        let err = ReportError::SourceOpen {
            path: PathBuf::from("/data/fleet.xlsx"),
            reason: "no such file".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to open source"));
        assert!(msg.contains("/data/fleet.xlsx"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_empty_source() {
        let err = ReportError::EmptySource { header_offset: 2 };
        assert_eq!(
            err.to_string(),
            "Source has no header row after skipping 2 rows"
        );
    }

    #[test]
    fn test_error_display_invalid_category() {
        let err = ReportError::InvalidCategory("MEDIUM".to_string());
        assert_eq!(err.to_string(), "Invalid category: MEDIUM");
    }

    #[test]
    fn test_error_display_already_loaded() {
        assert_eq!(ReportError::AlreadyLoaded.to_string(), "Dataset already loaded");
    }
}
