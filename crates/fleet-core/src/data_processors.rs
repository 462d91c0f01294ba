use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::models::CellValue;
use crate::schema::{Category, Schema};
use crate::time_utils::parse_date;

// ── AmountProcessor ───────────────────────────────────────────────────────────

/// Coerces currency cells into non-negative finite amounts.
pub struct AmountProcessor;

impl AmountProcessor {
    /// Numbers pass through; text is parsed after trimming. Anything that is
    /// unparseable, negative, NaN or infinite becomes `0.0`.
    pub fn coerce(cell: &CellValue) -> f64 {
        let value = match cell {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => n,
                Err(_) => {
                    if !s.trim().is_empty() {
                        debug!("coercing non-numeric amount \"{}\" to 0", s);
                    }
                    0.0
                }
            },
            CellValue::Empty | CellValue::Date(_) => 0.0,
        };

        if value.is_finite() && value >= 0.0 {
            value
        } else {
            debug!("coercing out-of-range amount {} to 0", value);
            0.0
        }
    }
}

// ── DateProcessor ─────────────────────────────────────────────────────────────

/// Largest serial number Excel accepts (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Coerces date cells; failures become `None` rather than errors.
pub struct DateProcessor;

impl DateProcessor {
    pub fn coerce(cell: &CellValue) -> Option<NaiveDate> {
        match cell {
            CellValue::Date(d) => Some(*d),
            CellValue::Text(s) => parse_date(s),
            CellValue::Number(n) => Self::from_excel_serial(*n),
            CellValue::Empty => None,
        }
    }

    /// Convert an Excel serial day number (1900 date system) to a date.
    pub fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
        if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
            return None;
        }
        // Serial 60 is the phantom 1900-02-29; the epoch below absorbs it
        // for every later serial.
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
        let days = serial.trunc() as i64;
        let days = if days < 60 { days + 1 } else { days };
        epoch.checked_add_signed(Duration::days(days))
    }
}

// ── DataConverter ─────────────────────────────────────────────────────────────

/// Miscellaneous cell conversions that depend on the source schema.
pub struct DataConverter;

impl DataConverter {
    /// Trimmed text of a cell, `None` when blank.
    pub fn text(cell: &CellValue) -> Option<String> {
        cell.as_text()
    }

    /// Resolve a category cell against the schema labels.
    pub fn category(cell: &CellValue, schema: &Schema) -> Option<Category> {
        let label = cell.as_text()?;
        let category = schema.match_category(&label);
        if category.is_none() {
            debug!("unrecognised category label \"{}\"", label);
        }
        category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    // ── AmountProcessor ──────────────────────────────────────────────────────

    #[test]
    fn test_amount_number_passthrough() {
        assert_eq!(AmountProcessor::coerce(&CellValue::Number(123.45)), 123.45);
    }

    #[test]
    fn test_amount_text_parsed() {
        assert_eq!(AmountProcessor::coerce(&text(" 50.5 ")), 50.5);
    }

    #[test]
    fn test_amount_malformed_is_zero() {
        assert_eq!(AmountProcessor::coerce(&text("R$ 12,00")), 0.0);
        assert_eq!(AmountProcessor::coerce(&text("abc")), 0.0);
        assert_eq!(AmountProcessor::coerce(&CellValue::Empty), 0.0);
        assert_eq!(AmountProcessor::coerce(&text("NaN")), 0.0);
        assert_eq!(AmountProcessor::coerce(&text("inf")), 0.0);
    }

    #[test]
    fn test_amount_negative_is_zero() {
        assert_eq!(AmountProcessor::coerce(&CellValue::Number(-10.0)), 0.0);
        assert_eq!(AmountProcessor::coerce(&text("-3")), 0.0);
    }

    #[test]
    fn test_amount_never_negative() {
        let cells = [
            CellValue::Number(-0.01),
            CellValue::Number(f64::NEG_INFINITY),
            CellValue::Number(f64::NAN),
            text("-1e9"),
            text(""),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            CellValue::Number(7.0),
        ];
        for cell in &cells {
            let v = AmountProcessor::coerce(cell);
            assert!(v.is_finite() && v >= 0.0, "{:?} -> {}", cell, v);
        }
    }

    // ── DateProcessor ────────────────────────────────────────────────────────

    #[test]
    fn test_date_cell_passthrough() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(DateProcessor::coerce(&CellValue::Date(d)), Some(d));
    }

    #[test]
    fn test_date_text_parsed() {
        assert_eq!(
            DateProcessor::coerce(&text("2024-01-20")),
            NaiveDate::from_ymd_opt(2024, 1, 20)
        );
    }

    #[test]
    fn test_date_invalid_text_is_none() {
        assert_eq!(DateProcessor::coerce(&text("sometime")), None);
        assert_eq!(DateProcessor::coerce(&CellValue::Empty), None);
    }

    #[test]
    fn test_date_excel_serial() {
        // 45296 is 2024-01-05 in the 1900 date system.
        assert_eq!(
            DateProcessor::coerce(&CellValue::Number(45296.0)),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(
            DateProcessor::from_excel_serial(1.0),
            NaiveDate::from_ymd_opt(1900, 1, 1)
        );
        assert_eq!(DateProcessor::from_excel_serial(0.0), None);
        assert_eq!(DateProcessor::from_excel_serial(-5.0), None);
    }

    // ── DataConverter ────────────────────────────────────────────────────────

    #[test]
    fn test_category_conversion() {
        let schema = Schema::english();
        assert_eq!(
            DataConverter::category(&text("light"), &schema),
            Some(Category::Light)
        );
        assert_eq!(DataConverter::category(&text("MEDIUM"), &schema), None);
        assert_eq!(DataConverter::category(&CellValue::Empty, &schema), None);
    }

    #[test]
    fn test_text_conversion() {
        assert_eq!(DataConverter::text(&text(" TIRE ")).as_deref(), Some("TIRE"));
        assert_eq!(DataConverter::text(&CellValue::Empty), None);
    }
}
