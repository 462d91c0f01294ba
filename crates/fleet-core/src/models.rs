use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schema::Category;
use crate::time_utils::MonthBucket;

/// Rendered in place of a missing plate in the vehicle display key.
pub const MISSING_PLATE: &str = "N/A";

/// Separator between vehicle name and plate in the display key.
pub const VEHICLE_KEY_SEPARATOR: &str = " / ";

/// A single cell as read from a spreadsheet or CSV source.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl CellValue {
    /// `true` for empty cells and cells holding only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Textual form of the cell, `None` when blank.
    ///
    /// Integral numbers drop their fractional part so a numeric plate such
    /// as `1234.0` renders as `"1234"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// One maintenance event, typed and coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    /// Vehicle model / name.
    pub vehicle: Option<String>,
    /// License plate.
    pub plate: Option<String>,
    /// `None` when the source label matched no known category.
    pub category: Option<Category>,
    /// Free-form maintenance tag, e.g. `"TIRE"`.
    pub kind: Option<String>,
    /// Always finite and non-negative.
    pub amount_paid: f64,
    /// Always finite and non-negative.
    pub amount_saved: f64,
    pub date: Option<NaiveDate>,
}

impl MaintenanceRecord {
    /// Year-month grouping key, absent for undated records.
    pub fn month_bucket(&self) -> Option<MonthBucket> {
        self.date.map(MonthBucket::from_date)
    }

    /// `"<vehicle> / <plate>"`, absent when the vehicle name is missing.
    pub fn vehicle_key(&self) -> Option<String> {
        let vehicle = self.vehicle.as_deref()?;
        let plate = self.plate.as_deref().unwrap_or(MISSING_PLATE);
        Some(format!("{}{}{}", vehicle, VEHICLE_KEY_SEPARATOR, plate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MaintenanceRecord {
        MaintenanceRecord {
            vehicle: Some("STRADA".to_string()),
            plate: Some("ABC1D23".to_string()),
            category: Some(Category::Light),
            kind: Some("TIRE".to_string()),
            amount_paid: 100.0,
            amount_saved: 10.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 5),
        }
    }

    #[test]
    fn test_vehicle_key_with_plate() {
        assert_eq!(record().vehicle_key().as_deref(), Some("STRADA / ABC1D23"));
    }

    #[test]
    fn test_vehicle_key_missing_plate_uses_placeholder() {
        let r = MaintenanceRecord {
            plate: None,
            ..record()
        };
        assert_eq!(r.vehicle_key().as_deref(), Some("STRADA / N/A"));
    }

    #[test]
    fn test_vehicle_key_missing_vehicle() {
        let r = MaintenanceRecord {
            vehicle: None,
            ..record()
        };
        assert!(r.vehicle_key().is_none());
    }

    #[test]
    fn test_month_bucket_absent_without_date() {
        let r = MaintenanceRecord {
            date: None,
            ..record()
        };
        assert!(r.month_bucket().is_none());
        assert_eq!(record().month_bucket().unwrap().to_string(), "JAN/24");
    }

    #[test]
    fn test_cell_as_text() {
        assert_eq!(CellValue::Empty.as_text(), None);
        assert_eq!(CellValue::Text("  ".into()).as_text(), None);
        assert_eq!(CellValue::Text(" abc ".into()).as_text().as_deref(), Some("abc"));
        assert_eq!(CellValue::Number(1234.0).as_text().as_deref(), Some("1234"));
        assert_eq!(CellValue::Number(12.5).as_text().as_deref(), Some("12.5"));
    }

    #[test]
    fn test_cell_is_blank() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text(" \t".into()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }
}
