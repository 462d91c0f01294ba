//! Record filtering by category, date range and maintenance type.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use fleet_core::models::MaintenanceRecord;
use fleet_core::schema::Category;
use serde::{Deserialize, Serialize};

// ── DateRange ─────────────────────────────────────────────────────────────────

/// Inclusive date range. The range only filters once both bounds are set;
/// with either bound missing it accepts every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// `true` when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// `true` when both bounds are set and the range filters.
    pub fn is_active(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Whether a record dated `date` falls in the range. Undated records only
    /// pass an inactive range.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return true;
        };
        date.is_some_and(|date| date >= start && date <= end)
    }
}

// ── RecordFilter ────────────────────────────────────────────────────────────────

/// Which records a query should consider. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub category: Option<Category>,
    pub date_range: DateRange,
    /// Accepted type tags; empty accepts every type.
    pub types: BTreeSet<String>,
}

impl RecordFilter {
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn matches(&self, record: &MaintenanceRecord) -> bool {
        if let Some(category) = self.category {
            if record.category != Some(category) {
                return false;
            }
        }

        if !self.date_range.contains(record.date) {
            return false;
        }

        if !self.types.is_empty() {
            match record.kind.as_deref() {
                Some(kind) if self.types.contains(kind) => {}
                _ => return false,
            }
        }

        true
    }

    /// Borrow the matching records, preserving source order.
    pub fn apply<'a>(&self, records: &'a [MaintenanceRecord]) -> Vec<&'a MaintenanceRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
