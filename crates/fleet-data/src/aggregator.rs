//! Spend aggregation by month, maintenance type and vehicle.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Display;

use fleet_core::formatting::format_currency;
use fleet_core::models::MaintenanceRecord;
use serde::{Deserialize, Serialize};

// ── AggregatedStats ───────────────────────────────────────────────────────────

/// Paid/saved sums and record count accumulated across records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedStats {
    pub amount_paid: f64,
    pub amount_saved: f64,
    pub count: u32,
}

impl AggregatedStats {
    /// Add a single record to the running totals.
    pub fn add_record(&mut self, record: &MaintenanceRecord) {
        self.amount_paid += record.amount_paid;
        self.amount_saved += record.amount_saved;
        self.count += 1;
    }
}

/// The totals triple shown as dashboard indicators.
pub type Totals = AggregatedStats;

// ── GroupKey / GroupRow ───────────────────────────────────────────────────────

/// Dimension a group-sum is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    /// Year-month bucket, e.g. `"JAN/24"`; undated records are skipped.
    Month,
    /// Maintenance type tag; untyped records are skipped.
    Type,
    /// `"<vehicle> / <plate>"`; records without a vehicle are skipped.
    Vehicle,
}

/// One group of a group-sum result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    pub key: String,
    pub amount_paid: f64,
    pub amount_saved: f64,
    pub count: u32,
    /// `amount_paid` rendered as currency with two decimals.
    pub amount_paid_text: String,
}

// ── MaintenanceAggregator ─────────────────────────────────────────────────────

/// Stateless helper that groups maintenance records.
pub struct MaintenanceAggregator;

impl MaintenanceAggregator {
    /// Sum paid and saved amounts per `key`.
    ///
    /// Equal keys merge into one row. Rows come back in a fixed order
    /// (chronological for months, lexical otherwise) so repeated calls are
    /// identical; callers wanting a ranking use [`Self::sort_by_paid_desc`].
    pub fn group_sum(
        records: &[&MaintenanceRecord],
        key: GroupKey,
        currency_symbol: &str,
    ) -> Vec<GroupRow> {
        let groups = match key {
            GroupKey::Month => Self::aggregate_by(records, |r| r.month_bucket()),
            GroupKey::Type => Self::aggregate_by(records, |r| r.kind.clone()),
            GroupKey::Vehicle => Self::aggregate_by(records, |r| r.vehicle_key()),
        };

        groups
            .into_iter()
            .map(|(key, stats)| GroupRow {
                key,
                amount_paid: stats.amount_paid,
                amount_saved: stats.amount_saved,
                count: stats.count,
                amount_paid_text: format_currency(stats.amount_paid, currency_symbol),
            })
            .collect()
    }

    /// Sum paid, sum saved and count over every record given.
    pub fn totals(records: &[&MaintenanceRecord]) -> Totals {
        let mut totals = Totals::default();
        for record in records {
            totals.add_record(*record);
        }
        totals
    }

    /// Order rows by amount paid, largest first; ties keep their key order.
    pub fn sort_by_paid_desc(rows: &mut [GroupRow]) {
        rows.sort_by(|a, b| {
            b.amount_paid
                .partial_cmp(&a.amount_paid)
                .unwrap_or(Ordering::Equal)
        });
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Generic aggregation driver. `key_fn` returns `None` for records that
    /// have no value for the grouping dimension.
    fn aggregate_by<K: Ord + Display>(
        records: &[&MaintenanceRecord],
        key_fn: impl Fn(&MaintenanceRecord) -> Option<K>,
    ) -> Vec<(String, AggregatedStats)> {
        let mut map: BTreeMap<K, AggregatedStats> = BTreeMap::new();

        for record in records {
            if let Some(key) = key_fn(*record) {
                map.entry(key).or_default().add_record(*record);
            }
        }

        map.into_iter()
            .map(|(key, stats)| (key.to_string(), stats))
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
