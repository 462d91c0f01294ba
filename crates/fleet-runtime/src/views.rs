//! Report views over the loaded dataset.
//!
//! The overview covers every record; category views are looked up in
//! [`CATEGORY_VIEWS`], indexed by [`Category::index`], and all share
//! [`build_category_report`].

use std::collections::BTreeSet;
use std::str::FromStr;

use fleet_core::error::{ReportError, Result};
use fleet_core::formatting::{format_currency, percentage};
use fleet_core::schema::Category;
use fleet_data::aggregator::{GroupKey, GroupRow, MaintenanceAggregator, Totals};
use fleet_data::analysis::Dataset;
use fleet_data::filter::{DateRange, RecordFilter};
use serde::Serialize;

// ── View ──────────────────────────────────────────────────────────────────────

/// Which report to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "category")]
pub enum View {
    Overview,
    Category(Category),
}

impl FromStr for View {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self> {
        if value.trim().eq_ignore_ascii_case("overview") {
            return Ok(View::Overview);
        }
        Category::from_str(value).map(View::Category)
    }
}

// ── Report types ──────────────────────────────────────────────────────────────

/// Totals rendered for indicator text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicators {
    pub totals: Totals,
    pub amount_paid_text: String,
    pub amount_saved_text: String,
}

impl Indicators {
    pub fn from_totals(totals: Totals, currency_symbol: &str) -> Self {
        Self {
            totals,
            amount_paid_text: format_currency(totals.amount_paid, currency_symbol),
            amount_saved_text: format_currency(totals.amount_saved, currency_symbol),
        }
    }
}

/// A type group together with its share of the total paid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeShare {
    #[serde(flatten)]
    pub row: GroupRow,
    pub share_percent: f64,
}

/// Monthly evolution and distribution by type over all records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewReport {
    pub monthly: Vec<GroupRow>,
    pub by_type: Vec<TypeShare>,
    pub indicators: Indicators,
}

/// Choices that pre-populate a category view's filter controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Distinct type tags present in the category, sorted.
    pub types: Vec<String>,
    /// Earliest and latest dated record of the category.
    pub default_range: DateRange,
}

/// User-controlled part of a category query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryQuery {
    pub date_range: DateRange,
    pub types: BTreeSet<String>,
}

/// Per-vehicle spend for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    pub category: Category,
    /// Heading of the view, from [`CategoryView::label`].
    pub label: &'static str,
    pub title: String,
    /// Tick label rotation for the vehicle axis, in degrees.
    pub x_tick_angle: i32,
    pub filter: RecordFilter,
    /// Sorted by amount paid, largest first.
    pub by_vehicle: Vec<GroupRow>,
    pub indicators: Indicators,
    pub options: FilterOptions,
}

/// Output of [`build_view`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewReport {
    Overview(OverviewReport),
    Category(CategoryReport),
}

// ── Category dispatch table ───────────────────────────────────────────────────

/// Static description of one category view.
pub struct CategoryView {
    pub category: Category,
    pub label: &'static str,
    pub x_tick_angle: i32,
    pub build: fn(&Dataset, &CategoryView, &CategoryQuery, &str) -> CategoryReport,
}

/// One entry per [`Category`], at [`Category::index`].
pub static CATEGORY_VIEWS: [CategoryView; 2] = [
    CategoryView {
        category: Category::Light,
        label: "Light fleet",
        x_tick_angle: 0,
        build: build_category_report,
    },
    CategoryView {
        category: Category::Heavy,
        label: "Heavy fleet",
        x_tick_angle: -45,
        build: build_category_report,
    },
];

pub fn category_view(category: Category) -> &'static CategoryView {
    &CATEGORY_VIEWS[category.index()]
}

// ── Builders ──────────────────────────────────────────────────────────────────

/// Build `view`. `query` applies to category views only.
pub fn build_view(
    dataset: &Dataset,
    view: View,
    query: &CategoryQuery,
    currency_symbol: &str,
) -> ViewReport {
    match view {
        View::Overview => ViewReport::Overview(build_overview(dataset, currency_symbol)),
        View::Category(category) => {
            let entry = category_view(category);
            ViewReport::Category((entry.build)(dataset, entry, query, currency_symbol))
        }
    }
}

/// Monthly paid/saved, spend by type and overall totals. Records whose
/// category is unrecognised are included.
pub fn build_overview(dataset: &Dataset, currency_symbol: &str) -> OverviewReport {
    let all = RecordFilter::default().apply(dataset.records());

    let monthly = MaintenanceAggregator::group_sum(&all, GroupKey::Month, currency_symbol);
    let totals = MaintenanceAggregator::totals(&all);

    let by_type = MaintenanceAggregator::group_sum(&all, GroupKey::Type, currency_symbol)
        .into_iter()
        .map(|row| TypeShare {
            share_percent: percentage(row.amount_paid, totals.amount_paid, 1),
            row,
        })
        .collect();

    tracing::debug!(records = all.len(), "built overview");

    OverviewReport {
        monthly,
        by_type,
        indicators: Indicators::from_totals(totals, currency_symbol),
    }
}

/// Filter to `view.category`, then the query's date range and types, and
/// sum spend per vehicle.
pub fn build_category_report(
    dataset: &Dataset,
    view: &CategoryView,
    query: &CategoryQuery,
    currency_symbol: &str,
) -> CategoryReport {
    let filter = RecordFilter::default()
        .with_category(view.category)
        .with_date_range(query.date_range)
        .with_types(query.types.iter().cloned());
    let records = filter.apply(dataset.records());

    let mut by_vehicle =
        MaintenanceAggregator::group_sum(&records, GroupKey::Vehicle, currency_symbol);
    MaintenanceAggregator::sort_by_paid_desc(&mut by_vehicle);

    let totals = MaintenanceAggregator::totals(&records);

    tracing::debug!(
        category = %view.category,
        records = records.len(),
        vehicles = by_vehicle.len(),
        "built category report"
    );

    CategoryReport {
        category: view.category,
        label: view.label,
        title: format!("VEHICLES - spend per vehicle ({})", view.category),
        x_tick_angle: view.x_tick_angle,
        filter,
        by_vehicle,
        indicators: Indicators::from_totals(totals, currency_symbol),
        options: filter_options(dataset, view.category),
    }
}

/// Type choices and default date range for a category's filter controls.
pub fn filter_options(dataset: &Dataset, category: Category) -> FilterOptions {
    let records = RecordFilter::default()
        .with_category(category)
        .apply(dataset.records());

    let types: BTreeSet<String> = records.iter().filter_map(|r| r.kind.clone()).collect();
    let dates = records.iter().filter_map(|r| r.date);

    FilterOptions {
        types: types.into_iter().collect(),
        default_range: DateRange::new(dates.clone().min(), dates.max()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
