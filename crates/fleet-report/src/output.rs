//! Plain-text and JSON rendering of view reports.

use std::fmt::Write as _;

use fleet_data::aggregator::GroupRow;
use fleet_runtime::views::{CategoryReport, Indicators, OverviewReport, ViewReport};

// ── Format ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> anyhow::Result<Self> {
        match name.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown output format '{}'", other),
        }
    }
}

pub fn render(
    report: &ViewReport,
    format: OutputFormat,
    currency_symbol: &str,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(match report {
            ViewReport::Overview(overview) => render_overview(overview, currency_symbol),
            ViewReport::Category(category) => render_category(category),
        }),
    }
}

// ── Text ──────────────────────────────────────────────────────────────────────

fn render_overview(report: &OverviewReport, currency_symbol: &str) -> String {
    let mut out = String::new();

    out.push_str("MONTHLY EVOLUTION\n");
    let monthly: Vec<[String; 3]> = report
        .monthly
        .iter()
        .map(|row| {
            [
                row.key.clone(),
                row.amount_paid_text.clone(),
                fleet_core::formatting::format_currency(row.amount_saved, currency_symbol),
            ]
        })
        .collect();
    write_table(&mut out, ["MONTH", "PAID", "SAVED"], &monthly);

    out.push_str("\nDISTRIBUTION BY TYPE\n");
    let by_type: Vec<[String; 3]> = report
        .by_type
        .iter()
        .map(|share| {
            [
                share.row.key.clone(),
                share.row.amount_paid_text.clone(),
                format!("{:.1}%", share.share_percent),
            ]
        })
        .collect();
    write_table(&mut out, ["TYPE", "PAID", "SHARE"], &by_type);

    out.push('\n');
    write_indicators(&mut out, &report.indicators);
    out
}

fn render_category(report: &CategoryReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", report.label);
    let _ = writeln!(out, "{}", report.title);
    if let (Some(start), Some(end)) = (
        report.options.default_range.start,
        report.options.default_range.end,
    ) {
        let _ = writeln!(out, "Available dates: {} to {}", start, end);
    }
    if !report.options.types.is_empty() {
        let _ = writeln!(out, "Available types: {}", report.options.types.join(", "));
    }
    out.push('\n');

    let rows: Vec<[String; 3]> = report.by_vehicle.iter().map(vehicle_cells).collect();
    write_table(&mut out, ["VEHICLE", "PAID", "COUNT"], &rows);

    out.push('\n');
    write_indicators(&mut out, &report.indicators);
    out
}

fn vehicle_cells(row: &GroupRow) -> [String; 3] {
    [
        row.key.clone(),
        row.amount_paid_text.clone(),
        row.count.to_string(),
    ]
}

fn write_indicators(out: &mut String, indicators: &Indicators) {
    let _ = writeln!(out, "Amount paid: {}", indicators.amount_paid_text);
    let _ = writeln!(out, "Amount saved: {}", indicators.amount_saved_text);
    let _ = writeln!(out, "Maintenance count: {}", indicators.totals.count);
}

/// Left-aligned first column, right-aligned amounts.
fn write_table(out: &mut String, headers: [&str; 3], rows: &[[String; 3]]) {
    if rows.is_empty() {
        out.push_str("(no data)\n");
        return;
    }

    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let _ = writeln!(
        out,
        "{:<w0$}  {:>w1$}  {:>w2$}",
        headers[0],
        headers[1],
        headers[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2]
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<w0$}  {:>w1$}  {:>w2$}",
            row[0],
            row[1],
            row[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fleet_core::models::MaintenanceRecord;
    use fleet_core::schema::{Category, Schema};
    use fleet_data::analysis::Dataset;
    use fleet_runtime::views::{build_view, CategoryQuery, View};

    fn dataset() -> Dataset {
        let record = |vehicle: &str, category, kind: &str, paid, day| MaintenanceRecord {
            vehicle: Some(vehicle.to_string()),
            plate: Some("ABC1234".to_string()),
            category: Some(category),
            kind: Some(kind.to_string()),
            amount_paid: paid,
            amount_saved: 0.0,
            date: NaiveDate::from_ymd_opt(2024, 1, day),
        };
        Dataset::from_records(
            vec![
                record("STRADA", Category::Light, "TIRE", 1234.5, 5),
                record("ACTROS", Category::Heavy, "OIL", 100.0, 8),
            ],
            Schema::english(),
        )
    }

    fn report(view: View) -> ViewReport {
        build_view(&dataset(), view, &CategoryQuery::default(), "R$")
    }

    #[test]
    fn test_output_format_from_name() {
        assert_eq!(OutputFormat::from_name("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_name("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_name("html").is_err());
    }

    #[test]
    fn test_render_overview_text() {
        let text = render(&report(View::Overview), OutputFormat::Text, "R$").unwrap();
        assert!(text.contains("MONTHLY EVOLUTION"));
        assert!(text.contains("JAN/24"));
        assert!(text.contains("Amount paid: R$ 1,334.50"));
        assert!(text.contains("Maintenance count: 2"));
    }

    #[test]
    fn test_render_category_text() {
        let text = render(
            &report(View::Category(Category::Light)),
            OutputFormat::Text,
            "R$",
        )
        .unwrap();
        assert!(text.starts_with("Light fleet\nVEHICLES - spend per vehicle (LIGHT)"));
        assert!(text.contains("STRADA / ABC1234"));
        assert!(!text.contains("ACTROS"));
        assert!(text.contains("Available types: TIRE"));
        assert!(text.contains("Amount paid: R$ 1,234.50"));
    }

    #[test]
    fn test_render_empty_table() {
        let empty = Dataset::from_records(Vec::new(), Schema::english());
        let report = build_view(
            &empty,
            View::Category(Category::Heavy),
            &CategoryQuery::default(),
            "R$",
        );
        let text = render(&report, OutputFormat::Text, "R$").unwrap();
        assert!(text.contains("(no data)"));
        assert!(text.contains("Maintenance count: 0"));
    }

    #[test]
    fn test_render_json() {
        let json = render(
            &report(View::Category(Category::Heavy)),
            OutputFormat::Json,
            "R$",
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["category"], "heavy");
        assert_eq!(value["x_tick_angle"], -45);
        assert_eq!(value["label"], "Heavy fleet");
        assert_eq!(value["by_vehicle"][0]["key"], "ACTROS / ABC1234");
        assert_eq!(value["indicators"]["totals"]["count"], 1);
    }
}
