mod bootstrap;
mod output;

use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::{Context, Result};
use fleet_core::schema::SchemaPreset;
use fleet_core::settings::Settings;
use fleet_data::analysis::LoadOptions;
use fleet_data::filter::DateRange;
use fleet_runtime::store;
use fleet_runtime::views::{build_view, CategoryQuery, View};

use crate::output::OutputFormat;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level)?;

    for warning in &settings.warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!("Fleet report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Source: {}, Schema: {}, View: {}",
        settings.source.display(),
        settings.schema,
        settings.view
    );

    if let Err(e) = run(&settings) {
        tracing::error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run(settings: &Settings) -> Result<()> {
    let preset = SchemaPreset::from_str(&settings.schema)?;
    let view = View::from_str(&settings.view)?;
    let format = OutputFormat::from_name(&settings.format)?;

    let options = LoadOptions {
        path: settings.source.clone(),
        sheet: settings.sheet.clone(),
        header_offset: settings.header_offset,
        schema: preset.schema(),
    };
    let dataset = store::load(&options)
        .with_context(|| format!("failed to load {}", settings.source.display()))?;

    let date_range = DateRange::new(settings.start, settings.end);
    if view == View::Overview && !date_range.is_unbounded() {
        tracing::warn!("date range is ignored by the overview");
    } else if !date_range.is_unbounded() && !date_range.is_active() {
        tracing::warn!("date range needs both --start and --end; showing all dates");
    }

    let query = CategoryQuery {
        date_range,
        types: settings.types.iter().cloned().collect::<BTreeSet<_>>(),
    };

    let report = build_view(dataset, view, &query, &settings.currency_symbol);
    println!("{}", output::render(&report, format, &settings.currency_symbol)?);

    Ok(())
}
