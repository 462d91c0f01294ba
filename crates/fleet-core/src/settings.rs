use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::formatting::DEFAULT_CURRENCY_SYMBOL;

/// Sheet name used by the Brazilian maintenance workbook.
pub const DEFAULT_SHEET: &str = "MANUTENÇÃO POR VEÍCULO";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Maintenance spend reports from a fleet spreadsheet
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fleet-report",
    about = "Maintenance spend reports from a fleet spreadsheet",
    version
)]
pub struct Settings {
    /// Spreadsheet (.xlsx, .xlsm, .xls, .ods) or CSV file to load
    #[arg(long, env = "FLEET_REPORT_SOURCE")]
    pub source: PathBuf,

    /// Worksheet name (ignored for CSV sources)
    #[arg(long, default_value = DEFAULT_SHEET)]
    pub sheet: String,

    /// Leading rows to skip before the header row
    #[arg(long, default_value = "2")]
    pub header_offset: usize,

    /// Column naming scheme of the source
    #[arg(long, default_value = "english", value_parser = ["english", "portuguese"])]
    pub schema: String,

    /// Report view
    #[arg(long, default_value = "overview", value_parser = ["overview", "light", "heavy"])]
    pub view: String,

    /// Earliest date to include (YYYY-MM-DD), category views only
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Latest date to include (YYYY-MM-DD), category views only
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Maintenance type to include; repeat for several (category views only)
    #[arg(long = "type")]
    pub types: Vec<String>,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Currency symbol for rendered amounts
    #[arg(long, default_value = DEFAULT_CURRENCY_SYMBOL)]
    pub currency_symbol: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,

    /// Problems met while reading or saving last-used parameters. Collected
    /// here because logging is not installed until settings are known.
    #[arg(skip)]
    pub warnings: Vec<String>,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.fleet-report/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".fleet-report").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with an explicit argument
    /// list and config path.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                settings
                    .warnings
                    .push(format!("could not clear {}: {}", config_path.display(), e));
            }
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins; clap reports arg ids by field name.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "schema") {
            if let Some(v) = last.schema {
                settings.schema = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "currency_symbol") {
            if let Some(v) = last.currency_symbol {
                settings.currency_symbol = v;
            }
        }

        settings = Self::apply_debug_flag(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            settings.warnings.push(format!(
                "could not persist settings to {}: {}",
                config_path.display(),
                e
            ));
        }

        settings
    }

    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            view: Some(s.view.clone()),
            schema: Some(s.schema.clone()),
            format: Some(s.format.clone()),
            currency_symbol: Some(s.currency_symbol.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
