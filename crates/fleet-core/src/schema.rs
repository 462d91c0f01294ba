use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Category ──────────────────────────────────────────────────────────────────

/// Fleet classification of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Cars, vans and pickups.
    Light,
    /// Trucks and machinery.
    Heavy,
}

impl Category {
    /// Every category, in dispatch-table order.
    pub const ALL: [Category; 2] = [Category::Light, Category::Heavy];

    /// Position of this category in [`Category::ALL`].
    pub fn index(self) -> usize {
        match self {
            Category::Light => 0,
            Category::Heavy => 1,
        }
    }

    /// The canonical lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Light => "light",
            Category::Heavy => "heavy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

impl FromStr for Category {
    type Err = ReportError;

    /// Case-insensitive; accepts the identifiers of every schema preset.
    fn from_str(value: &str) -> Result<Self> {
        let upper = value.trim().to_uppercase();
        for preset in SchemaPreset::ALL {
            if let Some(category) = preset.schema().match_category(&upper) {
                return Ok(category);
            }
        }
        Err(ReportError::InvalidCategory(value.to_string()))
    }
}

// ── Schema ────────────────────────────────────────────────────────────────────

/// Canonical (upper-cased) header names and category labels of a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub vehicle: &'static str,
    pub amount_paid: &'static str,
    pub amount_saved: &'static str,
    pub kind: &'static str,
    pub category: &'static str,
    pub date: &'static str,
    pub plate: &'static str,
    /// Cell value identifying [`Category::Light`].
    pub light_label: &'static str,
    /// Cell value identifying [`Category::Heavy`].
    pub heavy_label: &'static str,
}

impl Schema {
    pub const fn english() -> Self {
        Self {
            vehicle: "VEHICLE",
            amount_paid: "AMOUNT PAID",
            amount_saved: "AMOUNT SAVED",
            kind: "TYPE",
            category: "CATEGORY",
            date: "DATE",
            plate: "PLATE",
            light_label: "LIGHT",
            heavy_label: "HEAVY",
        }
    }

    /// Headers of the Brazilian maintenance workbook.
    pub const fn portuguese() -> Self {
        Self {
            vehicle: "VEÍCULOS",
            amount_paid: "VALOR PAGO",
            amount_saved: "VALOR ECONOMIZADO",
            kind: "TIPO",
            category: "CATEGORIA",
            date: "DATA",
            plate: "PLACA",
            light_label: "LEVE",
            heavy_label: "PESADA",
        }
    }

    /// Columns that must all be present in the header row, in check order.
    pub fn required_columns(&self) -> [&'static str; 7] {
        [
            self.vehicle,
            self.amount_paid,
            self.amount_saved,
            self.kind,
            self.category,
            self.date,
            self.plate,
        ]
    }

    /// Map a cell value to a category. Exact match against the upper-cased,
    /// trimmed label; anything else is `None`.
    pub fn match_category(&self, value: &str) -> Option<Category> {
        let label = value.trim().to_uppercase();
        if label == self.light_label {
            Some(Category::Light)
        } else if label == self.heavy_label {
            Some(Category::Heavy)
        } else {
            None
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::english()
    }
}

// ── SchemaPreset ──────────────────────────────────────────────────────────────

/// Named schema presets selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaPreset {
    English,
    Portuguese,
}

impl SchemaPreset {
    pub const ALL: [SchemaPreset; 2] = [SchemaPreset::English, SchemaPreset::Portuguese];

    pub fn schema(self) -> Schema {
        match self {
            SchemaPreset::English => Schema::english(),
            SchemaPreset::Portuguese => Schema::portuguese(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaPreset::English => "english",
            SchemaPreset::Portuguese => "portuguese",
        }
    }
}

impl FromStr for SchemaPreset {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "english" | "en" => Ok(SchemaPreset::English),
            "portuguese" | "pt" => Ok(SchemaPreset::Portuguese),
            other => Err(ReportError::Config(format!("unknown schema: {}", other))),
        }
    }
}
