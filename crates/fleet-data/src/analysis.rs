//! Load pipeline: read, normalize, coerce.
//!
//! Produces the immutable [`Dataset`] every query runs against.

use std::path::PathBuf;
use std::time::Instant;

use fleet_core::data_processors::{AmountProcessor, DataConverter, DateProcessor};
use fleet_core::error::Result;
use fleet_core::models::{CellValue, MaintenanceRecord};
use fleet_core::schema::Schema;
use serde::Serialize;
use tracing::{debug, info};

use crate::normalizer::{normalize, NormalizedTable};
use crate::reader::read_source;

// ── Public types ──────────────────────────────────────────────────────────────

/// Where and how to load the source.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub path: PathBuf,
    /// Worksheet name; ignored for CSV.
    pub sheet: String,
    /// Leading rows to skip before the header row.
    pub header_offset: usize,
    pub schema: Schema,
}

/// Counters gathered while loading.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadMetadata {
    pub source: PathBuf,
    pub rows_loaded: usize,
    /// Rows whose date was missing or unparseable.
    pub undated_rows: usize,
    /// Rows whose category matched neither label.
    pub uncategorized_rows: usize,
    pub load_time_seconds: f64,
}

/// The full record set, read-only once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<MaintenanceRecord>,
    schema: Schema,
    metadata: LoadMetadata,
}

impl Dataset {
    /// Wrap already-typed records.
    pub fn from_records(records: Vec<MaintenanceRecord>, schema: Schema) -> Self {
        let metadata = LoadMetadata {
            rows_loaded: records.len(),
            undated_rows: records.iter().filter(|r| r.date.is_none()).count(),
            uncategorized_rows: records.iter().filter(|r| r.category.is_none()).count(),
            ..LoadMetadata::default()
        };
        Self {
            records,
            schema,
            metadata,
        }
    }

    pub fn records(&self) -> &[MaintenanceRecord] {
        &self.records
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn metadata(&self) -> &LoadMetadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full load pipeline.
///
/// 1. Read the raw sheet or CSV.
/// 2. Promote headers and check the required columns.
/// 3. Coerce each row into a [`MaintenanceRecord`].
///
/// Any failure in steps 1 and 2 is fatal; step 3 never fails.
pub fn load_dataset(options: &LoadOptions) -> Result<Dataset> {
    let started = Instant::now();

    let raw = read_source(&options.path, &options.sheet)?;
    let table = normalize(&raw, options.header_offset, &options.schema)?;
    let records = build_records(&table, &options.schema);

    let mut dataset = Dataset::from_records(records, options.schema.clone());
    dataset.metadata.source = options.path.clone();
    dataset.metadata.load_time_seconds = started.elapsed().as_secs_f64();

    info!(
        "Loaded {} maintenance records from {} ({} undated, {} uncategorized)",
        dataset.metadata.rows_loaded,
        options.path.display(),
        dataset.metadata.undated_rows,
        dataset.metadata.uncategorized_rows
    );

    Ok(dataset)
}

/// Coerce every row of a validated table into typed records.
pub fn build_records(table: &NormalizedTable, schema: &Schema) -> Vec<MaintenanceRecord> {
    let column = |name: &str| table.column(name).unwrap_or(&[]);

    let vehicles = column(schema.vehicle);
    let paid = column(schema.amount_paid);
    let saved = column(schema.amount_saved);
    let kinds = column(schema.kind);
    let categories = column(schema.category);
    let dates = column(schema.date);
    let plates = column(schema.plate);

    let empty = CellValue::Empty;
    let cell = |values: &[CellValue], i: usize| values.get(i).unwrap_or(&empty).clone();

    let records: Vec<MaintenanceRecord> = (0..table.row_count())
        .map(|i| MaintenanceRecord {
            vehicle: DataConverter::text(&cell(vehicles, i)),
            plate: DataConverter::text(&cell(plates, i)),
            category: DataConverter::category(&cell(categories, i), schema),
            kind: DataConverter::text(&cell(kinds, i)),
            amount_paid: AmountProcessor::coerce(&cell(paid, i)),
            amount_saved: AmountProcessor::coerce(&cell(saved, i)),
            date: DateProcessor::coerce(&cell(dates, i)),
        })
        .collect();

    debug!("Built {} records", records.len());
    records
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fleet_core::error::ReportError;
    use fleet_core::schema::Category;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;

    const HEADER: &str = "VEHICLE,AMOUNT PAID,AMOUNT SAVED,TYPE,CATEGORY,DATE,PLATE";

    fn write_csv(dir: &Path, lines: &[&str]) -> PathBuf {
        let path = dir.join("fleet.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn options(path: PathBuf, header_offset: usize) -> LoadOptions {
        LoadOptions {
            path,
            sheet: String::new(),
            header_offset,
            schema: Schema::english(),
        }
    }

    #[test]
    fn test_load_dataset_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            &[
                "Fleet maintenance",
                ",",
                HEADER,
                "STRADA,100,10,TIRE,LIGHT,2024-01-05,ABC1234",
                "ACTROS,2500.5,0,INSPECTION,HEAVY,20/01/2024,XYZ9876",
            ],
        );

        let dataset = load_dataset(&options(path, 2)).unwrap();
        assert_eq!(dataset.len(), 2);

        let first = &dataset.records()[0];
        assert_eq!(first.vehicle.as_deref(), Some("STRADA"));
        assert_eq!(first.category, Some(Category::Light));
        assert_eq!(first.amount_paid, 100.0);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 5));

        let second = &dataset.records()[1];
        assert_eq!(second.category, Some(Category::Heavy));
        assert_eq!(second.date, NaiveDate::from_ymd_opt(2024, 1, 20));
        assert_eq!(second.vehicle_key().as_deref(), Some("ACTROS / XYZ9876"));
    }

    #[test]
    fn test_load_dataset_blank_line_counts_toward_offset() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            &[
                "Fleet maintenance",
                "",
                HEADER,
                "STRADA,100,10,TIRE,LIGHT,2024-01-05,ABC",
                "GOL,50,0,OIL,LIGHT,2024-01-20,DEF",
            ],
        );

        let dataset = load_dataset(&options(path, 2)).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].vehicle.as_deref(), Some("STRADA"));
        assert_eq!(dataset.records()[1].amount_paid, 50.0);
    }

    #[test]
    fn test_load_dataset_coerces_malformed_cells() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            &[
                HEADER,
                "STRADA,abc,-5,TIRE,light,not a date,",
                "GOL,,,OIL,MEDIUM,,",
            ],
        );

        let dataset = load_dataset(&options(path, 0)).unwrap();
        assert_eq!(dataset.len(), 2);
        for record in dataset.records() {
            assert!(record.amount_paid >= 0.0);
            assert!(record.amount_saved >= 0.0);
            assert!(record.date.is_none());
            assert!(record.plate.is_none());
        }
        assert_eq!(dataset.records()[0].category, Some(Category::Light));
        assert_eq!(dataset.records()[1].category, None);
        assert_eq!(dataset.metadata().undated_rows, 2);
        assert_eq!(dataset.metadata().uncategorized_rows, 1);
    }

    #[test]
    fn test_load_dataset_missing_type_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            &[
                "VEHICLE,AMOUNT PAID,AMOUNT SAVED,CATEGORY,DATE,PLATE",
                "STRADA,100,0,LIGHT,2024-01-05,ABC",
            ],
        );

        let err = load_dataset(&options(path, 0)).unwrap_err();
        match err {
            ReportError::MissingColumn { column, available } => {
                assert_eq!(column, "TYPE");
                assert!(available.contains(&"VEHICLE".to_string()));
                assert_eq!(available.len(), 6);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_dataset_unreadable_source() {
        let err = load_dataset(&options(PathBuf::from("/tmp/fleet-report-nope.csv"), 0))
            .unwrap_err();
        assert!(matches!(err, ReportError::SourceOpen { .. }));
    }

    #[test]
    fn test_load_metadata_source_recorded() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), &[HEADER, "A,1,0,TIRE,LIGHT,2024-01-01,P"]);
        let dataset = load_dataset(&options(path.clone(), 0)).unwrap();
        assert_eq!(dataset.metadata().source, path);
        assert_eq!(dataset.metadata().rows_loaded, 1);
    }

    #[test]
    fn test_from_records_counts() {
        let record = MaintenanceRecord {
            vehicle: None,
            plate: None,
            category: None,
            kind: None,
            amount_paid: 0.0,
            amount_saved: 0.0,
            date: None,
        };
        let dataset = Dataset::from_records(vec![record.clone(), record], Schema::english());
        assert_eq!(dataset.len(), 2);
        assert!(!dataset.is_empty());
        assert_eq!(dataset.metadata().undated_rows, 2);
        assert_eq!(dataset.metadata().uncategorized_rows, 2);
    }
}
