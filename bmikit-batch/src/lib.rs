pub mod export;
pub mod table;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use itertools::Itertools;
use log::{debug, info};
use serde::Serialize;
use uuid::Uuid;

use bmikit_client::Client;
use bmikit_model::bmi::{evaluate, BmiResult, Category};
use bmikit_model::measurement::{Gender, InvalidMeasurement, Measurement};

use table::{Columns, RowError, TableError};

/// An input row carried through classification: the original columns plus
/// the derived BMI (2 decimals), category and tips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    pub name: Option<String>,
    pub age: u32,
    pub gender: Option<Gender>,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub category: Category,
    pub tips: Vec<String>,
}

impl OutputRow {
    fn new(measurement: Measurement, result: BmiResult) -> Self {
        Self {
            name: measurement.name,
            age: measurement.age,
            gender: measurement.gender,
            height_cm: measurement.height_cm,
            weight_kg: measurement.weight_kg,
            bmi: result.bmi,
            category: result.category,
            tips: result.tips,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_rows: usize,
    pub classified: usize,
    pub failed: usize,
    pub categories: Vec<CategoryCount>,
    pub mean_bmi: Option<f64>,
}

impl Summary {
    fn new(rows: &[OutputRow], failed: usize) -> Self {
        let counts = rows.iter().counts_by(|row| row.category);
        let categories = Category::ALL
            .iter()
            .map(|category| CategoryCount {
                category: *category,
                count: counts.get(category).copied().unwrap_or(0),
            })
            .collect();
        let mean_bmi = if rows.is_empty() {
            None
        } else {
            let mean = rows.iter().map(|row| row.bmi).sum::<f64>() / rows.len() as f64;
            Some((mean * 100.0).round() / 100.0)
        };

        Self {
            total_rows: rows.len() + failed,
            classified: rows.len(),
            failed,
            categories,
            mean_bmi,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub generated_at: NaiveDateTime,
    pub rows: Vec<OutputRow>,
    pub errors: Vec<RowError>,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub line: usize,
    pub measurement: Measurement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub rows: Vec<ParsedRow>,
    pub errors: Vec<RowError>,
}

/// Lazily classifies an owned sequence of measurements, preserving input
/// order. Rows with non-positive dimensions come out as per-row errors.
pub fn classify_batch<I>(
    measurements: I,
) -> impl Iterator<Item = Result<BmiResult, InvalidMeasurement>>
where
    I: IntoIterator<Item = Measurement>,
{
    measurements.into_iter().map(|measurement| evaluate(&measurement))
}

/// Reads a CSV stream into measurements. A missing required column rejects
/// the whole table; a malformed row only rejects that row.
pub fn read_measurements<R: Read>(reader: R) -> Result<ParsedTable, TableError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();
    let columns = Columns::resolve(&headers)?;
    debug!("Resolved columns from header {:?}", headers);

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let line = i + 2;
        match columns.parse_row(&record, line) {
            Ok(measurement) => rows.push(ParsedRow { line, measurement }),
            Err(e) => errors.push(e),
        }
    }
    info!("Parsed {} rows, rejected {}", rows.len(), errors.len());

    Ok(ParsedTable { rows, errors })
}

pub fn process_reader<R: Read>(reader: R) -> Result<BatchReport, TableError> {
    let parsed = read_measurements(reader)?;

    let mut rows = Vec::new();
    let mut errors = parsed.errors;
    for ParsedRow { line, measurement } in parsed.rows {
        match evaluate(&measurement) {
            Ok(result) => rows.push(OutputRow::new(measurement, result)),
            Err(e) => errors.push(RowError {
                line,
                message: e.to_string(),
            }),
        }
    }
    errors.sort_by_key(|error| error.line);

    let summary = Summary::new(&rows, errors.len());
    info!(
        "Classified {} of {} rows",
        summary.classified, summary.total_rows
    );

    Ok(BatchReport {
        run_id: Uuid::new_v4(),
        generated_at: chrono::Utc::now().naive_utc(),
        rows,
        errors,
        summary,
    })
}

pub fn process_file(path: &Path) -> Result<BatchReport, TableError> {
    info!("Reading measurements from {}", path.display());
    let file = File::open(path)?;
    process_reader(file)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub results: Vec<BmiResult>,
    pub rejected: Vec<RowError>,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("classification service request failed: {0}")]
    Client(#[from] bmikit_client::Error),
}

/// Parses a CSV and submits the valid measurements to the classification
/// service in one request. Invalid rows are reported locally, never sent.
pub async fn submit_reader<R: Read>(
    reader: R,
    client: &dyn Client,
) -> Result<SubmitOutcome, SubmitError> {
    let parsed = read_measurements(reader)?;

    let mut measurements = Vec::new();
    let mut rejected = parsed.errors;
    for ParsedRow { line, measurement } in parsed.rows {
        match measurement.validate() {
            Ok(()) => measurements.push(measurement),
            Err(e) => rejected.push(RowError {
                line,
                message: e.to_string(),
            }),
        }
    }
    rejected.sort_by_key(|error| error.line);

    info!("Submitting {} measurements", measurements.len());
    let results = client.classify_batch(&measurements).await?;

    Ok(SubmitOutcome { results, rejected })
}
