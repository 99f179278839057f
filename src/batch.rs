use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::client::{require_credential, PredictionClient};
use crate::error::{AppError, Result};
use crate::form::Form;
use crate::models::{FormInput, PredictionResult, DEFAULT_SALINITY};
use crate::validation::ValidationErrors;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    temperature_degree_c: String,
    #[serde(default = "default_salinity")]
    salinity_psu: String,
    #[serde(default = "default_season")]
    season: String,
    #[serde(default)]
    latitude: String,
    #[serde(default)]
    longitude: String,
}

fn default_salinity() -> String {
    DEFAULT_SALINITY.to_string()
}

fn default_season() -> String {
    FormInput::default().season
}

impl From<CsvRow> for FormInput {
    fn from(row: CsvRow) -> Self {
        FormInput {
            temperature: row.temperature_degree_c,
            salinity: row.salinity_psu,
            season: row.season,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchRow {
    /// 1-based data row, not counting the header.
    pub row: usize,
    pub input: FormInput,
}

#[derive(Debug)]
pub enum RowOutcome {
    Invalid(ValidationErrors),
    Predicted(PredictionResult),
    Failed(String),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub predicted: usize,
    pub invalid: usize,
    pub failed: usize,
}

pub fn read_rows<R: std::io::Read>(reader: R) -> Result<Vec<BatchRow>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        rows.push(BatchRow {
            row: index + 1,
            input: row.into(),
        });
    }

    Ok(rows)
}

pub fn read_csv(path: &Path) -> Result<Vec<BatchRow>> {
    let file = std::fs::File::open(path)?;
    read_rows(file)
}

/// Validates and submits rows one at a time through a single form that is
/// reset between rows. A failed row does not stop the batch, and nothing is
/// retried.
pub async fn run(
    client: &PredictionClient,
    token: Option<&str>,
    rows: &[BatchRow],
) -> Result<Vec<(usize, RowOutcome)>> {
    let token = require_credential(token)?;
    let mut form = Form::new();
    let mut outcomes = Vec::with_capacity(rows.len());

    for row in rows {
        form.fill(&row.input);
        let outcome = match form.submit(client, Some(token)).await {
            Ok(submission) => RowOutcome::Predicted(submission.result),
            Err(AppError::Invalid(errors)) => RowOutcome::Invalid(errors),
            Err(AppError::Upstream { message, .. }) => {
                warn!(row = row.row, %message, "batch row failed");
                RowOutcome::Failed(message)
            }
            Err(err) => return Err(err),
        };
        outcomes.push((row.row, outcome));
    }

    Ok(outcomes)
}

pub fn summarize(outcomes: &[(usize, RowOutcome)]) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for (_, outcome) in outcomes {
        match outcome {
            RowOutcome::Invalid(_) => summary.invalid += 1,
            RowOutcome::Predicted(_) => summary.predicted += 1,
            RowOutcome::Failed(_) => summary.failed += 1,
        }
    }
    summary
}
