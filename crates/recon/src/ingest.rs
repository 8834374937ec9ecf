//! CSV → `TransactionRecord` loading. The engine never calls this; callers
//! ingest both files first and hand the records to [`crate::reconcile`].

use std::path::Path;

use serde_json::Value;

use crate::error::ReconError;
use crate::model::TransactionRecord;

/// Parse CSV text with a header row into records.
///
/// Header names are used verbatim as field names. Empty lines are skipped.
/// A short row leaves the trailing fields absent; values past the last
/// header are dropped. Every value is kept as a string.
pub fn load_csv_records(csv_data: &str) -> Result<Vec<TransactionRecord>, ReconError> {
    load_named("<input>", csv_data)
}

/// Read and parse a CSV file.
pub fn read_csv_file(path: &Path) -> Result<Vec<TransactionRecord>, ReconError> {
    let csv_data = std::fs::read_to_string(path).map_err(|e| ReconError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let records = load_named(&path.display().to_string(), &csv_data)?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded csv");
    Ok(records)
}

fn load_named(source_name: &str, csv_data: &str) -> Result<Vec<TransactionRecord>, ReconError> {
    let csv_data = csv_data.strip_prefix('\u{feff}').unwrap_or(csv_data);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let csv_err = |e: csv::Error| ReconError::Csv {
        source_name: source_name.to_string(),
        message: e.to_string(),
    };

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();

    for row in reader.records() {
        let row = row.map_err(csv_err)?;
        let record: TransactionRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.clone(), Value::String(v.to_string())))
            .collect();
        records.push(record);
    }

    Ok(records)
}
