//! Result table → CSV text, the download format of the reconciliation view.
//!
//! Shape: header row of the first row's field names, then one line per row
//! with every value double-quoted, `\n` between lines and no trailing newline.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::ExportConfig;
use crate::error::ReconError;
use crate::model::{MatchedEntry, ReconResult, TransactionRecord, EXTENSION_FIELDS};

/// A row that can be written as CSV.
pub trait CsvRow {
    /// Field names in output order.
    fn column_names(&self) -> Vec<&str>;
    /// Rendered cell for `column`; `None` when the row lacks it.
    fn cell(&self, column: &str) -> Option<String>;
}

impl CsvRow for TransactionRecord {
    fn column_names(&self) -> Vec<&str> {
        self.fields().map(|(k, _)| k.as_str()).collect()
    }

    fn cell(&self, column: &str) -> Option<String> {
        self.get(column).map(render_value)
    }
}

impl CsvRow for MatchedEntry {
    fn column_names(&self) -> Vec<&str> {
        let mut names = self.internal.column_names();
        for ext in EXTENSION_FIELDS {
            if !names.contains(&ext) {
                names.push(ext);
            }
        }
        names
    }

    /// Added columns always yield a cell, empty for an absent provider value.
    fn cell(&self, column: &str) -> Option<String> {
        if EXTENSION_FIELDS.contains(&column) {
            return Some(self.extension(column).as_ref().map(render_value).unwrap_or_default());
        }
        self.internal.cell(column)
    }
}

/// Strings verbatim, null as empty, anything else in JSON form.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Serialize rows to CSV text. An empty slice produces an empty string.
///
/// Later rows are aligned to the first row's columns; a missing cell is
/// written as `""` and fields the first row lacks are not written.
pub fn to_csv_text<R: CsvRow>(rows: &[R]) -> Result<String, ReconError> {
    let Some(first) = rows.first() else {
        return Ok(String::new());
    };
    let columns = first.column_names();

    let mut header = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    header.write_record(&columns).map_err(export_err)?;

    let mut body = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| row.cell(c).unwrap_or_default())
            .collect();
        body.write_record(&cells).map_err(export_err)?;
    }

    let mut bytes = header.into_inner().map_err(|e| ReconError::Export(e.to_string()))?;
    bytes.extend(body.into_inner().map_err(|e| ReconError::Export(e.to_string()))?);
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }

    String::from_utf8(bytes).map_err(|e| ReconError::Export(e.to_string()))
}

fn export_err(e: csv::Error) -> ReconError {
    ReconError::Export(e.to_string())
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// One of the three result sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultTable {
    Matched,
    OnlyInternal,
    OnlyProvider,
}

impl ResultTable {
    pub const ALL: [ResultTable; 3] = [Self::Matched, Self::OnlyInternal, Self::OnlyProvider];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Matched => "Matched Transactions",
            Self::OnlyInternal => "Present only in Internal file",
            Self::OnlyProvider => "Present only in Provider file",
        }
    }

    pub fn file_name<'a>(&self, export: &'a ExportConfig) -> &'a str {
        match self {
            Self::Matched => &export.matched,
            Self::OnlyInternal => &export.only_internal,
            Self::OnlyProvider => &export.only_provider,
        }
    }

    pub fn len(&self, result: &ReconResult) -> usize {
        match self {
            Self::Matched => result.matched.len(),
            Self::OnlyInternal => result.only_internal.len(),
            Self::OnlyProvider => result.only_provider.len(),
        }
    }

    pub fn is_empty(&self, result: &ReconResult) -> bool {
        self.len(result) == 0
    }

    pub fn to_csv(&self, result: &ReconResult) -> Result<String, ReconError> {
        match self {
            Self::Matched => to_csv_text(&result.matched),
            Self::OnlyInternal => to_csv_text(&result.only_internal),
            Self::OnlyProvider => to_csv_text(&result.only_provider),
        }
    }
}

impl std::fmt::Display for ResultTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched => write!(f, "matched"),
            Self::OnlyInternal => write!(f, "only-internal"),
            Self::OnlyProvider => write!(f, "only-provider"),
        }
    }
}

/// Write every non-empty table into `dir` under its configured file name.
/// Returns the paths written.
pub fn write_tables(
    result: &ReconResult,
    dir: &Path,
    export: &ExportConfig,
) -> Result<Vec<PathBuf>, ReconError> {
    std::fs::create_dir_all(dir).map_err(|e| ReconError::Io {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut written = Vec::new();
    for table in ResultTable::ALL {
        if table.is_empty(result) {
            tracing::info!(table = %table, "table empty, nothing to export");
            continue;
        }
        let path = dir.join(table.file_name(export));
        let text = table.to_csv(result)?;
        std::fs::write(&path, text).map_err(|e| ReconError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!(table = %table, path = %path.display(), "exported");
        written.push(path);
    }
    Ok(written)
}
