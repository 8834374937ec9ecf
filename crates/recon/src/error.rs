use thiserror::Error;

/// Failures from the collaborators around the engine. `reconcile` itself
/// never fails.
#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config parsed but holds an unusable value.
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Malformed CSV input.
    #[error("{source_name}: {message}")]
    Csv { source_name: String, message: String },
    /// File could not be read or written.
    #[error("{path}: {message}")]
    Io { path: String, message: String },
    /// CSV serialization of a result table failed.
    #[error("export error: {0}")]
    Export(String),
}
