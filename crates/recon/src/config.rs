use serde::Deserialize;

use crate::error::ReconError;
use crate::page::DEFAULT_PAGE_SIZE;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Optional run configuration. Every key has a default, so an empty file is
/// a valid config.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Treat any disagreement or one-sided record as a failed run.
    #[serde(default)]
    pub fail_on_mismatch: bool,
    /// Treat a repeated reference within one input as a failed run.
    #[serde(default)]
    pub fail_on_duplicates: bool,
    #[serde(default)]
    pub export: ExportConfig,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: None,
            page_size: DEFAULT_PAGE_SIZE,
            fail_on_mismatch: false,
            fail_on_duplicates: false,
            export: ExportConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// File names used when writing the three result tables to a directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    #[serde(default = "default_matched_file")]
    pub matched: String,
    #[serde(default = "default_only_internal_file")]
    pub only_internal: String,
    #[serde(default = "default_only_provider_file")]
    pub only_provider: String,
}

fn default_matched_file() -> String {
    "matched.csv".into()
}

fn default_only_internal_file() -> String {
    "only-internal.csv".into()
}

fn default_only_provider_file() -> String {
    "only-provider.csv".into()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            matched: default_matched_file(),
            only_internal: default_only_internal_file(),
            only_provider: default_only_provider_file(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.page_size == 0 {
            return Err(ReconError::ConfigValidation(
                "page_size must be greater than 0".into(),
            ));
        }

        let files = [
            ("matched", &self.export.matched),
            ("only_internal", &self.export.only_internal),
            ("only_provider", &self.export.only_provider),
        ];

        for (key, file) in &files {
            if file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "export.{key} must not be empty"
                )));
            }
        }

        for (i, (key_a, file_a)) in files.iter().enumerate() {
            for (key_b, file_b) in &files[i + 1..] {
                if file_a == file_b {
                    return Err(ReconError::ConfigValidation(format!(
                        "export.{key_a} and export.{key_b} both write '{file_a}'"
                    )));
                }
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
