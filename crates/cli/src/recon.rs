//! `tally run` / `tally export` / `tally validate`.

use std::path::{Path, PathBuf};

use tally_recon::ingest::read_csv_file;
use tally_recon::model::{ReconReport, TransactionRecord};
use tally_recon::{reconcile, reconcile_report, Paginator, ReconConfig, ResultTable};

use crate::exit_codes::{
    input_exit_code, EXIT_DUPLICATE, EXIT_INVALID_CONFIG, EXIT_MISMATCH, EXIT_OUTPUT,
};
use crate::render::render_table;
use crate::CliError;

/// Options for `tally run`, collected from the command line.
pub struct RunOptions {
    pub internal: PathBuf,
    pub provider: PathBuf,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub tables: Vec<ResultTable>,
    pub page: usize,
    pub page_size: Option<usize>,
    pub strict: bool,
    pub quiet: bool,
}

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };
    let config_str = std::fs::read_to_string(path).map_err(|e| {
        recon_err(EXIT_INVALID_CONFIG, format!("cannot read config {}: {e}", path.display()))
    })?;
    ReconConfig::from_toml(&config_str).map_err(|e| recon_err(EXIT_INVALID_CONFIG, e.to_string()))
}

fn load_inputs(
    internal: &Path,
    provider: &Path,
) -> Result<(Vec<TransactionRecord>, Vec<TransactionRecord>), CliError> {
    let load = |path: &Path| {
        read_csv_file(path).map_err(|e| {
            recon_err(input_exit_code(&e), e.to_string())
                .with_hint("inputs must be CSV with a header row naming transaction_reference, amount, status")
        })
    };
    let internal_records = load(internal)?;
    let provider_records = load(provider)?;

    for (path, records) in [(internal, &internal_records), (provider, &provider_records)] {
        if records.is_empty() {
            tracing::warn!(path = %path.display(), "input has no records");
        }
    }

    Ok((internal_records, provider_records))
}

pub fn cmd_run(opts: RunOptions) -> Result<(), CliError> {
    let mut config = load_config(opts.config.as_deref())?;
    if let Some(size) = opts.page_size {
        if size == 0 {
            return Err(CliError::args("--page-size must be greater than 0"));
        }
        config.page_size = size;
    }

    let (internal, provider) = load_inputs(&opts.internal, &opts.provider)?;
    let report = reconcile_report(&internal, &provider, Some(&config));

    for dup in &report.duplicates {
        tracing::warn!(
            side = %dup.side,
            reference = %dup.reference,
            occurrences = dup.occurrences,
            "duplicate reference; only the last occurrence was compared"
        );
    }

    let json_str = if opts.json || opts.output.is_some() {
        Some(
            serde_json::to_string_pretty(&report)
                .map_err(|e| recon_err(EXIT_OUTPUT, format!("JSON serialization error: {e}")))?,
        )
    } else {
        None
    };

    if let (Some(path), Some(json_str)) = (&opts.output, &json_str) {
        std::fs::write(path, json_str)
            .map_err(|e| recon_err(EXIT_OUTPUT, format!("cannot write output: {e}")))?;
        tracing::info!(path = %path.display(), "wrote report");
    }

    if opts.json {
        if let Some(json_str) = &json_str {
            println!("{json_str}");
        }
    } else {
        let pager = Paginator::new(config.page_size);
        let rendered: Vec<String> = opts
            .tables
            .iter()
            .map(|table| render_table(*table, &report.result, &pager, opts.page))
            .collect();
        print!("{}", rendered.join("\n"));
    }

    if let Some(dir) = &opts.export_dir {
        let written = tally_recon::export::write_tables(&report.result, dir, &config.export)
            .map_err(|e| recon_err(EXIT_OUTPUT, e.to_string()))?;
        if !opts.quiet {
            for path in &written {
                eprintln!("wrote {}", path.display());
            }
        }
    }

    if !opts.quiet {
        print_summary(&report);
    }

    if config.fail_on_duplicates && !report.duplicates.is_empty() {
        return Err(recon_err(
            EXIT_DUPLICATE,
            format!("{} duplicate reference(s) found", report.duplicates.len()),
        ));
    }

    if (opts.strict || config.fail_on_mismatch) && !report.result.is_clean() {
        return Err(recon_err(EXIT_MISMATCH, "mismatches found"));
    }

    Ok(())
}

fn print_summary(report: &ReconReport) {
    let s = &report.summary;
    eprintln!(
        "recon: {} internal, {} provider, {} matched ({} agree, {} amount mismatches, {} status mismatches), {} internal-only, {} provider-only",
        s.internal_records,
        s.provider_records,
        s.matched,
        s.fully_agreeing,
        s.amount_mismatches,
        s.status_mismatches,
        s.only_internal,
        s.only_provider,
    );
    if s.duplicate_references > 0 {
        eprintln!("duplicates: {} reference(s) repeated within an input", s.duplicate_references);
    }
}

pub fn cmd_export(
    internal: PathBuf,
    provider: PathBuf,
    table: ResultTable,
    out: Option<PathBuf>,
) -> Result<(), CliError> {
    let (internal, provider) = load_inputs(&internal, &provider)?;
    let result = reconcile(&internal, &provider);

    let text = table
        .to_csv(&result)
        .map_err(|e| recon_err(EXIT_OUTPUT, e.to_string()))?;

    match out {
        Some(path) => {
            if text.is_empty() {
                tracing::warn!(table = %table, "table is empty, nothing written");
                return Ok(());
            }
            std::fs::write(&path, &text).map_err(|e| {
                recon_err(EXIT_OUTPUT, format!("cannot write {}: {e}", path.display()))
            })?;
            tracing::info!(table = %table, path = %path.display(), "exported");
        }
        None => {
            if !text.is_empty() {
                println!("{text}");
            }
        }
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;
    eprintln!(
        "valid: config '{}' (page_size {}, exports {}, {}, {})",
        config.name.as_deref().unwrap_or("unnamed"),
        config.page_size,
        config.export.matched,
        config.export.only_internal,
        config.export.only_provider,
    );
    Ok(())
}
