// tally CLI - reconcile an internal ledger export against a provider statement

mod exit_codes;
mod logging;
mod recon;
mod render;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tally_recon::ResultTable;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Reconcile an internal transaction export against a provider statement")]
#[command(version)]
struct Cli {
    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "TALLY_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile two CSV files and show the three result tables
    #[command(after_help = "\
Both files need a header row. Records are joined on transaction_reference;
amount and status are compared exactly as written (\"100\" != \"100.00\").

Examples:
  tally run internal.csv provider.csv
  tally run internal.csv provider.csv --table matched --page 2
  tally run internal.csv provider.csv --json
  tally run internal.csv provider.csv --export-dir out/ --strict
  tally run internal.csv provider.csv --config recon.toml")]
    Run {
        /// Internal system export (CSV)
        internal: PathBuf,

        /// Provider statement (CSV)
        provider: PathBuf,

        /// Path to a .toml run config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the full report as JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write matched / only-internal / only-provider CSV files here
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Show only this table (default: all three)
        #[arg(long, value_enum)]
        table: Option<TableArg>,

        /// Page to show (1-based, clamped to the last page)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (overrides the config)
        #[arg(long)]
        page_size: Option<usize>,

        /// Exit 1 when anything disagrees or is one-sided
        #[arg(long)]
        strict: bool,

        /// Suppress the summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Reconcile two CSV files and print one result table as CSV
    #[command(after_help = "\
Examples:
  tally export internal.csv provider.csv --table matched
  tally export internal.csv provider.csv --table only-provider --out only-provider.csv")]
    Export {
        /// Internal system export (CSV)
        internal: PathBuf,

        /// Provider statement (CSV)
        provider: PathBuf,

        /// Which table to export
        #[arg(long, value_enum)]
        table: TableArg,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Validate a run config without reconciling
    #[command(after_help = "\
Examples:
  tally validate recon.toml")]
    Validate {
        /// Path to the .toml config file
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TableArg {
    Matched,
    OnlyInternal,
    OnlyProvider,
}

impl From<TableArg> for ResultTable {
    fn from(arg: TableArg) -> Self {
        match arg {
            TableArg::Matched => ResultTable::Matched,
            TableArg::OnlyInternal => ResultTable::OnlyInternal,
            TableArg::OnlyProvider => ResultTable::OnlyProvider,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let result = match cli.command {
        Commands::Run {
            internal,
            provider,
            config,
            json,
            output,
            export_dir,
            table,
            page,
            page_size,
            strict,
            quiet,
        } => recon::cmd_run(recon::RunOptions {
            internal,
            provider,
            config,
            json,
            output,
            export_dir,
            tables: match table {
                Some(t) => vec![t.into()],
                None => ResultTable::ALL.to_vec(),
            },
            page,
            page_size,
            strict,
            quiet,
        }),
        Commands::Export { internal, provider, table, out } => {
            recon::cmd_export(internal, provider, table.into(), out)
        }
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
