//! Daily Ledger Batch CLI
//!
//! Runs the end-of-day batch for one processing date.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --date 2025-04-15
//! cargo run -- --date 2025-04-15 --input ./data --output ./output --log batch.log
//! cargo run -- --config rules.toml --daily-withdrawal-limit 2500
//! ```
//!
//! Reads `accounts_<date>.csv` (or `accounts.csv`) and `transactions_<date>.csv`
//! from the input directory and writes the updated accounts, processed and
//! invalid transactions, fraud alerts and account summaries to the output
//! directory. Log verbosity follows `RUST_LOG` and defaults to `info`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (bad arguments or configuration, missing or malformed input,
//!   required report not written)

use daily_ledger_batch::cli::{self, CliArgs};
use daily_ledger_batch::pipeline::{BatchReport, DailyBatch};
use daily_ledger_batch::types::BatchError;
use std::fs::OpenOptions;
use std::path::Path;
use std::process;
use std::sync::Mutex;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_logging(log_file: Option<&Path>) -> Result<(), BatchError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| BatchError::IoError {
                    message: format!("Failed to open log file '{}': {}", path.display(), e),
                })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

fn run(args: &CliArgs) -> Result<BatchReport, BatchError> {
    let rules = args.resolve_rules()?;
    let batch = DailyBatch::new(
        args.processing_date(),
        args.input_dir.clone(),
        args.output_dir.clone(),
        rules,
    );
    batch.run()
}

fn main() {
    let args = cli::parse_args();

    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        error!(error = %e, "Batch processing failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
