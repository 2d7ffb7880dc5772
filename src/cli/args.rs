use crate::config::RulesConfig;
use crate::types::BatchError;
use chrono::{Days, NaiveDate, Utc};
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Run the end-of-day ledger batch for one processing date
#[derive(Parser, Debug)]
#[command(name = "daily-batch")]
#[command(
    about = "Apply a day's transactions to account balances and flag anomalies",
    long_about = None
)]
pub struct CliArgs {
    /// Processing date
    #[arg(
        long = "date",
        value_name = "YYYY-MM-DD",
        help = "Processing date (default: yesterday, UTC)"
    )]
    pub date: Option<NaiveDate>,

    #[arg(
        long = "input",
        value_name = "DIR",
        default_value = "./data",
        help = "Directory containing the account and transaction files"
    )]
    pub input_dir: PathBuf,

    #[arg(
        long = "output",
        value_name = "DIR",
        default_value = "./output",
        help = "Directory for the generated reports (created if missing)"
    )]
    pub output_dir: PathBuf,

    #[arg(
        long = "log",
        value_name = "FILE",
        help = "Append log output to this file instead of stderr"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "config",
        value_name = "FILE",
        help = "TOML file with business rule overrides"
    )]
    pub config_file: Option<PathBuf>,

    #[arg(
        long = "overdraft-limit",
        value_name = "AMOUNT",
        allow_hyphen_values = true,
        help = "Lowest balance a debit or transfer may leave (default: -1000)"
    )]
    pub overdraft_limit: Option<Decimal>,

    #[arg(
        long = "daily-withdrawal-limit",
        value_name = "AMOUNT",
        help = "Maximum debits per account per day (default: 5000)"
    )]
    pub daily_withdrawal_limit: Option<Decimal>,

    #[arg(
        long = "large-transaction-threshold",
        value_name = "AMOUNT",
        help = "Flag completed transactions at or above this amount (default: 10000)"
    )]
    pub large_transaction_threshold: Option<Decimal>,

    #[arg(
        long = "rapid-withdrawal-count",
        value_name = "COUNT",
        help = "Debits that make a rapid withdrawal burst (default: 3)"
    )]
    pub rapid_withdrawal_count: Option<usize>,

    #[arg(
        long = "rapid-withdrawal-window",
        value_name = "MINUTES",
        help = "Longest span of a rapid withdrawal burst (default: 60)"
    )]
    pub rapid_withdrawal_window: Option<i64>,
}

impl CliArgs {
    /// The date to process, defaulting to yesterday in UTC
    pub fn processing_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| {
            let today = Utc::now().date_naive();
            today.checked_sub_days(Days::new(1)).unwrap_or(today)
        })
    }

    /// Overlay the individual rule flags on `base`
    ///
    /// Flags that were not given keep the value from `base`. The result is
    /// validated.
    pub fn to_rules_config(&self, base: RulesConfig) -> Result<RulesConfig, BatchError> {
        let config = RulesConfig {
            overdraft_limit: self.overdraft_limit.unwrap_or(base.overdraft_limit),
            daily_withdrawal_limit: self
                .daily_withdrawal_limit
                .unwrap_or(base.daily_withdrawal_limit),
            large_transaction_threshold: self
                .large_transaction_threshold
                .unwrap_or(base.large_transaction_threshold),
            rapid_withdrawal_count: self
                .rapid_withdrawal_count
                .unwrap_or(base.rapid_withdrawal_count),
            rapid_withdrawal_window_minutes: self
                .rapid_withdrawal_window
                .unwrap_or(base.rapid_withdrawal_window_minutes),
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the `--config` file if given, then the rule flags
    pub fn resolve_rules(&self) -> Result<RulesConfig, BatchError> {
        let base = match &self.config_file {
            Some(path) => RulesConfig::from_file(path)?,
            None => RulesConfig::default(),
        };
        self.to_rules_config(base)
    }
}
