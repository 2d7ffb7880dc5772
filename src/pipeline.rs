//! Daily batch pipeline
//!
//! Orchestrates one processing date end to end, delegating:
//! - file loading to `io::reader`
//! - validation, the ledger pass, anomaly scans and summaries to `core`
//! - report output to `io::report_writer`
//!
//! [`process_day`] is the pure part and never touches the filesystem.
//! [`DailyBatch::run`] wraps it with file discovery and report writing.

use crate::config::RulesConfig;
use crate::core::{summarize_accounts, validate_transactions, AnomalyDetector, LedgerEngine};
use crate::io::{
    load_accounts, load_transactions, write_account_summaries_csv, write_accounts_csv,
    write_anomalies_csv, write_invalid_transactions_csv, write_processed_transactions_csv,
};
use crate::types::{
    AccountMap, AccountSummary, Anomaly, BatchError, Transaction, TransactionStatus,
};
use chrono::{Days, NaiveDate};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Everything one processing date produces
#[derive(Debug, Clone, PartialEq)]
pub struct DayOutcome {
    /// End-of-day account state
    pub accounts: AccountMap,
    /// Valid transactions in the order applied, each completed or rejected
    pub processed: Vec<Transaction>,
    /// Transactions refused by validation, in input order
    pub invalid: Vec<Transaction>,
    pub anomalies: Vec<Anomaly>,
    /// One per account, sorted by account id
    pub summaries: Vec<AccountSummary>,
}

impl DayOutcome {
    /// Number of processed transactions with the given status
    pub fn count(&self, status: TransactionStatus) -> usize {
        self.processed.iter().filter(|tx| tx.status == status).count()
    }
}

/// Run validation, the ledger pass, anomaly detection and summaries
///
/// Valid transactions are applied in `(timestamp, id)` order; ties on both
/// keep their input order. `accounts` is not modified.
pub fn process_day(
    accounts: &AccountMap,
    transactions: Vec<Transaction>,
    date: NaiveDate,
    rules: &RulesConfig,
) -> DayOutcome {
    let mut validation = validate_transactions(transactions, accounts);
    validation
        .valid
        .sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

    let ledger = LedgerEngine::new(rules.clone()).process(accounts, validation.valid);
    let anomalies = AnomalyDetector::new(rules.clone()).detect(&ledger.transactions, &ledger.accounts);
    let summaries = summarize_accounts(&ledger.accounts, &ledger.transactions, date);

    DayOutcome {
        accounts: ledger.accounts,
        processed: ledger.transactions,
        invalid: validation.invalid,
        anomalies,
        summaries,
    }
}

/// Counts reported after a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub accounts: usize,
    pub transactions: usize,
    pub invalid: usize,
    pub completed: usize,
    pub rejected: usize,
    pub anomalies: usize,
    /// Reports that were written, in write order
    pub files_written: Vec<PathBuf>,
}

/// One processing date bound to its input and output directories
#[derive(Debug, Clone)]
pub struct DailyBatch {
    date: NaiveDate,
    input_dir: PathBuf,
    output_dir: PathBuf,
    rules: RulesConfig,
}

impl DailyBatch {
    pub fn new(
        date: NaiveDate,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        rules: RulesConfig,
    ) -> Self {
        DailyBatch {
            date,
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            rules,
        }
    }

    /// `accounts_<date>.csv` if present, otherwise `accounts.csv`
    pub fn accounts_input_path(&self) -> PathBuf {
        let dated = self.input_dir.join(format!("accounts_{}.csv", self.date));
        if dated.exists() {
            dated
        } else {
            self.input_dir.join("accounts.csv")
        }
    }

    pub fn transactions_input_path(&self) -> PathBuf {
        self.input_dir.join(format!("transactions_{}.csv", self.date))
    }

    fn dated_output(&self, prefix: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{}.csv", prefix, self.date))
    }

    /// Updated accounts are named for the day they open
    pub fn accounts_output_path(&self) -> Result<PathBuf, BatchError> {
        let next_day = self.date.checked_add_days(Days::new(1)).ok_or_else(|| {
            BatchError::invalid_config(format!("Processing date {} has no following day", self.date))
        })?;
        Ok(self.output_dir.join(format!("accounts_{}.csv", next_day)))
    }

    /// Load inputs, process the day and write every report
    ///
    /// # Errors
    ///
    /// Missing or malformed input aborts the run before anything is written.
    /// Failing to write the updated accounts or the account summary is fatal;
    /// the invalid-transaction, anomaly and processed-transaction reports only
    /// log a warning.
    pub fn run(&self) -> Result<BatchReport, BatchError> {
        info!(date = %self.date, "Starting batch processing");

        let accounts_output = self.accounts_output_path()?;
        std::fs::create_dir_all(&self.output_dir).map_err(|e| BatchError::IoError {
            message: format!(
                "Failed to create output directory '{}': {}",
                self.output_dir.display(),
                e
            ),
        })?;

        let accounts = load_accounts(&self.accounts_input_path())?;
        let transactions = load_transactions(&self.transactions_input_path())?;
        let transaction_count = transactions.len();

        let outcome = process_day(&accounts, transactions, self.date, &self.rules);
        let mut report = BatchReport {
            accounts: accounts.len(),
            transactions: transaction_count,
            invalid: outcome.invalid.len(),
            completed: outcome.count(TransactionStatus::Completed),
            rejected: outcome.count(TransactionStatus::Rejected),
            anomalies: outcome.anomalies.len(),
            files_written: Vec::new(),
        };

        if !outcome.invalid.is_empty() {
            let path = self.dated_output("invalid_transactions");
            write_optional(&mut report, path, |out| {
                write_invalid_transactions_csv(&outcome.invalid, out)
            });
        }

        if !outcome.anomalies.is_empty() {
            let path = self.dated_output("fraud_alerts");
            write_optional(&mut report, path, |out| write_anomalies_csv(&outcome.anomalies, out));
        }

        write_report(&accounts_output, |out| write_accounts_csv(&outcome.accounts, out))?;
        report.files_written.push(accounts_output);

        let path = self.dated_output("processed_transactions");
        write_optional(&mut report, path, |out| {
            write_processed_transactions_csv(&outcome.processed, out)
        });

        let summary_path = self.dated_output("account_summary");
        write_report(&summary_path, |out| write_account_summaries_csv(&outcome.summaries, out))?;
        report.files_written.push(summary_path);

        info!(
            date = %self.date,
            completed = report.completed,
            rejected = report.rejected,
            invalid = report.invalid,
            anomalies = report.anomalies,
            "Batch processing completed"
        );
        Ok(report)
    }
}

/// Create `path` and hand a buffered writer to `write`
fn write_report<F>(path: &Path, write: F) -> Result<(), BatchError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), BatchError>,
{
    let file = File::create(path).map_err(|e| BatchError::IoError {
        message: format!("Failed to create '{}': {}", path.display(), e),
    })?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a report whose failure does not abort the run
fn write_optional<F>(report: &mut BatchReport, path: PathBuf, write: F)
where
    F: FnOnce(&mut dyn Write) -> Result<(), BatchError>,
{
    match write_report(&path, write) {
        Ok(()) => report.files_written.push(path),
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to write report"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Account, AnomalyKind, TransactionType};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
    }

    fn accounts() -> AccountMap {
        [("A1", 1000), ("A2", 50)]
            .into_iter()
            .map(|(id, balance)| (id.to_string(), Account::new(id, Decimal::from(balance))))
            .collect()
    }

    fn tx(id: &str, account: &str, hour: u32, amount: i64, tx_type: TransactionType) -> Transaction {
        Transaction::new(
            id,
            account,
            Utc.with_ymd_and_hms(2025, 4, 15, hour, 0, 0).unwrap(),
            Decimal::from(amount),
            tx_type,
        )
    }

    #[test]
    fn test_process_day_applies_in_timestamp_order() {
        // Input order would overdraw A2 past the floor; time order does not
        let outcome = process_day(
            &accounts(),
            vec![
                tx("T2", "A2", 11, 1100, TransactionType::Debit),
                tx("T1", "A2", 9, 100, TransactionType::Credit),
            ],
            date(),
            &RulesConfig::default(),
        );

        let ids: Vec<_> = outcome.processed.iter().map(|tx| tx.id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T2"]);
        assert_eq!(outcome.count(TransactionStatus::Completed), 2);
        assert_eq!(outcome.accounts["A2"].balance, Decimal::from(-950));
    }

    #[test]
    fn test_process_day_ties_broken_by_id() {
        let outcome = process_day(
            &accounts(),
            vec![
                tx("T9", "A1", 10, 1, TransactionType::Credit),
                tx("T3", "A1", 10, 1, TransactionType::Credit),
            ],
            date(),
            &RulesConfig::default(),
        );

        let ids: Vec<_> = outcome.processed.iter().map(|tx| tx.id.as_str()).collect();
        assert_eq!(ids, vec!["T3", "T9"]);
    }

    #[test]
    fn test_process_day_routes_every_transaction() {
        let outcome = process_day(
            &accounts(),
            vec![
                tx("T1", "A1", 9, 12000, TransactionType::Credit),
                tx("T2", "A9", 9, 5, TransactionType::Credit),
                tx("T3", "A2", 10, 2000, TransactionType::Debit),
                tx("T4", "A1", 11, 300, TransactionType::Transfer).with_destination("A2"),
            ],
            date(),
            &RulesConfig::default(),
        );

        assert_eq!(outcome.invalid.len(), 1);
        assert_eq!(outcome.invalid[0].id, "T2");
        assert_eq!(outcome.processed.len(), 3);
        assert_eq!(outcome.count(TransactionStatus::Rejected), 1);
        assert_eq!(outcome.summaries.len(), 2);
        assert!(outcome
            .anomalies
            .iter()
            .any(|a| a.kind == AnomalyKind::LargeTransaction && a.transaction_id == "T1"));
        assert_eq!(outcome.accounts["A1"].balance, Decimal::from(12700));
        assert_eq!(outcome.accounts["A2"].balance, Decimal::from(350));
    }

    #[test]
    fn test_accounts_output_is_named_for_next_day() {
        let batch = DailyBatch::new(date(), "in", "out", RulesConfig::default());
        assert_eq!(
            batch.accounts_output_path().unwrap(),
            Path::new("out").join("accounts_2025-04-16.csv")
        );
    }

    #[test]
    fn test_accounts_input_falls_back_to_undated_file() {
        let dir = tempfile::tempdir().unwrap();
        let batch = DailyBatch::new(date(), dir.path(), dir.path(), RulesConfig::default());

        assert_eq!(batch.accounts_input_path(), dir.path().join("accounts.csv"));

        std::fs::write(dir.path().join("accounts_2025-04-15.csv"), "account_id,balance\n").unwrap();
        assert_eq!(
            batch.accounts_input_path(),
            dir.path().join("accounts_2025-04-15.csv")
        );
    }

    #[test]
    fn test_run_fails_without_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let batch = DailyBatch::new(
            date(),
            dir.path(),
            dir.path().join("out"),
            RulesConfig::default(),
        );

        let err = batch.run().unwrap_err();
        assert!(matches!(err, BatchError::FileNotFound { .. }));
    }
}
