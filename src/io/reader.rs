//! CSV readers for the daily input files
//!
//! [`TransactionReader`] streams transactions one row at a time, delegating
//! parsing and conversion to the csv_format module. [`load_accounts`] and
//! [`load_transactions`] are the whole-file entry points used by the batch.
//!
//! # Error Handling
//!
//! - A missing file is a `FileNotFound` error from the constructor
//! - A malformed row is a `ParseError` carrying its line number
//! - A file with no data rows is an `EmptyInput` error from the loaders

use crate::io::csv_format::{
    convert_account_record, convert_transaction_record, CsvAccountRecord, CsvTransactionRecord,
};
use crate::types::{AccountMap, BatchError, Transaction};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// Open a CSV file with the settings shared by both input formats
///
/// Whitespace is trimmed from every field and rows may omit trailing
/// optional columns.
fn open_csv(path: &Path) -> Result<csv::Reader<File>, BatchError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BatchError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => BatchError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        },
    })?;

    Ok(ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .buffer_capacity(8 * 1024)
        .from_reader(file))
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or_default()
}

/// Streaming reader over a transactions file
pub struct TransactionReader {
    headers: StringRecord,
    records: StringRecordsIntoIter<File>,
}

impl std::fmt::Debug for TransactionReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionReader")
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl TransactionReader {
    /// Open a transactions file and read its header row
    pub fn new(path: &Path) -> Result<Self, BatchError> {
        let mut reader = open_csv(path)?;
        let headers = reader.headers()?.clone();

        Ok(Self {
            headers,
            records: reader.into_records(),
        })
    }
}

impl Iterator for TransactionReader {
    type Item = Result<Transaction, BatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(BatchError::from(e))),
        };
        let line = line_of(&record);

        Some(
            record
                .deserialize::<CsvTransactionRecord>(Some(&self.headers))
                .map_err(|e| BatchError::parse_error(line, e.to_string()))
                .and_then(|csv_record| convert_transaction_record(csv_record, line)),
        )
    }
}

/// Load every transaction from a file, stopping at the first bad row
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>, BatchError> {
    let transactions = TransactionReader::new(path)?.collect::<Result<Vec<_>, _>>()?;

    if transactions.is_empty() {
        return Err(BatchError::empty_input(path));
    }

    info!(
        path = %path.display(),
        count = transactions.len(),
        "Loaded transactions"
    );
    Ok(transactions)
}

/// Load the account state at the start of the day
///
/// When an id appears more than once the last row wins.
pub fn load_accounts(path: &Path) -> Result<AccountMap, BatchError> {
    let mut reader = open_csv(path)?;
    let headers = reader.headers()?.clone();
    let mut accounts = AccountMap::new();

    for result in reader.records() {
        let record = result?;
        let line = line_of(&record);
        let csv_record: CsvAccountRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| BatchError::parse_error(line, e.to_string()))?;
        let account = convert_account_record(csv_record, line)?;

        if accounts.contains_key(&account.id) {
            warn!(line, account = %account.id, "Duplicate account row, keeping the later one");
        }
        accounts.insert(account.id.clone(), account);
    }

    if accounts.is_empty() {
        return Err(BatchError::empty_input(path));
    }

    info!(path = %path.display(), count = accounts.len(), "Loaded accounts");
    Ok(accounts)
}
