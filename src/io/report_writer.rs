//! CSV report writers
//!
//! Every writer takes the destination as `&mut dyn Write` so the same code
//! serves files and in-memory buffers. Money is printed with two decimals and
//! timestamps as RFC 3339 in UTC.

use crate::io::csv_format::format_timestamp;
use crate::types::{format_money, AccountMap, AccountSummary, Anomaly, BatchError, Transaction};
use csv::Writer;
use std::io::Write;

fn write_failure(what: &str, error: csv::Error) -> BatchError {
    BatchError::IoError {
        message: format!("Failed to write {}: {}", what, error),
    }
}

fn finish<W: Write>(mut writer: Writer<W>) -> Result<(), BatchError> {
    writer.flush().map_err(|e| BatchError::IoError {
        message: format!("Failed to flush output: {}", e),
    })
}

/// Write the end-of-day account state
///
/// Columns: account_id, balance, overdraft_count, last_transaction_time.
/// Accounts are sorted by id for deterministic output; an account with no
/// activity has an empty last_transaction_time.
pub fn write_accounts_csv(accounts: &AccountMap, output: &mut dyn Write) -> Result<(), BatchError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["account_id", "balance", "overdraft_count", "last_transaction_time"])
        .map_err(|e| write_failure("CSV header", e))?;

    let mut sorted: Vec<_> = accounts.values().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    for account in sorted {
        writer
            .write_record([
                account.id.clone(),
                format_money(account.balance),
                account.overdraft_count.to_string(),
                account
                    .last_transaction_time
                    .map(format_timestamp)
                    .unwrap_or_default(),
            ])
            .map_err(|e| write_failure("account record", e))?;
    }

    finish(writer)
}

/// Write the transactions handed to the ledger engine, with their outcome
pub fn write_processed_transactions_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), BatchError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "transaction_id",
            "account_id",
            "timestamp",
            "amount",
            "type",
            "status",
            "description",
            "destination_account_id",
            "processing_message",
        ])
        .map_err(|e| write_failure("CSV header", e))?;

    for tx in transactions {
        writer
            .write_record([
                tx.id.as_str(),
                tx.account_id.as_str(),
                &format_timestamp(tx.timestamp),
                &format_money(tx.amount),
                tx.tx_type.as_str(),
                tx.status.as_str(),
                tx.description.as_deref().unwrap_or_default(),
                tx.destination_account_id.as_deref().unwrap_or_default(),
                tx.processing_message.as_deref().unwrap_or_default(),
            ])
            .map_err(|e| write_failure("transaction record", e))?;
    }

    finish(writer)
}

/// Write the transactions that failed validation, with the reason
pub fn write_invalid_transactions_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), BatchError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "transaction_id",
            "account_id",
            "timestamp",
            "amount",
            "type",
            "status",
            "validation_message",
        ])
        .map_err(|e| write_failure("CSV header", e))?;

    for tx in transactions {
        writer
            .write_record([
                tx.id.as_str(),
                tx.account_id.as_str(),
                &format_timestamp(tx.timestamp),
                &format_money(tx.amount),
                tx.tx_type.as_str(),
                tx.status.as_str(),
                tx.validation_message.as_deref().unwrap_or_default(),
            ])
            .map_err(|e| write_failure("invalid transaction record", e))?;
    }

    finish(writer)
}

/// Write detected anomalies in detection order
pub fn write_anomalies_csv(anomalies: &[Anomaly], output: &mut dyn Write) -> Result<(), BatchError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "transaction_id",
            "account_id",
            "timestamp",
            "type",
            "description",
            "severity",
        ])
        .map_err(|e| write_failure("CSV header", e))?;

    for anomaly in anomalies {
        writer
            .write_record([
                anomaly.transaction_id.as_str(),
                anomaly.account_id.as_str(),
                &format_timestamp(anomaly.timestamp),
                anomaly.kind.as_str(),
                anomaly.description.as_str(),
                anomaly.severity.as_str(),
            ])
            .map_err(|e| write_failure("anomaly record", e))?;
    }

    finish(writer)
}

/// Write per-account daily summaries in the order given
pub fn write_account_summaries_csv(
    summaries: &[AccountSummary],
    output: &mut dyn Write,
) -> Result<(), BatchError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "account_id",
            "date",
            "opening_balance",
            "closing_balance",
            "total_debits",
            "total_credits",
            "transaction_count",
            "overdraft_count",
        ])
        .map_err(|e| write_failure("CSV header", e))?;

    for summary in summaries {
        writer
            .write_record([
                summary.account_id.clone(),
                summary.date.format("%Y-%m-%d").to_string(),
                format_money(summary.opening_balance),
                format_money(summary.closing_balance),
                format_money(summary.total_debits),
                format_money(summary.total_credits),
                summary.transaction_count.to_string(),
                summary.overdraft_count.to_string(),
            ])
            .map_err(|e| write_failure("summary record", e))?;
    }

    finish(writer)
}
