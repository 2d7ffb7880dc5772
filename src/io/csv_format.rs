//! CSV format handling for account and transaction files
//!
//! This module centralizes all CSV format concerns, providing:
//! - Record structures for deserialization of both input files
//! - Conversion from CSV records to domain types
//! - Value formatting shared by every report
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{Account, BatchError, Transaction, TransactionStatus, TransactionType};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::warn;

/// Row of an accounts file: `account_id,balance[,overdraft_count]`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvAccountRecord {
    pub account_id: String,
    pub balance: String,
    #[serde(default)]
    pub overdraft_count: Option<String>,
}

/// Row of a transactions file
///
/// `description` and `destination_account_id` are optional trailing columns.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvTransactionRecord {
    pub transaction_id: String,
    pub account_id: String,
    pub timestamp: String,
    pub amount: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub destination_account_id: Option<String>,
}

/// Convert a CsvAccountRecord to an Account
///
/// A malformed overdraft count is not fatal: it is logged and read as zero.
///
/// # Arguments
///
/// * `record` - The deserialized CSV record
/// * `line` - Line number in the source file, for error messages
pub fn convert_account_record(record: CsvAccountRecord, line: u64) -> Result<Account, BatchError> {
    if record.account_id.is_empty() {
        return Err(BatchError::parse_error(line, "Missing account id"));
    }

    let balance = parse_amount(&record.balance).ok_or_else(|| {
        BatchError::parse_error(
            line,
            format!(
                "Invalid balance '{}' for account {}",
                record.balance, record.account_id
            ),
        )
    })?;

    let overdraft_count = match record.overdraft_count.as_deref() {
        None | Some("") => 0,
        Some(raw) => raw.parse::<u32>().unwrap_or_else(|_| {
            warn!(
                line,
                account = %record.account_id,
                value = raw,
                "Ignoring invalid overdraft count"
            );
            0
        }),
    };

    Ok(Account::new(record.account_id, balance).with_overdraft_count(overdraft_count))
}

/// Convert a CsvTransactionRecord to a Transaction
///
/// This function:
/// - Parses the RFC 3339 timestamp into UTC
/// - Parses the amount string into a Decimal
/// - Parses type and status case-insensitively
/// - Keeps the destination only when the column is non-empty
///
/// Amount sign and account existence are not checked here; that is the job of
/// validation.
pub fn convert_transaction_record(
    record: CsvTransactionRecord,
    line: u64,
) -> Result<Transaction, BatchError> {
    let timestamp = DateTime::parse_from_rfc3339(&record.timestamp)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            BatchError::parse_error(
                line,
                format!(
                    "Invalid timestamp '{}' for tx {}: {}",
                    record.timestamp, record.transaction_id, e
                ),
            )
        })?;

    let amount = parse_amount(&record.amount).ok_or_else(|| {
        BatchError::parse_error(
            line,
            format!(
                "Invalid amount '{}' for tx {}",
                record.amount, record.transaction_id
            ),
        )
    })?;

    let tx_type = parse_transaction_type(&record.tx_type).ok_or_else(|| {
        BatchError::parse_error(
            line,
            format!(
                "Invalid transaction type: '{}' for tx {}",
                record.tx_type, record.transaction_id
            ),
        )
    })?;

    let status = parse_status(&record.status).ok_or_else(|| {
        BatchError::parse_error(
            line,
            format!(
                "Invalid status: '{}' for tx {}",
                record.status, record.transaction_id
            ),
        )
    })?;

    let mut transaction = Transaction::new(
        record.transaction_id,
        record.account_id,
        timestamp,
        amount,
        tx_type,
    )
    .with_status(status);
    transaction.description = record.description.filter(|d| !d.is_empty());
    transaction.destination_account_id = record.destination_account_id.filter(|d| !d.is_empty());

    Ok(transaction)
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

fn parse_transaction_type(raw: &str) -> Option<TransactionType> {
    match raw.to_lowercase().as_str() {
        "credit" => Some(TransactionType::Credit),
        "debit" => Some(TransactionType::Debit),
        "transfer" => Some(TransactionType::Transfer),
        _ => None,
    }
}

fn parse_status(raw: &str) -> Option<TransactionStatus> {
    match raw.to_lowercase().as_str() {
        "pending" => Some(TransactionStatus::Pending),
        "completed" => Some(TransactionStatus::Completed),
        "rejected" => Some(TransactionStatus::Rejected),
        _ => None,
    }
}

/// RFC 3339 with whole seconds and a `Z` suffix
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}
