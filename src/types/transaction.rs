//! Transaction-related types for the daily ledger batch
//!
//! This module defines transaction types, statuses and the transaction
//! record that flows through validation, the ledger engine and reporting.

use super::account::AccountId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// Transaction identifier
pub type TransactionId = String;

/// Transaction types supported by the ledger engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// Credit funds to the source account
    ///
    /// Always succeeds.
    Credit,

    /// Debit funds from the source account
    ///
    /// Subject to the daily withdrawal limit and the overdraft floor.
    Debit,

    /// Move funds from the source account to the destination account
    ///
    /// Subject to the overdraft floor on the source side only. Both sides
    /// are applied together or not at all.
    Transfer,
}

impl TransactionType {
    /// Lowercase name as read from and written to CSV
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Debit => "debit",
            TransactionType::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Not yet applied; the only status the ledger engine will act on
    Pending,
    /// Applied to account balances
    Completed,
    /// Refused by a business rule; balances untouched
    Rejected,
}

impl TransactionStatus {
    /// Lowercase name as read from and written to CSV
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transaction of the day
///
/// Created by ingestion with the status found in the input file, filtered by
/// validation, then stamped exactly once by the ledger engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: TransactionId,

    /// Source account (the only account for credits and debits)
    pub account_id: AccountId,

    /// Destination account, meaningful only for transfers
    pub destination_account_id: Option<AccountId>,

    /// When the transaction happened
    pub timestamp: DateTime<Utc>,

    /// Transaction amount, positive for every valid transaction
    pub amount: Decimal,

    pub tx_type: TransactionType,

    pub status: TransactionStatus,

    /// Free text from the input file
    pub description: Option<String>,

    /// Why validation refused the transaction
    pub validation_message: Option<String>,

    /// Outcome message set by the ledger engine
    ///
    /// Explains a rejection, or carries an informational note such as the
    /// account entering overdraft on a completed transaction.
    pub processing_message: Option<String>,
}

impl Transaction {
    /// Create a pending transaction with no messages
    pub fn new(
        id: impl Into<TransactionId>,
        account_id: impl Into<AccountId>,
        timestamp: DateTime<Utc>,
        amount: Decimal,
        tx_type: TransactionType,
    ) -> Self {
        Transaction {
            id: id.into(),
            account_id: account_id.into(),
            destination_account_id: None,
            timestamp,
            amount,
            tx_type,
            status: TransactionStatus::Pending,
            description: None,
            validation_message: None,
            processing_message: None,
        }
    }

    /// Set the destination account
    pub fn with_destination(mut self, destination: impl Into<AccountId>) -> Self {
        self.destination_account_id = Some(destination.into());
        self
    }

    /// Set the status as found in the input
    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    /// Stamp the transaction as completed, with an optional note
    pub fn complete(&mut self, note: Option<String>) {
        self.status = TransactionStatus::Completed;
        self.processing_message = note;
    }

    /// Stamp the transaction as rejected with the reason
    pub fn reject(&mut self, reason: String) {
        self.status = TransactionStatus::Rejected;
        self.processing_message = Some(reason);
    }
}
