//! Anomaly and summary records produced after the ledger pass

use super::account::AccountId;
use super::transaction::TransactionId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// Category of a detected anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    LargeTransaction,
    AccountOverdraft,
    RapidWithdrawals,
}

impl AnomalyKind {
    /// Name used in the `anomaly_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::LargeTransaction => "large_transaction",
            AnomalyKind::AccountOverdraft => "account_overdraft",
            AnomalyKind::RapidWithdrawals => "rapid_withdrawals",
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk level attached to an anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Lowercase name used in the `severity` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A risk signal raised by the anomaly detector
///
/// Read-only once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Anomaly {
    /// Transaction that triggered the signal
    pub transaction_id: TransactionId,
    /// Account the signal is about
    pub account_id: AccountId,
    /// Timestamp of the triggering transaction
    pub timestamp: DateTime<Utc>,
    pub kind: AnomalyKind,
    pub description: String,
    pub severity: Severity,
}

/// Per-account daily summary
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub account_id: AccountId,
    pub date: NaiveDate,
    /// Balance before the day's completed transactions, reconstructed backwards
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    pub total_debits: Decimal,
    pub total_credits: Decimal,
    pub transaction_count: u32,
    pub overdraft_count: u32,
}
