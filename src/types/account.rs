//! Account-related types for the daily ledger batch
//!
//! This module defines the Account structure and the account map that
//! is handed between the batch stages.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Account identifier
pub type AccountId = String;

/// Account id keyed mapping, the single source of truth for balances during a run
pub type AccountMap = HashMap<AccountId, Account>;

/// Account state for one run
///
/// Represents the balance of an account and the per-run counters the
/// ledger engine maintains while applying the day's transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Unique account identifier
    pub id: AccountId,

    /// Current balance (may be negative down to the overdraft floor)
    pub balance: Decimal,

    /// Running total of debits applied during this run
    ///
    /// Includes the source side of transfers.
    pub daily_debits: Decimal,

    /// Running total of credits applied during this run
    ///
    /// Includes the destination side of transfers.
    pub daily_credits: Decimal,

    /// Number of times the account has gone into overdraft
    ///
    /// Carried over from the loaded state and incremented by every
    /// completed debiting transaction that leaves the balance negative.
    pub overdraft_count: u32,

    /// Timestamp of the last completed transaction sourced from this account
    pub last_transaction_time: Option<DateTime<Utc>>,
}

impl Account {
    /// Create an account with the given opening balance and zeroed daily counters
    pub fn new(id: impl Into<AccountId>, balance: Decimal) -> Self {
        Account {
            id: id.into(),
            balance,
            daily_debits: Decimal::ZERO,
            daily_credits: Decimal::ZERO,
            overdraft_count: 0,
            last_transaction_time: None,
        }
    }

    /// Set the carried-over overdraft count
    pub fn with_overdraft_count(mut self, overdraft_count: u32) -> Self {
        self.overdraft_count = overdraft_count;
        self
    }

    /// Whether the balance is below zero
    pub fn is_overdrawn(&self) -> bool {
        self.balance < Decimal::ZERO
    }
}
