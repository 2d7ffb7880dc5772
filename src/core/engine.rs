//! Ledger engine
//!
//! This module provides the LedgerEngine that applies one day's pending
//! transactions to a working copy of the account map, delegating balance
//! mutations and rule checks to the AccountManager.
//!
//! The engine enforces:
//! - Only `pending` transactions are applied; each is stamped exactly once
//! - Business-rule rejections become a `rejected` status plus outcome message,
//!   never an error, and processing continues with the next transaction
//! - The caller's account map is never mutated
//!
//! Transactions are applied strictly in the order given. Limits and overdraft
//! state are cumulative, so callers must hand them over in chronological order.

use crate::config::RulesConfig;
use crate::core::account_manager::AccountManager;
use crate::types::{AccountMap, RuleViolation, Transaction, TransactionStatus, TransactionType};
use tracing::{debug, info, warn};

const OVERDRAWN_NOTE: &str = "Account in overdraft";
const SOURCE_OVERDRAWN_NOTE: &str = "Source account in overdraft";

/// Result of a ledger pass
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerOutput {
    /// Updated account state
    pub accounts: AccountMap,
    /// The input transactions, same order, stamped
    pub transactions: Vec<Transaction>,
}

impl LedgerOutput {
    /// Number of transactions with the given status
    pub fn count(&self, status: TransactionStatus) -> usize {
        self.transactions
            .iter()
            .filter(|tx| tx.status == status)
            .count()
    }
}

/// Ledger engine
///
/// Holds the rule configuration for a run; stateless between calls.
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    rules: RulesConfig,
}

impl LedgerEngine {
    /// Create a new LedgerEngine with the given rules
    pub fn new(rules: RulesConfig) -> Self {
        LedgerEngine { rules }
    }

    /// Apply transactions to a copy of `accounts`
    ///
    /// # Arguments
    ///
    /// * `accounts` - Account state at the start of the day
    /// * `transactions` - Validated transactions in chronological order
    ///
    /// # Returns
    ///
    /// The updated accounts and the same transactions in the same order, each
    /// pending transaction stamped `completed` or `rejected`. Transactions that
    /// were not pending are returned untouched.
    pub fn process(&self, accounts: &AccountMap, mut transactions: Vec<Transaction>) -> LedgerOutput {
        let mut manager = AccountManager::from_accounts(accounts);

        for tx in transactions.iter_mut() {
            if !tx.is_pending() {
                warn!(
                    transaction = %tx.id,
                    status = %tx.status,
                    "Skipping transaction that is not pending"
                );
                continue;
            }
            self.apply(&mut manager, tx);
        }

        let output = LedgerOutput {
            accounts: manager.into_accounts(),
            transactions,
        };
        info!(
            completed = output.count(TransactionStatus::Completed),
            rejected = output.count(TransactionStatus::Rejected),
            "Ledger pass finished"
        );
        output
    }

    /// Apply a single pending transaction and stamp it
    fn apply(&self, manager: &mut AccountManager, tx: &mut Transaction) {
        let result = match tx.tx_type {
            TransactionType::Credit => manager.credit(&tx.account_id, tx.amount).map(|()| None),
            TransactionType::Debit => manager
                .debit(&tx.account_id, tx.amount, &self.rules)
                .map(|outcome| outcome.overdrawn.then(|| OVERDRAWN_NOTE.to_string())),
            TransactionType::Transfer => match tx.destination_account_id.as_deref() {
                Some(destination) => manager
                    .transfer(&tx.account_id, destination, tx.amount, &self.rules)
                    .map(|outcome| outcome.overdrawn.then(|| SOURCE_OVERDRAWN_NOTE.to_string())),
                None => Err(RuleViolation::MissingDestination),
            },
        };

        match result {
            Ok(note) => {
                // Only the source account's activity time moves, transfers included
                manager.record_activity(&tx.account_id, tx.timestamp);
                tx.complete(note);
            }
            Err(violation) => {
                debug!(
                    transaction = %tx.id,
                    account = %tx.account_id,
                    reason = %violation,
                    "Transaction rejected"
                );
                tx.reject(violation.to_string());
            }
        }
    }
}

impl Default for LedgerEngine {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Account;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 15, 9, minute, 0).unwrap()
    }

    fn accounts(balances: &[(&str, i64)]) -> AccountMap {
        balances
            .iter()
            .map(|(id, balance)| (id.to_string(), Account::new(*id, Decimal::from(*balance))))
            .collect()
    }

    fn tx(id: &str, account: &str, amount: i64, tx_type: TransactionType, minute: u32) -> Transaction {
        Transaction::new(id, account, at(minute), Decimal::from(amount), tx_type)
    }

    #[test]
    fn test_debit_completes() {
        let engine = LedgerEngine::default();
        let input = accounts(&[("A1", 100)]);

        let output = engine.process(&input, vec![tx("T1", "A1", 50, TransactionType::Debit, 0)]);

        let account = &output.accounts["A1"];
        assert_eq!(account.balance, Decimal::from(50));
        assert_eq!(account.daily_debits, Decimal::from(50));
        assert_eq!(output.transactions[0].status, TransactionStatus::Completed);
        assert_eq!(output.transactions[0].processing_message, None);
    }

    #[test]
    fn test_debit_past_floor_is_rejected() {
        let engine = LedgerEngine::default();
        let input = accounts(&[("A1", 100)]);

        let output = engine.process(&input, vec![tx("T1", "A1", 1200, TransactionType::Debit, 0)]);

        assert_eq!(output.accounts["A1"].balance, Decimal::from(100));
        assert_eq!(output.transactions[0].status, TransactionStatus::Rejected);
        assert_eq!(
            output.transactions[0].processing_message.as_deref(),
            Some("Would exceed overdraft limit of $1000.00")
        );
    }

    #[test]
    fn test_debit_over_daily_limit_is_rejected() {
        let engine = LedgerEngine::default();
        let input = accounts(&[("A1", 20000)]);

        let output = engine.process(
            &input,
            vec![
                tx("T1", "A1", 4000, TransactionType::Debit, 0),
                tx("T2", "A1", 1500, TransactionType::Debit, 5),
                tx("T3", "A1", 1000, TransactionType::Debit, 10),
            ],
        );

        let statuses: Vec<_> = output.transactions.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![
                TransactionStatus::Completed,
                TransactionStatus::Rejected,
                TransactionStatus::Completed
            ]
        );
        assert_eq!(
            output.transactions[1].processing_message.as_deref(),
            Some("Exceeds daily withdrawal limit of $5000.00")
        );
        assert_eq!(output.accounts["A1"].daily_debits, Decimal::from(5000));
    }

    #[test]
    fn test_debit_into_overdraft_notes_it() {
        let engine = LedgerEngine::default();
        let input = accounts(&[("A1", 100)]);

        let output = engine.process(&input, vec![tx("T1", "A1", 400, TransactionType::Debit, 0)]);

        assert_eq!(output.transactions[0].status, TransactionStatus::Completed);
        assert_eq!(
            output.transactions[0].processing_message.as_deref(),
            Some("Account in overdraft")
        );
        assert_eq!(output.accounts["A1"].overdraft_count, 1);
    }

    #[test]
    fn test_credit_always_completes() {
        let engine = LedgerEngine::default();
        let input = accounts(&[("A1", -1000)]);

        let output = engine.process(&input, vec![tx("T1", "A1", 25, TransactionType::Credit, 0)]);

        assert_eq!(output.transactions[0].status, TransactionStatus::Completed);
        assert_eq!(output.accounts["A1"].balance, Decimal::from(-975));
        assert_eq!(output.accounts["A1"].daily_credits, Decimal::from(25));
    }

    #[test]
    fn test_transfer_into_overdraft() {
        let engine = LedgerEngine::default();
        let input = accounts(&[("A1", 100), ("A2", 50)]);

        let output = engine.process(
            &input,
            vec![tx("T1", "A1", 200, TransactionType::Transfer, 0).with_destination("A2")],
        );

        assert_eq!(output.transactions[0].status, TransactionStatus::Completed);
        assert_eq!(
            output.transactions[0].processing_message.as_deref(),
            Some("Source account in overdraft")
        );
        assert_eq!(output.accounts["A1"].balance, Decimal::from(-100));
        assert_eq!(output.accounts["A1"].overdraft_count, 1);
        assert_eq!(output.accounts["A2"].balance, Decimal::from(250));
    }

    #[test]
    fn test_transfer_updates_only_source_activity_time() {
        let engine = LedgerEngine::default();
        let input = accounts(&[("A1", 100), ("A2", 50)]);

        let output = engine.process(
            &input,
            vec![tx("T1", "A1", 10, TransactionType::Transfer, 7).with_destination("A2")],
        );

        assert_eq!(output.accounts["A1"].last_transaction_time, Some(at(7)));
        assert_eq!(output.accounts["A2"].last_transaction_time, None);
    }

    #[test]
    fn test_rejected_transaction_does_not_touch_activity_time() {
        let engine = LedgerEngine::default();
        let input = accounts(&[("A1", 100)]);

        let output = engine.process(&input, vec![tx("T1", "A1", 5000, TransactionType::Debit, 3)]);

        assert_eq!(output.accounts["A1"].last_transaction_time, None);
    }

    #[test]
    fn test_transfer_without_destination_is_rejected() {
        let engine = LedgerEngine::default();
        let input = accounts(&[("A1", 100)]);

        let output = engine.process(&input, vec![tx("T1", "A1", 10, TransactionType::Transfer, 0)]);

        assert_eq!(output.transactions[0].status, TransactionStatus::Rejected);
        assert_eq!(output.accounts["A1"].balance, Decimal::from(100));
    }

    #[test]
    fn test_unknown_account_is_rejected_not_created() {
        let engine = LedgerEngine::default();
        let input = accounts(&[("A1", 100)]);

        let output = engine.process(&input, vec![tx("T1", "A9", 10, TransactionType::Credit, 0)]);

        assert_eq!(output.transactions[0].status, TransactionStatus::Rejected);
        assert_eq!(
            output.transactions[0].processing_message.as_deref(),
            Some("Account A9 not found")
        );
        assert!(!output.accounts.contains_key("A9"));
    }

    #[test]
    fn test_non_pending_transactions_are_left_alone() {
        let engine = LedgerEngine::default();
        let input = accounts(&[("A1", 100)]);
        let already_done = tx("T1", "A1", 10, TransactionType::Debit, 0)
            .with_status(TransactionStatus::Completed);

        let output = engine.process(&input, vec![already_done.clone()]);

        assert_eq!(output.transactions[0], already_done);
        assert_eq!(output.accounts, input);
    }

    #[test]
    fn test_input_accounts_are_not_mutated() {
        let engine = LedgerEngine::default();
        let input = accounts(&[("A1", 100), ("A2", 0)]);
        let snapshot = input.clone();

        let _ = engine.process(
            &input,
            vec![
                tx("T1", "A1", 50, TransactionType::Debit, 0),
                tx("T2", "A1", 20, TransactionType::Transfer, 1).with_destination("A2"),
            ],
        );

        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_order_is_preserved_and_rejection_does_not_stop_processing() {
        let engine = LedgerEngine::default();
        let input = accounts(&[("A1", 0), ("A2", 0)]);

        let output = engine.process(
            &input,
            vec![
                tx("T3", "A1", 2000, TransactionType::Debit, 0),
                tx("T1", "A2", 30, TransactionType::Credit, 1),
                tx("T2", "A1", 10, TransactionType::Debit, 2),
            ],
        );

        let ids: Vec<&str> = output.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["T3", "T1", "T2"]);
        assert_eq!(output.count(TransactionStatus::Rejected), 1);
        assert_eq!(output.count(TransactionStatus::Completed), 2);
        assert_eq!(output.accounts["A1"].balance, Decimal::from(-10));
        assert_eq!(output.accounts["A2"].balance, Decimal::from(30));
    }

    #[test]
    fn test_custom_rules_are_used() {
        let rules = RulesConfig {
            overdraft_limit: Decimal::ZERO,
            ..RulesConfig::default()
        };
        let engine = LedgerEngine::new(rules);
        let input = accounts(&[("A1", 100)]);

        let output = engine.process(&input, vec![tx("T1", "A1", 101, TransactionType::Debit, 0)]);

        assert_eq!(
            output.transactions[0].processing_message.as_deref(),
            Some("Would exceed overdraft limit of $0.00")
        );
    }
}
