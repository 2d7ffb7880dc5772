//! Anomaly detection over a finished ledger pass
//!
//! Three independent scans over the completed transactions:
//!
//! - **large transaction** - amount at or above the configured threshold
//! - **account overdraft** - the source account's *final* balance is negative;
//!   raised once per completed transaction on that account, with severity
//!   growing with the depth of the overdraft
//! - **rapid withdrawals** - at least N debits on one account inside the
//!   configured time window; at most one signal per account
//!
//! Rejected and pending transactions are ignored. Detection cannot fail.

use crate::config::RulesConfig;
use crate::types::{
    format_money, AccountMap, Anomaly, AnomalyKind, Severity, Transaction, TransactionType,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::info;

/// Scans stamped transactions for risk signals
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    rules: RulesConfig,
}

impl AnomalyDetector {
    /// Create a detector using the thresholds in `rules`
    pub fn new(rules: RulesConfig) -> Self {
        AnomalyDetector { rules }
    }

    /// Run all scans and concatenate their findings
    ///
    /// # Arguments
    ///
    /// * `transactions` - Stamped transactions in the order they were applied
    /// * `accounts` - Account state after the ledger pass
    ///
    /// The order of anomalies across categories carries no meaning.
    pub fn detect(&self, transactions: &[Transaction], accounts: &AccountMap) -> Vec<Anomaly> {
        let completed: Vec<&Transaction> =
            transactions.iter().filter(|tx| tx.is_completed()).collect();

        let mut anomalies = self.large_transactions(&completed);
        anomalies.extend(self.overdrafts(&completed, accounts));
        anomalies.extend(self.rapid_withdrawals(&completed));

        info!(
            scanned = completed.len(),
            anomalies = anomalies.len(),
            "Anomaly scan finished"
        );
        anomalies
    }

    fn large_transactions(&self, completed: &[&Transaction]) -> Vec<Anomaly> {
        completed
            .iter()
            .filter(|tx| tx.amount >= self.rules.large_transaction_threshold)
            .map(|tx| Anomaly {
                transaction_id: tx.id.clone(),
                account_id: tx.account_id.clone(),
                timestamp: tx.timestamp,
                kind: AnomalyKind::LargeTransaction,
                description: format!("Large transaction: ${}", format_money(tx.amount)),
                severity: Severity::Medium,
            })
            .collect()
    }

    fn overdrafts(&self, completed: &[&Transaction], accounts: &AccountMap) -> Vec<Anomaly> {
        completed
            .iter()
            .filter_map(|tx| {
                let account = accounts.get(&tx.account_id)?;
                account.is_overdrawn().then(|| Anomaly {
                    transaction_id: tx.id.clone(),
                    account_id: tx.account_id.clone(),
                    timestamp: tx.timestamp,
                    kind: AnomalyKind::AccountOverdraft,
                    description: format!(
                        "Account in overdraft: ${}",
                        format_money(account.balance)
                    ),
                    severity: self.overdraft_severity(account.balance),
                })
            })
            .collect()
    }

    /// Severity by depth: past 80% of the floor is high, past half is medium
    fn overdraft_severity(&self, balance: Decimal) -> Severity {
        let floor = self.rules.overdraft_limit;
        if balance < floor * Decimal::new(8, 1) {
            Severity::High
        } else if balance < floor * Decimal::new(5, 1) {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    fn rapid_withdrawals(&self, completed: &[&Transaction]) -> Vec<Anomaly> {
        let count = self.rules.rapid_withdrawal_count;
        if count == 0 {
            return Vec::new();
        }
        let window = self.rules.rapid_withdrawal_window();

        // Input order is kept within each account; it is assumed chronological
        let mut by_account: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
        for tx in completed
            .iter()
            .copied()
            .filter(|tx| tx.tx_type == TransactionType::Debit)
        {
            by_account.entry(tx.account_id.as_str()).or_default().push(tx);
        }

        by_account
            .into_iter()
            .filter_map(|(account_id, withdrawals)| {
                withdrawals.windows(count).find_map(|run| {
                    let first = run[0];
                    let last = run[count - 1];
                    let span = last.timestamp - first.timestamp;
                    if span > window {
                        return None;
                    }
                    let total = run
                        .iter()
                        .try_fold(Decimal::ZERO, |acc, tx| acc.checked_add(tx.amount))
                        .unwrap_or(Decimal::MAX);
                    Some(Anomaly {
                        transaction_id: last.id.clone(),
                        account_id: account_id.to_string(),
                        timestamp: last.timestamp,
                        kind: AnomalyKind::RapidWithdrawals,
                        description: format!(
                            "{} withdrawals totaling ${} in {} minutes",
                            count,
                            format_money(total),
                            span.num_minutes()
                        ),
                        severity: Severity::High,
                    })
                })
            })
            .collect()
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}
