//! Per-account daily summaries
//!
//! Opening balances are not stored anywhere; they are reconstructed from the
//! closing balance by reversing every completed transaction of the day.

use crate::types::{AccountMap, AccountSummary, Transaction, TransactionType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Build one summary per account, sorted by account id
///
/// A transfer counts as a debit (and a transaction) on the source and as a
/// credit (and a transaction) on the destination. Only completed transactions
/// contribute.
pub fn summarize_accounts(
    accounts: &AccountMap,
    transactions: &[Transaction],
    date: NaiveDate,
) -> Vec<AccountSummary> {
    let mut summaries: BTreeMap<&str, AccountSummary> = accounts
        .iter()
        .map(|(id, account)| {
            (
                id.as_str(),
                AccountSummary {
                    account_id: id.clone(),
                    date,
                    opening_balance: account.balance,
                    closing_balance: account.balance,
                    total_debits: Decimal::ZERO,
                    total_credits: Decimal::ZERO,
                    transaction_count: 0,
                    overdraft_count: account.overdraft_count,
                },
            )
        })
        .collect();

    for tx in transactions.iter().filter(|tx| tx.is_completed()) {
        match tx.tx_type {
            TransactionType::Credit => {
                if let Some(summary) = summaries.get_mut(tx.account_id.as_str()) {
                    reverse_credit(summary, tx.amount);
                }
            }
            TransactionType::Debit => {
                if let Some(summary) = summaries.get_mut(tx.account_id.as_str()) {
                    reverse_debit(summary, tx.amount);
                }
            }
            TransactionType::Transfer => {
                if let Some(summary) = summaries.get_mut(tx.account_id.as_str()) {
                    reverse_debit(summary, tx.amount);
                }
                if let Some(summary) = tx
                    .destination_account_id
                    .as_deref()
                    .and_then(|dest| summaries.get_mut(dest))
                {
                    reverse_credit(summary, tx.amount);
                }
            }
        }
    }

    summaries.into_values().collect()
}

fn reverse_credit(summary: &mut AccountSummary, amount: Decimal) {
    summary.opening_balance = clamped(summary.opening_balance.checked_sub(amount), Decimal::MIN);
    summary.total_credits = clamped(summary.total_credits.checked_add(amount), Decimal::MAX);
    summary.transaction_count = summary.transaction_count.saturating_add(1);
}

fn reverse_debit(summary: &mut AccountSummary, amount: Decimal) {
    summary.opening_balance = clamped(summary.opening_balance.checked_add(amount), Decimal::MAX);
    summary.total_debits = clamped(summary.total_debits.checked_add(amount), Decimal::MAX);
    summary.transaction_count = summary.transaction_count.saturating_add(1);
}

// Totals pin to the representable bound instead of overflowing
fn clamped(value: Option<Decimal>, bound: Decimal) -> Decimal {
    value.unwrap_or(bound)
}
