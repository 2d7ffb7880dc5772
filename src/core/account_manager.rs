//! Account management module
//!
//! This module provides the `AccountManager` struct which owns the working
//! copy of the account map for the duration of a ledger pass and applies
//! balance mutations under the business rules.
//!
//! The AccountManager is responsible for:
//! - Seeding a private copy of the caller's accounts (the caller's map is never touched)
//! - Applying credits, debits and transfers with checked arithmetic
//! - Enforcing the daily withdrawal limit and the overdraft floor
//! - Tracking daily counters, overdraft counts and last activity
//!
//! Every mutation computes the replacement account value first and only
//! commits it once all checks passed, so a rejected operation leaves the
//! stored accounts exactly as they were.

use crate::config::RulesConfig;
use crate::types::{Account, AccountMap, RuleViolation};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Result of a successful debiting operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebitOutcome {
    /// The debited account's balance is negative after the operation
    pub overdrawn: bool,
}

/// Owns the working account map of a ledger pass
#[derive(Debug, Clone)]
pub struct AccountManager {
    /// Map of account IDs to account states
    accounts: AccountMap,
}

impl AccountManager {
    /// Create an AccountManager seeded from a copy of the given accounts
    pub fn from_accounts(accounts: &AccountMap) -> Self {
        AccountManager {
            accounts: accounts.clone(),
        }
    }

    /// Look up an account
    pub fn get(&self, account_id: &str) -> Option<&Account> {
        self.accounts.get(account_id)
    }

    fn account(&self, account_id: &str) -> Result<&Account, RuleViolation> {
        self.accounts
            .get(account_id)
            .ok_or_else(|| RuleViolation::account_not_found(account_id))
    }

    /// Hand back the working map
    pub fn into_accounts(self) -> AccountMap {
        self.accounts
    }

    /// Credit funds to an account
    ///
    /// Increases the balance and the daily credit total. Credits are never
    /// refused by a business rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the balance would
    /// overflow.
    pub fn credit(&mut self, account_id: &str, amount: Decimal) -> Result<(), RuleViolation> {
        let updated = credited(self.account(account_id)?, amount)?;
        self.accounts.insert(account_id.to_string(), updated);
        Ok(())
    }

    /// Debit funds from an account
    ///
    /// Checks, in this order:
    /// 1. the day's cumulative debits plus `amount` must not exceed the daily withdrawal limit
    /// 2. the balance after the debit must not fall below the overdraft floor
    ///
    /// On success the balance decreases, the daily debit total increases and,
    /// if the resulting balance is negative, the overdraft count is incremented.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule. The account is unchanged on error.
    pub fn debit(
        &mut self,
        account_id: &str,
        amount: Decimal,
        rules: &RulesConfig,
    ) -> Result<DebitOutcome, RuleViolation> {
        let account = self.account(account_id)?;

        let projected_debits = account
            .daily_debits
            .checked_add(amount)
            .ok_or_else(|| RuleViolation::arithmetic_overflow("debit", account_id))?;
        if projected_debits > rules.daily_withdrawal_limit {
            return Err(RuleViolation::DailyLimitExceeded {
                limit: rules.daily_withdrawal_limit,
            });
        }

        let (updated, outcome) = debited(account, amount, rules, "debit")?;
        self.accounts.insert(account_id.to_string(), updated);
        Ok(outcome)
    }

    /// Move funds from one account to another
    ///
    /// Only the source side can refuse the transfer (overdraft floor); the
    /// daily withdrawal limit is not checked for transfers, although the
    /// amount still counts towards the source's daily debits. Both updated
    /// accounts are computed before either is stored, so the pair is applied
    /// together or not at all.
    ///
    /// # Errors
    ///
    /// Returns an error if either account is missing, source and destination
    /// are the same, the floor would be breached, or arithmetic would overflow.
    pub fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Decimal,
        rules: &RulesConfig,
    ) -> Result<DebitOutcome, RuleViolation> {
        if from == to {
            return Err(RuleViolation::SelfTransfer);
        }

        let source = self.account(from)?;
        let destination = self.account(to)?;

        let (source, outcome) = debited(source, amount, rules, "transfer")?;
        let destination = credited(destination, amount)?;

        self.accounts.insert(from.to_string(), source);
        self.accounts.insert(to.to_string(), destination);
        Ok(outcome)
    }

    /// Record the timestamp of the latest completed transaction on an account
    pub fn record_activity(&mut self, account_id: &str, timestamp: DateTime<Utc>) {
        if let Some(account) = self.accounts.get_mut(account_id) {
            account.last_transaction_time = Some(timestamp);
        }
    }
}

/// Copy of `account` with `amount` credited
fn credited(account: &Account, amount: Decimal) -> Result<Account, RuleViolation> {
    let balance = account
        .balance
        .checked_add(amount)
        .ok_or_else(|| RuleViolation::arithmetic_overflow("credit", &account.id))?;
    let daily_credits = account
        .daily_credits
        .checked_add(amount)
        .ok_or_else(|| RuleViolation::arithmetic_overflow("credit", &account.id))?;

    Ok(Account {
        balance,
        daily_credits,
        ..account.clone()
    })
}

/// Copy of `account` with `amount` debited, after the overdraft floor check
fn debited(
    account: &Account,
    amount: Decimal,
    rules: &RulesConfig,
    operation: &str,
) -> Result<(Account, DebitOutcome), RuleViolation> {
    let balance = account
        .balance
        .checked_sub(amount)
        .ok_or_else(|| RuleViolation::arithmetic_overflow(operation, &account.id))?;
    if balance < rules.overdraft_limit {
        return Err(RuleViolation::OverdraftLimitExceeded {
            limit: rules.overdraft_allowance(),
        });
    }

    let daily_debits = account
        .daily_debits
        .checked_add(amount)
        .ok_or_else(|| RuleViolation::arithmetic_overflow(operation, &account.id))?;

    let overdrawn = balance < Decimal::ZERO;
    let overdraft_count = if overdrawn {
        account.overdraft_count.saturating_add(1)
    } else {
        account.overdraft_count
    };

    Ok((
        Account {
            balance,
            daily_debits,
            overdraft_count,
            ..account.clone()
        },
        DebitOutcome { overdrawn },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn manager(balances: &[(&str, i64)]) -> AccountManager {
        let accounts: AccountMap = balances
            .iter()
            .map(|(id, balance)| (id.to_string(), Account::new(*id, Decimal::from(*balance))))
            .collect();
        AccountManager::from_accounts(&accounts)
    }

    #[test]
    fn test_from_accounts_copies_map() {
        let mut original = AccountMap::new();
        original.insert("A1".to_string(), Account::new("A1", Decimal::from(100)));

        let mut manager = AccountManager::from_accounts(&original);
        manager.credit("A1", Decimal::from(50)).unwrap();

        assert_eq!(original["A1"].balance, Decimal::from(100));
        assert_eq!(manager.get("A1").unwrap().balance, Decimal::from(150));
    }

    #[test]
    fn test_credit_increases_balance_and_daily_credits() {
        let mut manager = manager(&[("A1", 100)]);

        manager.credit("A1", Decimal::new(2550, 2)).unwrap();

        let account = manager.get("A1").unwrap();
        assert_eq!(account.balance, Decimal::new(12550, 2));
        assert_eq!(account.daily_credits, Decimal::new(2550, 2));
        assert_eq!(account.daily_debits, Decimal::ZERO);
    }

    #[test]
    fn test_credit_unknown_account() {
        let mut manager = manager(&[("A1", 100)]);

        let result = manager.credit("A9", Decimal::from(10));

        assert_eq!(result, Err(RuleViolation::account_not_found("A9")));
    }

    #[test]
    fn test_credit_overflow_leaves_account_unchanged() {
        let mut accounts = AccountMap::new();
        accounts.insert("A1".to_string(), Account::new("A1", Decimal::MAX));
        let mut manager = AccountManager::from_accounts(&accounts);

        let result = manager.credit("A1", Decimal::ONE);

        assert!(matches!(result, Err(RuleViolation::ArithmeticOverflow { .. })));
        assert_eq!(manager.get("A1").unwrap().balance, Decimal::MAX);
    }

    #[test]
    fn test_debit_within_limits() {
        let rules = RulesConfig::default();
        let mut manager = manager(&[("A1", 100)]);

        let outcome = manager.debit("A1", Decimal::from(50), &rules).unwrap();

        assert!(!outcome.overdrawn);
        let account = manager.get("A1").unwrap();
        assert_eq!(account.balance, Decimal::from(50));
        assert_eq!(account.daily_debits, Decimal::from(50));
        assert_eq!(account.overdraft_count, 0);
    }

    #[test]
    fn test_debit_into_overdraft_increments_count() {
        let rules = RulesConfig::default();
        let mut manager = manager(&[("A1", 100)]);

        let outcome = manager.debit("A1", Decimal::from(300), &rules).unwrap();

        assert!(outcome.overdrawn);
        let account = manager.get("A1").unwrap();
        assert_eq!(account.balance, Decimal::from(-200));
        assert_eq!(account.overdraft_count, 1);
    }

    #[test]
    fn test_debit_exactly_to_floor_is_allowed() {
        let rules = RulesConfig::default();
        let mut manager = manager(&[("A1", 0)]);

        assert!(manager.debit("A1", Decimal::from(1000), &rules).is_ok());
        assert_eq!(manager.get("A1").unwrap().balance, Decimal::from(-1000));
    }

    #[test]
    fn test_debit_below_floor_is_rejected() {
        let rules = RulesConfig::default();
        let mut manager = manager(&[("A1", 100)]);

        let result = manager.debit("A1", Decimal::from(1200), &rules);

        assert_eq!(
            result,
            Err(RuleViolation::OverdraftLimitExceeded {
                limit: Decimal::from(1000)
            })
        );
        let account = manager.get("A1").unwrap();
        assert_eq!(account.balance, Decimal::from(100));
        assert_eq!(account.daily_debits, Decimal::ZERO);
    }

    #[test]
    fn test_daily_limit_checked_before_floor() {
        let rules = RulesConfig::default();
        let mut manager = manager(&[("A1", 0)]);

        // Breaches both the daily limit and the floor; the limit is reported
        let result = manager.debit("A1", Decimal::from(6000), &rules);

        assert_eq!(
            result,
            Err(RuleViolation::DailyLimitExceeded {
                limit: Decimal::from(5000)
            })
        );
    }

    #[test]
    fn test_daily_limit_is_cumulative() {
        let rules = RulesConfig::default();
        let mut manager = manager(&[("A1", 10000)]);

        manager.debit("A1", Decimal::from(3000), &rules).unwrap();
        manager.debit("A1", Decimal::from(2000), &rules).unwrap();
        let result = manager.debit("A1", Decimal::new(1, 2), &rules);

        assert!(matches!(result, Err(RuleViolation::DailyLimitExceeded { .. })));
        let account = manager.get("A1").unwrap();
        assert_eq!(account.daily_debits, Decimal::from(5000));
        assert_eq!(account.balance, Decimal::from(5000));
    }

    #[test]
    fn test_transfer_moves_funds() {
        let rules = RulesConfig::default();
        let mut manager = manager(&[("A1", 100), ("A2", 50)]);

        let outcome = manager
            .transfer("A1", "A2", Decimal::from(200), &rules)
            .unwrap();

        assert!(outcome.overdrawn);
        let source = manager.get("A1").unwrap();
        let destination = manager.get("A2").unwrap();
        assert_eq!(source.balance, Decimal::from(-100));
        assert_eq!(source.daily_debits, Decimal::from(200));
        assert_eq!(source.overdraft_count, 1);
        assert_eq!(destination.balance, Decimal::from(250));
        assert_eq!(destination.daily_credits, Decimal::from(200));
        assert_eq!(destination.overdraft_count, 0);
    }

    #[test]
    fn test_transfer_ignores_daily_limit() {
        let rules = RulesConfig::default();
        let mut manager = manager(&[("A1", 8000), ("A2", 0)]);

        manager
            .transfer("A1", "A2", Decimal::from(7000), &rules)
            .unwrap();

        assert_eq!(manager.get("A1").unwrap().daily_debits, Decimal::from(7000));
    }

    #[test]
    fn test_rejected_transfer_changes_neither_side() {
        let rules = RulesConfig::default();
        let mut manager = manager(&[("A1", 100), ("A2", 50)]);
        let before = manager.clone().into_accounts();

        let result = manager.transfer("A1", "A2", Decimal::from(1101), &rules);

        assert!(matches!(result, Err(RuleViolation::OverdraftLimitExceeded { .. })));
        assert_eq!(manager.into_accounts(), before);
    }

    #[test]
    fn test_transfer_to_missing_destination_changes_nothing() {
        let rules = RulesConfig::default();
        let mut manager = manager(&[("A1", 100)]);

        let result = manager.transfer("A1", "A9", Decimal::from(10), &rules);

        assert_eq!(result, Err(RuleViolation::account_not_found("A9")));
        assert_eq!(manager.get("A1").unwrap().balance, Decimal::from(100));
    }

    #[test]
    fn test_self_transfer_is_refused() {
        let rules = RulesConfig::default();
        let mut manager = manager(&[("A1", 100)]);

        let result = manager.transfer("A1", "A1", Decimal::from(10), &rules);

        assert_eq!(result, Err(RuleViolation::SelfTransfer));
        assert_eq!(manager.get("A1").unwrap().balance, Decimal::from(100));
    }

    #[test]
    fn test_record_activity() {
        let mut manager = manager(&[("A1", 100)]);
        let ts = Utc.with_ymd_and_hms(2025, 4, 15, 12, 30, 0).unwrap();

        manager.record_activity("A1", ts);
        manager.record_activity("A9", ts);

        assert_eq!(manager.get("A1").unwrap().last_transaction_time, Some(ts));
        assert!(manager.get("A9").is_none());
    }
}
