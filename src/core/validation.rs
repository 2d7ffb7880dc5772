//! Pre-processing validation
//!
//! Splits ingested transactions into those the ledger engine may act on and
//! those it must never see. Only the first failing check is reported.

use crate::types::{AccountMap, Transaction, TransactionStatus, TransactionType};
use rust_decimal::Decimal;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

/// Why a transaction failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Already rejected in input file")]
    AlreadyRejected,

    #[error("Only pending transactions can be processed")]
    NotPending,

    #[error("Transaction amount must be positive")]
    NonPositiveAmount,

    #[error("Account {0} does not exist")]
    UnknownAccount(String),

    #[error("Transfer is missing destination account")]
    MissingDestination,

    #[error("Destination account {0} does not exist")]
    UnknownDestination(String),

    #[error("Source and destination accounts cannot be the same")]
    SelfTransfer,

    #[error("Duplicate transaction id {0}")]
    DuplicateId(String),
}

/// Transactions split by validation outcome, both in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    pub valid: Vec<Transaction>,
    /// Each carries its `validation_message`
    pub invalid: Vec<Transaction>,
}

/// Check every transaction against the loaded accounts
pub fn validate_transactions(
    transactions: Vec<Transaction>,
    accounts: &AccountMap,
) -> ValidationOutcome {
    let mut seen_ids: HashSet<String> = HashSet::with_capacity(transactions.len());
    let mut outcome = ValidationOutcome::default();

    for mut tx in transactions {
        let first_occurrence = seen_ids.insert(tx.id.clone());

        match check(&tx, accounts, first_occurrence) {
            Ok(()) => outcome.valid.push(tx),
            Err(failure) => {
                debug!(transaction = %tx.id, reason = %failure, "Transaction failed validation");
                tx.validation_message = Some(failure.to_string());
                outcome.invalid.push(tx);
            }
        }
    }

    info!(
        valid = outcome.valid.len(),
        invalid = outcome.invalid.len(),
        "Validation finished"
    );
    outcome
}

fn check(
    tx: &Transaction,
    accounts: &AccountMap,
    first_occurrence: bool,
) -> Result<(), ValidationFailure> {
    match tx.status {
        TransactionStatus::Pending => {}
        TransactionStatus::Rejected => return Err(ValidationFailure::AlreadyRejected),
        TransactionStatus::Completed => return Err(ValidationFailure::NotPending),
    }

    if tx.amount <= Decimal::ZERO {
        return Err(ValidationFailure::NonPositiveAmount);
    }

    if !accounts.contains_key(&tx.account_id) {
        return Err(ValidationFailure::UnknownAccount(tx.account_id.clone()));
    }

    if tx.tx_type == TransactionType::Transfer {
        let destination = tx
            .destination_account_id
            .as_deref()
            .filter(|dest| !dest.is_empty())
            .ok_or(ValidationFailure::MissingDestination)?;

        if !accounts.contains_key(destination) {
            return Err(ValidationFailure::UnknownDestination(destination.to_string()));
        }
        if destination == tx.account_id {
            return Err(ValidationFailure::SelfTransfer);
        }
    }

    if !first_occurrence {
        return Err(ValidationFailure::DuplicateId(tx.id.clone()));
    }

    Ok(())
}
