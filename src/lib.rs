//! Daily Ledger Batch Library
//! # Overview
//!
//! This library runs an end-of-day batch over one day's transactions: it
//! applies them to account balances under withdrawal and overdraft rules, then
//! scans the outcome for suspicious activity.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Transaction, Anomaly, errors)
//! - [`config`] - Business rule thresholds and limits
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::validation`] - Pre-processing checks
//!   - [`core::engine`] - Ledger pass over the day's transactions
//!   - [`core::account_manager`] - Account state management and balance operations
//!   - [`core::detector`] - Anomaly scans
//!   - [`core::summary`] - Per-account daily summaries
//! - [`io`] - CSV input and report output
//! - [`pipeline`] - One processing date end to end
//!
//! # Transaction Types
//!
//! - **Credit**: Add funds to an account; always succeeds
//! - **Debit**: Remove funds, subject to the daily withdrawal limit and the
//!   overdraft floor
//! - **Transfer**: Move funds between two accounts, subject to the overdraft
//!   floor on the source side; both sides apply or neither does
//!
//! # Anomalies
//!
//! After the ledger pass, completed transactions are scanned by
//! [`AnomalyDetector`]. See [`AnomalyKind`] for the signals it raises.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod pipeline;
pub mod types;

pub use config::RulesConfig;
pub use core::{AnomalyDetector, LedgerEngine, LedgerOutput};
pub use pipeline::{process_day, BatchReport, DailyBatch, DayOutcome};
pub use types::{
    Account, AccountMap, AccountSummary, Anomaly, AnomalyKind, BatchError, RuleViolation,
    Severity, Transaction, TransactionStatus, TransactionType,
};
