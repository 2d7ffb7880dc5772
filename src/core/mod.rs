//! Core business logic module
//!
//! This module contains the daily batch processing components:
//! - `validation` - Splits ingested transactions into valid and invalid
//! - `engine` - Applies the day's transactions to the ledger
//! - `account_manager` - Account state management and balance operations
//! - `detector` - Post-processing anomaly scans
//! - `summary` - Per-account daily summaries

pub mod account_manager;
pub mod detector;
pub mod engine;
pub mod summary;
pub mod validation;

pub use account_manager::{AccountManager, DebitOutcome};
pub use detector::AnomalyDetector;
pub use engine::{LedgerEngine, LedgerOutput};
pub use summary::summarize_accounts;
pub use validation::{validate_transactions, ValidationFailure, ValidationOutcome};
