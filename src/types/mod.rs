//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account state and the account map
//! - `transaction`: Transaction records, types and statuses
//! - `anomaly`: Anomaly signals and daily summaries
//! - `error`: Fatal batch errors and business-rule rejections
//! - `money`: Two-decimal money formatting

pub mod account;
pub mod anomaly;
pub mod error;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountId, AccountMap};
pub use anomaly::{AccountSummary, Anomaly, AnomalyKind, Severity};
pub use error::{BatchError, RuleViolation};
pub use money::format_money;
pub use transaction::{Transaction, TransactionId, TransactionStatus, TransactionType};
