//! Error types for the daily ledger batch
//!
//! Two distinct classes live here:
//!
//! - [`BatchError`] - fatal, run-aborting failures (missing files, malformed
//!   rows, bad configuration). A run that hits one of these stops before the
//!   updated account state is written.
//! - [`RuleViolation`] - business-rule rejections. These are expected outcomes,
//!   never returned from a run: the ledger engine turns them into a `rejected`
//!   status and uses their text as the transaction's outcome message.

use crate::types::money::format_money;
use rust_decimal::Decimal;
use thiserror::Error;

/// Fatal error for a batch run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchError {
    /// Input file not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// A row could not be parsed into a typed value
    ///
    /// Structural errors are not skipped: the run aborts rather than apply a
    /// partial, inconsistent input set.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Input file has no data rows
    #[error("{path} is empty or missing data rows")]
    EmptyInput {
        /// The offending file
        path: String,
    },

    /// Configuration value out of range or unreadable configuration file
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration
        message: String,
    },
}

impl From<std::io::Error> for BatchError {
    fn from(error: std::io::Error) -> Self {
        BatchError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BatchError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        BatchError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl BatchError {
    /// Create a ParseError at a known line
    pub fn parse_error(line: u64, message: impl Into<String>) -> Self {
        BatchError::ParseError {
            line: Some(line),
            message: message.into(),
        }
    }

    /// Create an EmptyInput error
    pub fn empty_input(path: &std::path::Path) -> Self {
        BatchError::EmptyInput {
            path: path.display().to_string(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        BatchError::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Business rule that refused a transaction
///
/// The `Display` text is what ends up in the transaction's outcome message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleViolation {
    /// Debit would take the day's cumulative debits over the limit
    #[error("Exceeds daily withdrawal limit of ${}", format_money(*.limit))]
    DailyLimitExceeded {
        /// Configured daily withdrawal limit
        limit: Decimal,
    },

    /// Debit or transfer would take the balance below the overdraft floor
    #[error("Would exceed overdraft limit of ${}", format_money(*.limit))]
    OverdraftLimitExceeded {
        /// Magnitude of the overdraft floor
        limit: Decimal,
    },

    /// Referenced account is not in the account map
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The missing account id
        account: String,
    },

    /// Transfer reached the engine without a destination
    #[error("Transfer is missing destination account")]
    MissingDestination,

    /// Transfer names the same account on both sides
    #[error("Source and destination accounts cannot be the same")]
    SelfTransfer,

    /// Balance arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account being updated
        account: String,
    },
}

impl RuleViolation {
    /// Create an AccountNotFound violation
    pub fn account_not_found(account: &str) -> Self {
        RuleViolation::AccountNotFound {
            account: account.to_string(),
        }
    }

    /// Create an ArithmeticOverflow violation
    pub fn arithmetic_overflow(operation: &str, account: &str) -> Self {
        RuleViolation::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }
}
