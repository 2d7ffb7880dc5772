//! Business rule configuration
//!
//! All thresholds and limits used by the ledger engine and the anomaly
//! detector live in [`RulesConfig`], which is passed into both at call time.
//! Values come from the built-in defaults, optionally overlaid by a TOML file
//! and then by individual CLI flags.
//!
//! ```toml
//! overdraft_limit = "-1000"
//! daily_withdrawal_limit = "5000"
//! large_transaction_threshold = "10000"
//! rapid_withdrawal_count = 3
//! rapid_withdrawal_window_minutes = 60
//! ```
//!
//! Any key may be omitted; missing keys keep their default.

use crate::types::BatchError;
use chrono::Duration;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Thresholds and limits for one batch run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    /// Overdraft floor: the most negative balance a debit or transfer may leave
    pub overdraft_limit: Decimal,

    /// Maximum cumulative debits per account per run (transfers are not checked)
    pub daily_withdrawal_limit: Decimal,

    /// Completed transactions at or above this amount are flagged
    pub large_transaction_threshold: Decimal,

    /// Number of debits that form a rapid withdrawal window
    pub rapid_withdrawal_count: usize,

    /// Maximum first-to-last span of a rapid withdrawal window
    pub rapid_withdrawal_window_minutes: i64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            overdraft_limit: Decimal::from(-1000),
            daily_withdrawal_limit: Decimal::from(5000),
            large_transaction_threshold: Decimal::from(10000),
            rapid_withdrawal_count: 3,
            rapid_withdrawal_window_minutes: 60,
        }
    }
}

impl RulesConfig {
    /// Load a configuration file and validate it
    ///
    /// Keys absent from the file keep their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable, is not valid
    /// TOML, contains unknown keys, or holds out-of-range values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BatchError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BatchError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => BatchError::from(e),
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self, BatchError> {
        let config: RulesConfig = toml::from_str(content)
            .map_err(|e| BatchError::invalid_config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is within its meaningful range
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.overdraft_limit > Decimal::ZERO {
            return Err(BatchError::invalid_config(format!(
                "overdraft_limit must be zero or negative, got {}",
                self.overdraft_limit
            )));
        }
        if self.daily_withdrawal_limit <= Decimal::ZERO {
            return Err(BatchError::invalid_config(format!(
                "daily_withdrawal_limit must be positive, got {}",
                self.daily_withdrawal_limit
            )));
        }
        if self.large_transaction_threshold <= Decimal::ZERO {
            return Err(BatchError::invalid_config(format!(
                "large_transaction_threshold must be positive, got {}",
                self.large_transaction_threshold
            )));
        }
        if self.rapid_withdrawal_count == 0 {
            return Err(BatchError::invalid_config(
                "rapid_withdrawal_count must be at least 1",
            ));
        }
        if self.rapid_withdrawal_window_minutes < 0 {
            return Err(BatchError::invalid_config(format!(
                "rapid_withdrawal_window_minutes must not be negative, got {}",
                self.rapid_withdrawal_window_minutes
            )));
        }
        if Duration::try_minutes(self.rapid_withdrawal_window_minutes).is_none() {
            return Err(BatchError::invalid_config(format!(
                "rapid_withdrawal_window_minutes is out of range, got {}",
                self.rapid_withdrawal_window_minutes
            )));
        }
        Ok(())
    }

    /// Magnitude of the overdraft floor, as quoted in rejection messages
    pub fn overdraft_allowance(&self) -> Decimal {
        self.overdraft_limit.abs()
    }

    /// Rapid withdrawal window as a duration
    ///
    /// Saturates at the largest representable span when the config was built
    /// without going through [`RulesConfig::validate`].
    pub fn rapid_withdrawal_window(&self) -> Duration {
        Duration::try_minutes(self.rapid_withdrawal_window_minutes).unwrap_or(Duration::MAX)
    }
}
