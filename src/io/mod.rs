//! I/O module
//!
//! Handles CSV parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, value formatting)
//! - `reader` - Account and transaction file loading
//! - `report_writer` - One writer per output report

pub mod csv_format;
pub mod reader;
pub mod report_writer;

pub use reader::{load_accounts, load_transactions, TransactionReader};
pub use report_writer::{
    write_account_summaries_csv, write_accounts_csv, write_anomalies_csv,
    write_invalid_transactions_csv, write_processed_transactions_csv,
};
