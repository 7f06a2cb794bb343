//! Sheetcalc - spreadsheet-compatible conditional aggregation and calendar math
//!
//! This library provides the data functions spreadsheet users expect, over
//! plain in-memory tables:
//!
//! # Features
//!
//! - Multi-criteria aggregation (SUMIFS, COUNTIFS, AVERAGEIFS, MAXIFS, MINIFS)
//!   by column/value criteria or by precomputed boolean masks
//! - Serial dates in the 1900 date system, month arithmetic, DAYS360, YEARFRAC
//! - Business-day offsets and counts with holiday lists
//! - WEEKDAY numbering modes, week numbers, DATEDIF
//! - Lookups, text helpers and column statistics
//!
//! # Example
//!
//! ```
//! use sheetcalc::core::aggregate::{averageifs, sumifs};
//! use sheetcalc::types::{ColumnValue, Table, Value};
//!
//! let sales = Table::new("sales")
//!     .with_column("region", ColumnValue::texts(["EMEA", "US", "EMEA"]))
//!     .with_column("amount", ColumnValue::numbers([100.0, 250.0, 300.0]));
//!
//! let emea = sumifs(&sales, "amount", &[Value::from("region"), Value::from("EMEA")])?;
//! assert_eq!(emea, 400.0);
//!
//! // No matching rows: SUM is 0, AVERAGE is NaN
//! let apac = averageifs(&sales, "amount", &[Value::from("region"), Value::from("APAC")])?;
//! assert!(apac.is_nan());
//! # Ok::<(), sheetcalc::error::CalcError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod parser;
pub mod types;

// Re-export commonly used types
pub use error::{CalcError, CalcResult};
pub use types::{Column, ColumnValue, Table, Value};
