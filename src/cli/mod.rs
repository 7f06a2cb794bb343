//! CLI command handlers

pub mod commands;

pub use commands::{
    aggregate, days360, edate, eomonth, from_serial, networkdays, serial, weekday, workday,
    yearfrac,
};
