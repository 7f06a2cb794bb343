//! Calculation engine: conditional aggregation, calendar and day-count math,
//! plus the supporting logical, lookup, text and statistics functions

pub mod aggregate;
pub mod criteria;
pub mod dates;
pub mod day_count;
pub mod logical;
pub mod lookup;
pub mod stats;
pub mod text;

pub use aggregate::{aggregate, aggregate_by_mask, AggKind};
pub use criteria::{and_reduce, Criterion, Mask};
pub use dates::WeekdayMode;
pub use day_count::{year_frac, DayCountBasis};
pub use lookup::MatchMode;
