//! Indicator aggregation and filtering engine for PMTCT facility reports.
//!
//! Data moves one way through the crate:
//!
//! * [`loader`] reads a facility-month CSV export and normalizes it into a
//!   [`types::Dataset`]: descriptor columns stay text, every other column
//!   becomes a number (blank or malformed cells are 0).
//! * [`period`] derives quarter and calendar year from each `periodname`.
//! * [`filter`] narrows a dataset by quarter, year, month, region,
//!   sub-region and facility into a read-only [`filter::FilteredView`].
//! * [`aggregate`] sums named indicator columns over a view; a column the
//!   upload does not carry sums to 0.
//! * [`cascades`] turns those sums into program cascades, coverage
//!   percentages and adequate/moderate/critical bands.
//! * [`reports`] bundles everything into one [`reports::DashboardReport`].
//!
//! Only a structurally broken table is an error. Everything else degrades to
//! numeric defaults visible in the output.

pub mod aggregate;
pub mod cascades;
pub mod error;
pub mod filter;
pub mod indicators;
pub mod loader;
pub mod output;
pub mod period;
pub mod reports;
pub mod session;
pub mod settings;
pub mod types;
pub mod util;

pub use aggregate::{percentage, Aggregator};
pub use error::{ReportError, Result};
pub use filter::{Dimension, FilterOptions, FilterSelection, FilteredView};
pub use session::Session;
pub use types::{Band, CascadeResult, Dataset, Record};
