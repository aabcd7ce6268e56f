//! sql2xlsx-core - Partitioned SQL reports in spreadsheet templates
//!
//! Splits a date range into daily, monthly or yearly partitions, runs one
//! query per partition and writes the rows into a copy of a template workbook,
//! together with header variables and column totals.
//!
//! # Example
//!
//! ```
//! use sql2xlsx_core::{resolve, PartitionSpec, PlaceholderContext};
//!
//! let spec = PartitionSpec::parse("monthly", "2022-01-01", "2022-03-15").unwrap();
//! let partitions = spec.partitions().unwrap();
//! assert_eq!(partitions.len(), 3);
//!
//! let ctx = PlaceholderContext::for_partition(&partitions[2], "%Y-%m-%d", 3).unwrap();
//! assert_eq!(
//!     resolve("report-{num}: {part.beg} to {part.end}", &ctx),
//!     "report-3: 2022-03-01 to 2022-03-15"
//! );
//! ```

pub mod config;
pub mod error;
pub mod partition;
pub mod placeholder;
pub mod report;
pub mod runner;

pub use config::Config;
pub use error::{Error, Result};
pub use partition::{generate, Granularity, Partition, PartitionSpec};
pub use placeholder::{resolve, PlaceholderContext, Token};
pub use report::{populate, PartitionReport, PopulateSummary, ReportLayout, ReportWriter};
pub use runner::{process_source, run, run_with_databases};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "1.0.0");
    }
}
