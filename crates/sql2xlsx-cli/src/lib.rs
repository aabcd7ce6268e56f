//! sql2xlsx CLI - Command-line interface library
//!
//! # Library Usage
//!
//! ```ignore
//! use sql2xlsx_cli::report_command;
//!
//! let written = report_command(Path::new("report.yaml"), Path::new("out"))?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Generate one workbook per partition into the current directory
//! sql2xlsx report.yaml
//!
//! # Write into another directory with debug logging
//! sql2xlsx report.yaml --output-dir reports/ -v
//! ```

pub mod app;

pub use app::{init_logging, report_command, run_cli};
