//! Report configuration.
//!
//! A run is described by one YAML (or TOML) file:
//!
//! ```yaml
//! input:
//!   type: sqlite3
//!   sources:
//!     - name: sales-2022.db
//!       partition: { type: monthly, begin: "2022-01-01", end: "2022-12-31" }
//!   query: SELECT day, amount FROM sales WHERE day BETWEEN '{part.beg}' AND '{part.end}'
//!   time-format: "%Y-%m-%d"
//! output:
//!   name: "sales-{num}-{part.beg}"
//!   variables:
//!     - { row: 2, col: 2, value: "{part.beg} .. {part.end}" }
//!   totalizations:
//!     - { col: 2, formula: "SUM(B5:B{rows.last})" }
//! template:
//!   path: template.xlsx
//!   sheet: Report
//!   start-row: 5
//!   start-col: 1
//! ```

mod settings;


pub use settings::{
    Config, InputSettings, OutputSettings, PartitionSettings, SourceSettings, TemplateSettings,
    Totalization, Variable,
};
