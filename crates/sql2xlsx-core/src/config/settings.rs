//! Configuration Settings
//!
//! Defines the report configuration structures and their validation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use sql2xlsx_data::{is_supported_driver, MAX_COLUMN, MAX_ROW};

use crate::error::{Error, Result};
use crate::partition::{format_date, PartitionSpec};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Databases, partitioning and query
    pub input: InputSettings,
    /// Output naming and derived cells
    pub output: OutputSettings,
    /// Template workbook and grid origin
    pub template: TemplateSettings,
}

impl Config {
    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and validate a configuration file
    ///
    /// Files ending in `.toml` are parsed as TOML, everything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let config = if is_toml {
            Self::from_toml_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check required fields and cell coordinates
    ///
    /// Partition specs are not checked here; each source's spec is parsed
    /// when that source is processed.
    pub fn validate(&self) -> Result<()> {
        if !is_supported_driver(&self.input.driver) {
            return Err(Error::Config(format!(
                "unsupported input type '{}'",
                self.input.driver
            )));
        }
        if self.input.sources.is_empty() {
            return Err(Error::Config("input.sources is empty".to_string()));
        }
        if let Some(source) = self.input.sources.iter().find(|s| s.name.trim().is_empty()) {
            return Err(Error::Config(format!(
                "input source with partition {} has no name",
                source.partition.kind
            )));
        }
        require("input.query", &self.input.query)?;
        require("output.name", &self.output.name)?;
        require("template.sheet", &self.template.sheet)?;
        if self.template.path.as_os_str().is_empty() {
            return Err(Error::Config("template.path is empty".to_string()));
        }

        // Any fixed date exercises every directive of the layout
        let sample = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
        let rendered = format_date(sample, &self.input.time_format)?;
        if rendered.contains(['{', '}']) {
            return Err(Error::Config(format!(
                "input.time-format '{}' must not produce braces",
                self.input.time_format
            )));
        }

        check_row("template.start-row", self.template.start_row)?;
        check_col("template.start-col", self.template.start_col)?;
        for (i, variable) in self.output.variables.iter().enumerate() {
            check_row(&format!("output.variables[{}].row", i), variable.row)?;
            check_col(&format!("output.variables[{}].col", i), variable.col)?;
        }
        for (i, total) in self.output.totalizations.iter().enumerate() {
            check_col(&format!("output.totalizations[{}].col", i), total.col)?;
        }

        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{} is empty", field)));
    }
    Ok(())
}

fn check_row(field: &str, row: u32) -> Result<()> {
    if row == 0 || row > MAX_ROW {
        return Err(Error::Config(format!(
            "{} must be within 1..={}, got {}",
            field, MAX_ROW, row
        )));
    }
    Ok(())
}

fn check_col(field: &str, col: u32) -> Result<()> {
    if col == 0 || col > MAX_COLUMN {
        return Err(Error::Config(format!(
            "{} must be within 1..={}, got {}",
            field, MAX_COLUMN, col
        )));
    }
    Ok(())
}

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InputSettings {
    /// Database driver (`sqlite3` or `sqlite`)
    #[serde(rename = "type", default = "default_driver")]
    pub driver: String,
    /// Data sources, processed in order
    pub sources: Vec<SourceSettings>,
    /// Query template run once per partition
    pub query: String,
    /// strftime layout for `{part.beg}` and `{part.end}`
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

fn default_driver() -> String {
    "sqlite3".to_string()
}

fn default_time_format() -> String {
    "%Y-%m-%d".to_string()
}

/// One database and its partitioning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceSettings {
    /// Data source name; a database path for SQLite
    pub name: String,
    /// Date range and granularity
    pub partition: PartitionSettings,
}

/// Partition descriptor as written in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PartitionSettings {
    /// `daily`, `monthly` or `yearly` (or `day`, `month`, `year`)
    #[serde(rename = "type")]
    pub kind: String,
    /// First day, `YYYY-MM-DD`
    #[serde(deserialize_with = "date_string")]
    pub begin: String,
    /// Last day (inclusive), `YYYY-MM-DD`
    #[serde(deserialize_with = "date_string")]
    pub end: String,
}

/// Accept a date as a string or as a bare TOML date (`begin = 2022-01-01`)
fn date_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match toml::Value::deserialize(deserializer)? {
        toml::Value::String(s) => Ok(s),
        toml::Value::Datetime(dt) => Ok(dt.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a YYYY-MM-DD date, found {}",
            other.type_str()
        ))),
    }
}

impl PartitionSettings {
    /// Parse into a validated [`PartitionSpec`]
    pub fn to_spec(&self) -> Result<PartitionSpec> {
        PartitionSpec::parse(&self.kind, &self.begin, &self.end)
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputSettings {
    /// Output file name template; `.xlsx` is appended
    pub name: String,
    /// Header cells written once per partition
    #[serde(default)]
    pub variables: Vec<Variable>,
    /// Formulas written below the data grid
    #[serde(default)]
    pub totalizations: Vec<Totalization>,
    /// Treat variable and totalization write failures as fatal
    #[serde(default)]
    pub strict_cells: bool,
}

/// Static header cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// 1-indexed row
    pub row: u32,
    /// 1-indexed column
    pub col: u32,
    /// Value template
    pub value: String,
}

/// Column total written below the data grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totalization {
    /// 1-indexed column
    pub col: u32,
    /// Formula template, usually referencing `{rows.last}`
    pub formula: String,
}

/// Template workbook configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TemplateSettings {
    /// Template `.xlsx` path
    pub path: PathBuf,
    /// Sheet receiving the report
    pub sheet: String,
    /// First data row (1-indexed)
    pub start_row: u32,
    /// First data column (1-indexed)
    pub start_col: u32,
}
