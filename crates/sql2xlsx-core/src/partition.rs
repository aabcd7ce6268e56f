//! Partition boundary generation.
//!
//! A [`PartitionSpec`] splits an inclusive date range into calendar-aligned
//! partitions. Boundaries are timestamps: `begin` at start of day, one
//! boundary per calendar step, and `end` at end of day as the final element.
//!
//! ```text
//! monthly 2022-01-01..2022-03-31
//!   boundaries  2022-01-01T00:00:00  2022-02-01T00:00:00  2022-03-01T00:00:00  2022-03-31T23:59:59
//!   partitions  (01-01, 01-31)       (02-01, 02-28)       (03-01, 03-31)
//! ```

use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::format::StrftimeItems;
use chrono::{Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

/// Date layout used for partition bounds in configuration files
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar unit by which partition boundaries advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// One partition per day
    Daily,
    /// One partition per calendar month
    Monthly,
    /// One partition per calendar year
    Yearly,
}

impl Granularity {
    /// Advance `start` by `steps` calendar units
    ///
    /// Steps are always counted from the same anchor, so month-end anchors
    /// clamp per month (Jan 31 -> Feb 28 -> Mar 31) instead of drifting.
    fn advance(self, start: NaiveDateTime, steps: u32) -> Option<NaiveDateTime> {
        match self {
            Granularity::Daily => start.checked_add_days(Days::new(u64::from(steps))),
            Granularity::Monthly => start.checked_add_months(Months::new(steps)),
            Granularity::Yearly => start.checked_add_months(Months::new(steps.checked_mul(12)?)),
        }
    }
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Daily),
            "month" | "monthly" => Ok(Granularity::Monthly),
            "year" | "yearly" => Ok(Granularity::Yearly),
            _ => Err(Error::UnsupportedGranularity(s.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Granularity::Daily => "daily",
            Granularity::Monthly => "monthly",
            Granularity::Yearly => "yearly",
        })
    }
}

/// Validated partitioning of an inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionSpec {
    granularity: Granularity,
    begin: NaiveDate,
    end: NaiveDate,
}

impl PartitionSpec {
    /// Create a spec, rejecting `end < begin`
    pub fn new(granularity: Granularity, begin: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < begin {
            return Err(Error::InvalidDateRange(format!(
                "end {} is before begin {}",
                end, begin
            )));
        }
        Ok(Self {
            granularity,
            begin,
            end,
        })
    }

    /// Parse a spec from its configuration strings
    ///
    /// # Arguments
    /// * `kind` - `day`/`daily`, `month`/`monthly` or `year`/`yearly`
    /// * `begin` - First day, `YYYY-MM-DD`
    /// * `end` - Last day (inclusive), `YYYY-MM-DD`
    pub fn parse(kind: &str, begin: &str, end: &str) -> Result<Self> {
        let granularity = kind.parse()?;
        Self::new(granularity, parse_date(begin)?, parse_date(end)?)
    }

    /// Partition granularity
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// First day of the range
    pub fn begin(&self) -> NaiveDate {
        self.begin
    }

    /// Last day of the range (inclusive)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Ordered partition boundaries, see [`generate`]
    pub fn boundaries(&self) -> Result<Vec<NaiveDateTime>> {
        generate(self)
    }

    /// Consumable partitions, in order
    pub fn partitions(&self) -> Result<Vec<Partition>> {
        let boundaries = generate(self)?;
        boundaries
            .windows(2)
            .map(|pair| Partition::between(pair[0], pair[1]))
            .collect()
    }
}

/// One contiguous, inclusive date sub-range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// First day
    pub begin: NaiveDate,
    /// Last day (inclusive)
    pub end: NaiveDate,
}

impl Partition {
    /// Partition starting at `start` and ending the day before `next`
    ///
    /// The final boundary sits at end of day and is itself the last day.
    fn between(start: NaiveDateTime, next: NaiveDateTime) -> Result<Self> {
        let end = if next.time() == NaiveTime::MIN {
            next.date()
                .checked_sub_days(Days::new(1))
                .ok_or_else(|| Error::InvalidDateRange(format!("no day before {}", next)))?
        } else {
            next.date()
        };
        Ok(Self {
            begin: start.date(),
            end,
        })
    }

    /// Format both bounds with a strftime layout
    pub fn format(&self, time_format: &str) -> Result<(String, String)> {
        Ok((
            format_date(self.begin, time_format)?,
            format_date(self.end, time_format)?,
        ))
    }
}

/// Generate the ordered boundaries of a partition spec
///
/// `begin` is normalized to start of day and `end` to end of day. Boundaries
/// are appended while strictly before `end`, then `end` itself closes the
/// sequence, so there are always at least two elements and the tail is never
/// dropped or overshot.
pub fn generate(spec: &PartitionSpec) -> Result<Vec<NaiveDateTime>> {
    let begin = spec.begin.and_time(NaiveTime::MIN);
    let end = spec
        .end
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| Error::InvalidDateRange(format!("no end of day for {}", spec.end)))?;

    if end < begin {
        return Err(Error::InvalidDateRange(format!(
            "end {} is before begin {}",
            spec.end, spec.begin
        )));
    }

    let mut boundaries = Vec::new();
    let mut steps: u32 = 0;
    loop {
        let current = spec.granularity.advance(begin, steps).ok_or_else(|| {
            Error::InvalidDateRange(format!("calendar overflow after {}", begin))
        })?;
        if current >= end {
            break;
        }
        boundaries.push(current);
        steps = steps
            .checked_add(1)
            .ok_or_else(|| Error::InvalidDateRange("too many partitions".to_string()))?;
    }
    boundaries.push(end);

    Ok(boundaries)
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| Error::InvalidDateRange(format!("cannot parse date '{}': {}", value, e)))
}

/// Format a day at midnight with a strftime layout
///
/// Fails instead of panicking when the layout is invalid or asks for fields a
/// naive timestamp does not have (such as `%z`).
pub fn format_date(date: NaiveDate, time_format: &str) -> Result<String> {
    let mut out = String::new();
    write!(
        out,
        "{}",
        date.and_time(NaiveTime::MIN)
            .format_with_items(StrftimeItems::new(time_format))
    )
    .map_err(|_| Error::Config(format!("invalid time format '{}'", time_format)))?;
    Ok(out)
}
