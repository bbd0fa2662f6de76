use chrono::{Days, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem::replace;
use std::str::FromStr;

/// A date range iterator that yields each date from the start date
/// through the end date (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// The `days` calendar days strictly before `today`:
    /// `today - days` through yesterday.
    pub fn trailing(days: u32, today: NaiveDate) -> DateRange {
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        let end = today.pred_opt().unwrap_or(NaiveDate::MIN);
        DateRange(start, end)
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = self.0 + TimeDelta::days(1);
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}

/// The date-range selector shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RangeSelection {
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
}

/// Window used when a selector label is unknown or missing.
pub const FALLBACK_RANGE: RangeSelection = RangeSelection::Month;

impl RangeSelection {
    pub const ALL: [RangeSelection; 4] = [
        RangeSelection::Week,
        RangeSelection::Month,
        RangeSelection::Quarter,
        RangeSelection::Year,
    ];

    /// Window length in days.
    pub fn days(&self) -> u32 {
        match self {
            RangeSelection::Week => 7,
            RangeSelection::Month => 30,
            RangeSelection::Quarter => 90,
            RangeSelection::Year => 365,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangeSelection::Week => "7d",
            RangeSelection::Month => "30d",
            RangeSelection::Quarter => "90d",
            RangeSelection::Year => "1y",
        }
    }

    /// Parse a selector label, falling back to [`FALLBACK_RANGE`] instead of failing.
    pub fn from_label_or_default(label: Option<&str>) -> RangeSelection {
        match label.map(str::parse::<RangeSelection>) {
            Some(Ok(range)) => range,
            Some(Err(e)) => {
                log::warn!("{}; using {}", e, FALLBACK_RANGE);
                FALLBACK_RANGE
            }
            None => FALLBACK_RANGE,
        }
    }

    pub fn dates(&self, today: NaiveDate) -> DateRange {
        DateRange::trailing(self.days(), today)
    }
}

impl fmt::Display for RangeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An unrecognized date-range selector label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRangeError(pub String);

impl fmt::Display for ParseRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown date range: {:?}", self.0)
    }
}

impl std::error::Error for ParseRangeError {}

impl FromStr for RangeSelection {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" => Ok(RangeSelection::Week),
            "30d" => Ok(RangeSelection::Month),
            "90d" => Ok(RangeSelection::Quarter),
            "1y" | "365d" => Ok(RangeSelection::Year),
            _ => Err(ParseRangeError(s.to_string())),
        }
    }
}
