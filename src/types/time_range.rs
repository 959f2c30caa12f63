use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};

use crate::types::errors::ParseError;

/// A trailing window of time ending at "now", expressed the way callers phrase it
/// (`"1 month"`, `"6 months"`, `"2 weeks"`).
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub enum TimeRange {
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    Custom { amount: u32, unit: RangeUnit }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RangeUnit {
    Day,
    Week,
    Month,
    Year
}

impl TimeRange {
    /// Number of months used to turn a range total into a monthly average.
    ///
    /// Only the four well-known labels carry a month count; every custom range counts as one month.
    pub fn months(&self) -> u32 {
        match self {
            TimeRange::OneMonth => 1,
            TimeRange::ThreeMonths => 3,
            TimeRange::SixMonths => 6,
            TimeRange::OneYear => 12,
            TimeRange::Custom { .. } => 1
        }
    }

    /// Approximate length of the range in days.
    pub fn approx_days(&self) -> u32 {
        match self {
            TimeRange::OneMonth => 30,
            TimeRange::ThreeMonths => 90,
            TimeRange::SixMonths => 180,
            TimeRange::OneYear => 365,
            TimeRange::Custom { amount, unit } => match unit {
                RangeUnit::Day => *amount,
                RangeUnit::Week => amount.saturating_mul(7),
                RangeUnit::Month => amount.saturating_mul(30),
                RangeUnit::Year => amount.saturating_mul(365)
            }
        }
    }

    /// Inclusive lower bound of the range when it ends at `now`.
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let (amount, unit) = self.parts();

        let start = match unit {
            RangeUnit::Day => now.checked_sub_signed(Duration::days(i64::from(amount))),
            RangeUnit::Week => now.checked_sub_signed(Duration::weeks(i64::from(amount))),
            RangeUnit::Month => now.checked_sub_months(Months::new(amount)),
            RangeUnit::Year => now.checked_sub_months(Months::new(amount.saturating_mul(12)))
        };

        start.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    fn parts(&self) -> (u32, RangeUnit) {
        match self {
            TimeRange::OneMonth => (1, RangeUnit::Month),
            TimeRange::ThreeMonths => (3, RangeUnit::Month),
            TimeRange::SixMonths => (6, RangeUnit::Month),
            TimeRange::OneYear => (1, RangeUnit::Year),
            TimeRange::Custom { amount, unit } => (*amount, *unit)
        }
    }
}

impl Display for RangeUnit {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            RangeUnit::Day => "day",
            RangeUnit::Week => "week",
            RangeUnit::Month => "month",
            RangeUnit::Year => "year"
        };
        write!(formatter, "{label}")
    }
}

impl Display for TimeRange {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let (amount, unit) = self.parts();
        let plural = if amount == 1 { "" } else { "s" };
        write!(formatter, "{amount} {unit}{plural}")
    }
}

impl FromStr for TimeRange {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_lowercase();

        if value.is_empty() {
            return Err(ParseError::InvalidTimeRange("Value is an empty string".to_string()));
        }

        let mut parts = value.split_whitespace();
        let (Some(amount), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ParseError::InvalidTimeRange(format!("Expected '<amount> <unit>' but found '{value}'")));
        };

        let amount: u32 = amount.parse()?;

        if amount == 0 {
            return Err(ParseError::InvalidTimeRange("Amount must be greater than zero".to_string()));
        }

        let unit = match unit.strip_suffix('s').unwrap_or(unit) {
            "day" => RangeUnit::Day,
            "week" => RangeUnit::Week,
            "month" => RangeUnit::Month,
            "year" => RangeUnit::Year,
            other => return Err(ParseError::InvalidTimeRange(format!("Unknown unit '{other}'")))
        };

        Ok(match (amount, unit) {
            (1, RangeUnit::Month) => TimeRange::OneMonth,
            (3, RangeUnit::Month) => TimeRange::ThreeMonths,
            (6, RangeUnit::Month) => TimeRange::SixMonths,
            (1, RangeUnit::Year) => TimeRange::OneYear,
            (amount, unit) => TimeRange::Custom { amount, unit }
        })
    }
}
