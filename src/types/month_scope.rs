use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::types::errors::ParseError;

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A single calendar month, used for month-scoped views (income, bills, daily patterns).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MonthScope {
    year: i32,
    month: u32
}

impl MonthScope {
    pub fn new(year: i32, month: u32) -> Result<Self, ParseError> {
        if !(1..=12).contains(&month) {
            return Err(ParseError::InvalidMonthScope(format!("Month must be between 1 and 12 but was {month}")));
        }

        if !(1..=9999).contains(&year) {
            return Err(ParseError::InvalidMonthScope(format!("Year must be between 1 and 9999 but was {year}")));
        }

        Ok(Self { year, month })
    }

    /// The month containing `now`.
    pub fn current(now: DateTime<Utc>) -> Self {
        Self { year: now.year(), month: now.month() }
    }

    /// Fills in whichever of `year`/`month` is missing from the month containing `now`.
    pub fn resolve(year: Option<i32>, month: Option<u32>, now: DateTime<Utc>) -> Result<Self, ParseError> {
        let current = Self::current(now);
        Self::new(year.unwrap_or(current.year), month.unwrap_or(current.month))
    }

    /// Same as [`MonthScope::resolve`] but for raw query-string style input.
    pub fn parse(year: Option<&str>, month: Option<&str>, now: DateTime<Utc>) -> Result<Self, ParseError> {
        let year = year.map(str::trim).filter(|value| !value.is_empty())
            .map(str::parse::<i32>).transpose()?;
        let month = month.map(str::trim).filter(|value| !value.is_empty())
            .map(str::parse::<u32>).transpose()?;

        Self::resolve(year, month, now)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn is_leap_year(year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    pub fn days_in_month(&self) -> u32 {
        if self.month == 2 && Self::is_leap_year(self.year) {
            return 29;
        }

        DAYS_IN_MONTH[(self.month - 1) as usize]
    }

    pub fn first_day(&self) -> Result<NaiveDate, ParseError> {
        self.date(1)
    }

    pub fn last_day(&self) -> Result<NaiveDate, ParseError> {
        self.date(self.days_in_month())
    }

    /// First instant of the month (`YYYY-MM-01 00:00:00` UTC).
    pub fn start(&self) -> Result<DateTime<Utc>, ParseError> {
        self.instant(1, 0, 0, 0)
    }

    /// Last whole second of the month (`YYYY-MM-<last> 23:59:59` UTC), inclusive.
    pub fn end(&self) -> Result<DateTime<Utc>, ParseError> {
        self.instant(self.days_in_month(), 23, 59, 59)
    }

    /// First instant of the following month, the exclusive upper bound of the scope.
    pub fn next_start(&self) -> Result<DateTime<Utc>, ParseError> {
        let (year, month) = if self.month == 12 { (self.year + 1, 1) } else { (self.year, self.month + 1) };

        Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| ParseError::InvalidMonthScope(format!("{self} has no following month")))
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp.year() == self.year && timestamp.month() == self.month
    }

    fn date(&self, day: u32) -> Result<NaiveDate, ParseError> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
            .ok_or_else(|| ParseError::InvalidMonthScope(format!("{self}-{day:02} is not a valid date")))
    }

    fn instant(&self, day: u32, hour: u32, minute: u32, second: u32) -> Result<DateTime<Utc>, ParseError> {
        Utc.with_ymd_and_hms(self.year, self.month, day, hour, minute, second)
            .single()
            .ok_or_else(|| ParseError::InvalidMonthScope(format!("{self}-{day:02} is not a valid instant")))
    }
}

impl Display for MonthScope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:04}-{:02}", self.year, self.month)
    }
}
