use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::Weekday;
use serde::{Serialize, Serializer};

/// Hour-granularity time of day, rendered as `"HH:00"`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct HourOfDay(u8);

impl HourOfDay {
    /// Returns `None` for hours outside `0..=23`.
    pub fn new(hour: u32) -> Option<Self> {
        u8::try_from(hour).ok().filter(|hour| *hour < 24).map(HourOfDay)
    }

    pub fn hour(&self) -> u8 {
        self.0
    }
}

impl Display for HourOfDay {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:02}:00", self.0)
    }
}

impl Serialize for HourOfDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Composite key identifying a temporal bucket.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct BucketKey {
    pub day: Weekday,
    pub hour: HourOfDay
}

impl BucketKey {
    pub fn new(day: Weekday, hour: HourOfDay) -> Self {
        Self { day, hour }
    }

    /// Monday-first ordinal used for stable ordering (`Weekday` itself is not `Ord`).
    pub fn ordinal(&self) -> (u32, u8) {
        (self.day.num_days_from_monday(), self.hour.hour())
    }
}
