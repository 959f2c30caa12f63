mod bucket;
mod errors;
mod month_scope;
mod time_range;

pub use bucket::{BucketKey, HourOfDay};
pub use errors::ParseError;
pub use month_scope::MonthScope;
pub use time_range::{RangeUnit, TimeRange};

pub type AccountId = String;
pub type TransactionId = String;
