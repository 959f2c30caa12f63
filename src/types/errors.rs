use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Time range error: {0}")]
    InvalidTimeRange(String),
    #[error("Month scope error: {0}")]
    InvalidMonthScope(String),
    #[error("Parse error: {0}")]
    ParseInt(#[from] ParseIntError)
}
