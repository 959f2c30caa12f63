use thiserror::Error;

use crate::types::{AccountId, ParseError};

/// Failures reported by a Transaction Store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store validation error: {0}")]
    Validation(String),
    #[error("Account [{0}] does not exist")]
    AccountNotFound(AccountId),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Store load error: {0}")]
    Csv(#[from] csv::Error)
}

impl From<ParseError> for StoreError {
    fn from(error: ParseError) -> Self {
        StoreError::Validation(error.to_string())
    }
}
