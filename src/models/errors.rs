use std::time::Duration;

use thiserror::Error;

use crate::storage::StoreError;
use crate::types::{AccountId, ParseError};

/// Broad class of an [`AnalyticsError`], for mapping onto transport status codes.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorKind {
    /// Bad input from the caller (400).
    Validation,
    /// The account does not exist (404).
    NotFound,
    /// The Transaction Store failed or did not answer in time (500).
    Upstream
}

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Validation failed: {reason}")]
    Validation {
        reason: String
    },
    #[error("Account [{account_id}] was not found while trying to {operation}")]
    NotFound {
        account_id: AccountId,
        operation: &'static str
    },
    #[error("Failed to {operation} for account [{account_id}]: {source}")]
    Upstream {
        account_id: AccountId,
        operation: &'static str,
        #[source]
        source: StoreError
    },
    #[error("Timed out after {timeout:?} while trying to {operation} for account [{account_id}]")]
    TimedOut {
        account_id: AccountId,
        operation: &'static str,
        timeout: Duration
    }
}

impl AnalyticsError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation { reason: reason.into() }
    }

    pub fn missing_account_id() -> Self {
        Self::validation("account ID is required")
    }

    /// Wraps a collaborator failure with the operation that triggered it, keeping its kind.
    pub fn store(operation: &'static str, account_id: &str, error: StoreError) -> Self {
        match error {
            StoreError::Validation(reason) => Self::Validation {
                reason: format!("{operation}: {reason}")
            },
            StoreError::AccountNotFound(account_id) => Self::NotFound {
                account_id,
                operation
            },
            source => Self::Upstream {
                account_id: account_id.to_string(),
                operation,
                source
            }
        }
    }

    pub fn timed_out(operation: &'static str, account_id: &str, timeout: Duration) -> Self {
        Self::TimedOut {
            account_id: account_id.to_string(),
            operation,
            timeout
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Upstream { .. } | Self::TimedOut { .. } => ErrorKind::Upstream
        }
    }
}

impl From<ParseError> for AnalyticsError {
    fn from(error: ParseError) -> Self {
        Self::validation(error.to_string())
    }
}
