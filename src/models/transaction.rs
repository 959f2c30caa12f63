use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{AccountId, TransactionId};

/// A single categorized transaction as recorded by the Transaction Store.
///
/// The engine only ever reads these. Negative amounts are outflows.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Transaction {
    /// Store-assigned transaction ID.
    #[serde(rename = "transaction_id")]
    pub id: TransactionId,
    /// The owning account.
    pub account_id: AccountId,
    /// When the transaction happened.
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    /// Signed amount, negative for outflows.
    pub amount: Decimal,
    /// Pre-assigned category label.
    pub category: String,
    pub merchant: String,
    pub location: String
}

impl Transaction {
    /// Magnitude of the amount regardless of direction.
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }
}
