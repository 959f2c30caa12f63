use serde::Serialize;

use crate::types::AccountId;

/// Account metadata held by the Transaction Store.
///
/// The engine uses it only to confirm the account exists before aggregating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub account_id: AccountId,
    pub account_name: String,
    pub currency: String
}

impl Account {
    /// Creates an account whose display name defaults to its ID.
    pub fn new(account_id: impl Into<AccountId>) -> Self {
        let account_id = account_id.into();

        Self {
            account_name: account_id.clone(),
            account_id,
            currency: "USD".to_string()
        }
    }

    pub fn with_name(mut self, account_name: impl Into<String>) -> Self {
        self.account_name = account_name.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}
