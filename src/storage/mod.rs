mod csv_loader;
mod errors;
mod memory_store;

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::{Account, Transaction};
use crate::types::{MonthScope, TimeRange};

pub use csv_loader::load_csv;
pub use errors::StoreError;
pub use memory_store::MemoryStore;

/// Read-only access to accounts and their transactions.
///
/// Implementations own persistence, query construction and any retry policy. Every method
/// fails with [`StoreError::Validation`] for an empty account ID and with
/// [`StoreError::AccountNotFound`] for an unknown account.
#[async_trait]
pub trait TransactionStore: Send + Sync + 'static {
    async fn get_account(&self, account_id: &str) -> Result<Account, StoreError>;

    /// Transactions inside the trailing `range`, newest first.
    async fn get_transactions(&self, account_id: &str, range: TimeRange) -> Result<Vec<Transaction>, StoreError>;

    /// Sum of absolute amounts per category inside the trailing `range`.
    async fn get_category_totals(&self, account_id: &str, range: TimeRange) -> Result<BTreeMap<String, Decimal>, StoreError>;

    /// Transactions labelled `income_category` inside `scope`.
    async fn get_monthly_income(&self, account_id: &str, scope: MonthScope, income_category: &str) -> Result<Vec<Transaction>, StoreError>;

    /// Transactions labelled with any of `bill_categories` inside `scope`.
    async fn get_bill_payments(&self, account_id: &str, scope: MonthScope, bill_categories: &[String]) -> Result<Vec<Transaction>, StoreError>;

    /// Every transaction inside `scope`.
    async fn get_month_transactions(&self, account_id: &str, scope: MonthScope) -> Result<Vec<Transaction>, StoreError>;
}
