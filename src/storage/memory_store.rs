use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{Account, Transaction};
use crate::storage::{StoreError, TransactionStore};
use crate::types::{AccountId, MonthScope, TimeRange};

#[derive(Debug, Clone)]
struct AccountLedger {
    account: Account,
    transactions: Vec<Transaction>
}

/// In-memory Transaction Store keyed by account.
///
/// Trailing time ranges are measured back from the reference time when one is set,
/// otherwise from the system clock at query time.
pub struct MemoryStore {
    ledgers: Arc<DashMap<AccountId, AccountLedger>>,
    reference_time: Option<DateTime<Utc>>
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            ledgers: Arc::new(DashMap::new()),
            reference_time: None
        }
    }

    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference_time = Some(now);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.reference_time.unwrap_or_else(Utc::now)
    }

    /// Registers an account, keeping any transactions already recorded for it.
    pub fn add_account(&self, account: Account) {
        self.ledgers.entry(account.account_id.clone())
            .and_modify(|ledger| ledger.account = account.clone())
            .or_insert_with(|| AccountLedger { account, transactions: Vec::new() });
    }

    /// Records a transaction, registering its account on first sight.
    pub fn add_transaction(&self, transaction: Transaction) {
        self.ledgers.entry(transaction.account_id.clone())
            .or_insert_with(|| AccountLedger {
                account: Account::new(transaction.account_id.clone()),
                transactions: Vec::new()
            })
            .transactions.push(transaction);
    }

    pub fn account_count(&self) -> usize {
        self.ledgers.len()
    }

    pub fn transaction_count(&self) -> usize {
        self.ledgers.iter().map(|ledger| ledger.transactions.len()).sum()
    }

    fn select<F>(&self, account_id: &str, predicate: F) -> Result<Vec<Transaction>, StoreError>
    where
        F: Fn(&Transaction) -> bool,
    {
        if account_id.is_empty() {
            return Err(StoreError::Validation("account ID is required".to_string()));
        }

        let ledger = self.ledgers.get(account_id)
            .ok_or_else(|| StoreError::AccountNotFound(account_id.to_string()))?;

        let mut transactions: Vec<Transaction> = ledger.transactions.iter()
            .filter(|transaction| predicate(transaction))
            .cloned()
            .collect();

        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));

        Ok(transactions)
    }

    fn select_month<F>(&self, account_id: &str, scope: MonthScope, predicate: F) -> Result<Vec<Transaction>, StoreError>
    where
        F: Fn(&Transaction) -> bool,
    {
        let start = scope.start()?;
        let next = scope.next_start()?;

        debug!("Selecting transactions for account [{account_id}] from {start} until {next}");

        self.select(account_id, |transaction| {
            transaction.timestamp >= start && transaction.timestamp < next && predicate(transaction)
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn get_account(&self, account_id: &str) -> Result<Account, StoreError> {
        if account_id.is_empty() {
            return Err(StoreError::Validation("account ID is required".to_string()));
        }

        self.ledgers.get(account_id)
            .map(|ledger| ledger.account.clone())
            .ok_or_else(|| StoreError::AccountNotFound(account_id.to_string()))
    }

    async fn get_transactions(&self, account_id: &str, range: TimeRange) -> Result<Vec<Transaction>, StoreError> {
        let start = range.start(self.now());
        let transactions = self.select(account_id, |transaction| transaction.timestamp >= start)?;

        debug!("Found {} transactions for account [{account_id}] in the last {range}", transactions.len());

        Ok(transactions)
    }

    async fn get_category_totals(&self, account_id: &str, range: TimeRange) -> Result<BTreeMap<String, Decimal>, StoreError> {
        let mut totals = BTreeMap::new();

        for transaction in self.get_transactions(account_id, range).await? {
            *totals.entry(transaction.category.clone()).or_insert(Decimal::ZERO) += transaction.magnitude();
        }

        Ok(totals)
    }

    async fn get_monthly_income(&self, account_id: &str, scope: MonthScope, income_category: &str) -> Result<Vec<Transaction>, StoreError> {
        self.select_month(account_id, scope, |transaction| transaction.category == income_category)
    }

    async fn get_bill_payments(&self, account_id: &str, scope: MonthScope, bill_categories: &[String]) -> Result<Vec<Transaction>, StoreError> {
        self.select_month(account_id, scope, |transaction| bill_categories.contains(&transaction.category))
    }

    async fn get_month_transactions(&self, account_id: &str, scope: MonthScope) -> Result<Vec<Transaction>, StoreError> {
        self.select_month(account_id, scope, |_| true)
    }
}
