use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::analytics::{
    aggregate_totals, analyze_daily_patterns, analyze_time_patterns, bill_shares, category_counts, merchant_bills,
    recurring_bills, upcoming_bills, SpendingPredictor
};
use crate::config::AnalyticsConfig;
use crate::models::{
    AnalyticsError, BillShare, CategoryBreakdown, CategoryCount, DailyPattern, PredictedSpend, RecurringBill, SpendingAnalytics,
    TimePattern, Transaction, UpcomingBill
};
use crate::storage::{StoreError, TransactionStore};
use crate::types::{MonthScope, TimeRange};

/// Composes the analyzers over data fetched from a [`TransactionStore`].
///
/// Every call is a stateless computation over one round of store reads. Each read is bounded by
/// the configured store timeout; a timeout, a store failure or dropping the returned future
/// yields no partial result.
pub struct AnalyticsEngine<S: TransactionStore> {
    store: Arc<S>,
    config: AnalyticsConfig,
    predictor: SpendingPredictor
}

impl<S: TransactionStore> AnalyticsEngine<S> {
    /// Creates an engine with the default configuration.
    pub fn new(store: Arc<S>) -> Self {
        let config = AnalyticsConfig::default();

        Self {
            store,
            predictor: SpendingPredictor::new(config.predictor.clone()),
            config
        }
    }

    pub fn with_config(store: Arc<S>, config: AnalyticsConfig) -> Result<Self, AnalyticsError> {
        config.validate()?;

        Ok(Self {
            store,
            predictor: SpendingPredictor::new(config.predictor.clone()),
            config
        })
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Full spending summary for `account_id` over `time_range` (default range when `None`).
    ///
    /// Top categories and temporal patterns cover the requested range; predictions cover the
    /// predictor's lookback window.
    pub async fn analyze_spending(&self, account_id: &str, time_range: Option<&str>) -> Result<SpendingAnalytics, AnalyticsError> {
        let account_id = validate_account_id(account_id)?;
        let range = self.resolve_range(time_range)?;

        info!("Analyzing spending for account [{account_id}] over the last {range}");

        self.ensure_account(account_id).await?;

        let (totals, transactions, history) = tokio::try_join!(
            self.call("get category totals", account_id, self.store.get_category_totals(account_id, range)),
            self.call("get transactions", account_id, self.store.get_transactions(account_id, range)),
            self.call("get prediction history", account_id, self.store.get_transactions(account_id, self.config.predictor.lookback))
        )?;

        let breakdown = aggregate_totals(totals);
        let time_patterns = analyze_time_patterns(&transactions, self.config.bucket_offset);
        let predicted_spending = self.predictor.predict(&history);

        if !breakdown.percentages_defined {
            debug!("Account [{account_id}] has no spend in the last {range}, percentages reported as zero");
        }

        let total_spent = breakdown.grand_total;
        let monthly_average = total_spent / Decimal::from(range.months());

        debug!(
            "Account [{account_id}]: {} categories, {} time buckets, {} predictions",
            breakdown.totals.len(),
            time_patterns.len(),
            predicted_spending.len()
        );

        Ok(SpendingAnalytics {
            top_categories: breakdown.top(self.config.top_categories),
            time_patterns,
            predicted_spending,
            total_spent,
            monthly_average
        })
    }

    /// Every category total over `time_range`, untruncated.
    pub async fn category_breakdown(&self, account_id: &str, time_range: Option<&str>) -> Result<CategoryBreakdown, AnalyticsError> {
        let account_id = validate_account_id(account_id)?;
        let range = self.resolve_range(time_range)?;

        self.ensure_account(account_id).await?;

        let totals = self.call("get category totals", account_id, self.store.get_category_totals(account_id, range)).await?;

        Ok(aggregate_totals(totals))
    }

    /// How many transactions each category saw in `scope`.
    pub async fn category_counts(&self, account_id: &str, scope: MonthScope) -> Result<Vec<CategoryCount>, AnalyticsError> {
        let account_id = validate_account_id(account_id)?;

        self.ensure_account(account_id).await?;

        let transactions = self.call("get month transactions", account_id, self.store.get_month_transactions(account_id, scope)).await?;

        Ok(category_counts(&transactions))
    }

    pub async fn time_patterns(&self, account_id: &str, time_range: Option<&str>) -> Result<Vec<TimePattern>, AnalyticsError> {
        let account_id = validate_account_id(account_id)?;
        let range = self.resolve_range(time_range)?;

        self.ensure_account(account_id).await?;

        let transactions = self.call("get transactions", account_id, self.store.get_transactions(account_id, range)).await?;

        Ok(analyze_time_patterns(&transactions, self.config.bucket_offset))
    }

    pub async fn predict_spending(&self, account_id: &str) -> Result<Vec<PredictedSpend>, AnalyticsError> {
        let history = self.lookback_history(account_id).await?;

        Ok(self.predictor.predict(&history))
    }

    pub async fn monthly_income(&self, account_id: &str, scope: MonthScope) -> Result<Vec<Transaction>, AnalyticsError> {
        let account_id = validate_account_id(account_id)?;

        debug!("Fetching income for account [{account_id}] in {scope}");

        self.ensure_account(account_id).await?;
        self.call("get monthly income", account_id, self.store.get_monthly_income(account_id, scope, &self.config.income_category)).await
    }

    pub async fn bill_payments(&self, account_id: &str, scope: MonthScope) -> Result<Vec<Transaction>, AnalyticsError> {
        let account_id = validate_account_id(account_id)?;

        debug!("Fetching bill payments for account [{account_id}] in {scope}");

        self.ensure_account(account_id).await?;
        self.call("get bill payments", account_id, self.store.get_bill_payments(account_id, scope, &self.config.bill_categories)).await
    }

    /// Each merchant's share of the bills paid in `scope`.
    pub async fn bill_breakdown(&self, account_id: &str, scope: MonthScope) -> Result<Vec<BillShare>, AnalyticsError> {
        let bills = self.bill_payments(account_id, scope).await?;

        Ok(bill_shares(&bills))
    }

    pub async fn daily_patterns(&self, account_id: &str, scope: MonthScope) -> Result<Vec<DailyPattern>, AnalyticsError> {
        let account_id = validate_account_id(account_id)?;

        self.ensure_account(account_id).await?;

        let transactions = self.call("get month transactions", account_id, self.store.get_month_transactions(account_id, scope)).await?;

        Ok(analyze_daily_patterns(&transactions, self.config.bucket_offset))
    }

    /// Bill payments to one merchant over the lookback window, newest first.
    pub async fn bill_history(&self, account_id: &str, merchant: &str) -> Result<Vec<Transaction>, AnalyticsError> {
        let merchant = merchant.trim();

        if merchant.is_empty() {
            return Err(AnalyticsError::validation("merchant name is required"));
        }

        let history = self.lookback_history(account_id).await?;

        Ok(merchant_bills(&history, merchant, &self.config.bill_categories))
    }

    pub async fn recurring_bills(&self, account_id: &str) -> Result<Vec<RecurringBill>, AnalyticsError> {
        let history = self.lookback_history(account_id).await?;

        Ok(recurring_bills(&history, &self.config.bill_categories, self.config.recurring_min_months))
    }

    pub async fn upcoming_bills(&self, account_id: &str) -> Result<Vec<UpcomingBill>, AnalyticsError> {
        let history = self.lookback_history(account_id).await?;

        Ok(upcoming_bills(&history, &self.config.bill_categories, self.config.recurring_min_months))
    }

    async fn lookback_history(&self, account_id: &str) -> Result<Vec<Transaction>, AnalyticsError> {
        let account_id = validate_account_id(account_id)?;

        self.ensure_account(account_id).await?;

        self.call("get prediction history", account_id, self.store.get_transactions(account_id, self.config.predictor.lookback)).await
    }

    async fn ensure_account(&self, account_id: &str) -> Result<(), AnalyticsError> {
        self.call("get account", account_id, self.store.get_account(account_id)).await?;
        Ok(())
    }

    fn resolve_range(&self, time_range: Option<&str>) -> Result<TimeRange, AnalyticsError> {
        match time_range.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => Ok(TimeRange::from_str(value)?),
            None => {
                debug!("Using default time range: {}", self.config.default_time_range);
                Ok(self.config.default_time_range)
            }
        }
    }

    async fn call<T, F>(&self, operation: &'static str, account_id: &str, request: F) -> Result<T, AnalyticsError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match timeout(self.config.store_timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => {
                warn!("Unable to {operation} for account [{account_id}]: {error}");
                Err(AnalyticsError::store(operation, account_id, error))
            }
            Err(_) => {
                warn!("Store did not {operation} for account [{account_id}] within {:?}", self.config.store_timeout);
                Err(AnalyticsError::timed_out(operation, account_id, self.config.store_timeout))
            }
        }
    }
}

fn validate_account_id(account_id: &str) -> Result<&str, AnalyticsError> {
    let account_id = account_id.trim();

    if account_id.is_empty() {
        return Err(AnalyticsError::missing_account_id());
    }

    Ok(account_id)
}
