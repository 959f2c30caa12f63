use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use rust_decimal::Decimal;

use crate::models::{AnalyticsError, BILL_CATEGORIES, INCOME_CATEGORY};
use crate::types::TimeRange;

/// Tuning knobs for the spending predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorConfig {
    /// Categories with fewer transactions in the lookback window are not predicted.
    pub min_transactions: usize,
    /// History considered for predictions.
    pub lookback: TimeRange,
    /// Cadence the frequency signal is measured against: `count / lookback_days * reference_period_days`.
    pub reference_period_days: u32,
    /// Average amount at which the amount signal saturates at 1.0.
    pub amount_ceiling: Decimal,
    /// Likelihood above which a prediction carries a warning.
    pub warning_threshold: f64
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            min_transactions: 3,
            lookback: TimeRange::SixMonths,
            reference_period_days: 30,
            amount_ceiling: Decimal::from(1000),
            warning_threshold: 0.7
        }
    }
}

impl PredictorConfig {
    pub fn with_min_transactions(mut self, min_transactions: usize) -> Self {
        self.min_transactions = min_transactions;
        self
    }

    pub fn with_lookback(mut self, lookback: TimeRange) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn with_reference_period_days(mut self, days: u32) -> Self {
        self.reference_period_days = days;
        self
    }

    pub fn with_amount_ceiling(mut self, ceiling: Decimal) -> Self {
        self.amount_ceiling = ceiling;
        self
    }

    pub fn with_warning_threshold(mut self, threshold: f64) -> Self {
        self.warning_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.min_transactions < 2 {
            return Err(AnalyticsError::validation("predictor needs at least 2 transactions per category"));
        }

        if self.reference_period_days == 0 || self.lookback.approx_days() == 0 {
            return Err(AnalyticsError::validation("predictor reference period and lookback must be non-empty"));
        }

        if self.amount_ceiling <= Decimal::ZERO {
            return Err(AnalyticsError::validation("predictor amount ceiling must be positive"));
        }

        if !(0.0..=1.0).contains(&self.warning_threshold) {
            return Err(AnalyticsError::validation("predictor warning threshold must be within [0, 1]"));
        }

        Ok(())
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    pub predictor: PredictorConfig,
    /// How many categories the spending summary keeps.
    pub top_categories: usize,
    /// Range used when the caller does not name one.
    pub default_time_range: TimeRange,
    /// Budget for each round-trip to the Transaction Store.
    pub store_timeout: Duration,
    /// Zone used to derive day-of-week and hour for temporal buckets.
    pub bucket_offset: FixedOffset,
    /// Categories counted as bill payments by every bill view.
    pub bill_categories: Vec<String>,
    /// Category returned by the monthly income view.
    pub income_category: String,
    /// Distinct months a bill must appear in to count as recurring.
    pub recurring_min_months: usize
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            predictor: PredictorConfig::default(),
            top_categories: 5,
            default_time_range: TimeRange::OneMonth,
            store_timeout: Duration::from_secs(5),
            bucket_offset: Utc.fix(),
            bill_categories: BILL_CATEGORIES.iter().map(|category| category.to_string()).collect(),
            income_category: INCOME_CATEGORY.to_string(),
            recurring_min_months: 3
        }
    }
}

impl AnalyticsConfig {
    pub fn with_predictor(mut self, predictor: PredictorConfig) -> Self {
        self.predictor = predictor;
        self
    }

    pub fn with_top_categories(mut self, top_categories: usize) -> Self {
        self.top_categories = top_categories;
        self
    }

    pub fn with_default_time_range(mut self, range: TimeRange) -> Self {
        self.default_time_range = range;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn with_bucket_offset(mut self, offset: FixedOffset) -> Self {
        self.bucket_offset = offset;
        self
    }

    pub fn with_bill_categories<I, C>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.bill_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_income_category(mut self, category: impl Into<String>) -> Self {
        self.income_category = category.into();
        self
    }

    pub fn with_recurring_min_months(mut self, months: usize) -> Self {
        self.recurring_min_months = months;
        self
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        self.predictor.validate()?;

        if self.top_categories == 0 {
            return Err(AnalyticsError::validation("top category count must be positive"));
        }

        if self.store_timeout.is_zero() {
            return Err(AnalyticsError::validation("store timeout must be positive"));
        }

        if self.bill_categories.iter().all(|category| category.trim().is_empty()) {
            return Err(AnalyticsError::validation("at least one bill category is required"));
        }

        if self.income_category.trim().is_empty() {
            return Err(AnalyticsError::validation("income category must not be empty"));
        }

        if self.recurring_min_months == 0 {
            return Err(AnalyticsError::validation("recurring bills need at least one month"));
        }

        Ok(())
    }
}
