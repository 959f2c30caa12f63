use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::PredictorConfig;
use crate::models::{PredictedSpend, Transaction};

/// Estimates when each category will see its next transaction and how likely that spend is.
///
/// Likelihood is the mean of two signals clamped to `[0, 1]`:
/// - frequency: `count / lookback_days * reference_period_days`
/// - amount: `average magnitude / amount_ceiling`
#[derive(Debug, Clone)]
pub struct SpendingPredictor {
    config: PredictorConfig
}

impl SpendingPredictor {
    pub fn new(config: PredictorConfig) -> Self {
        Self { config }
    }

    /// Predicts every category with enough history in `transactions`, highest likelihood first.
    ///
    /// Categories below the minimum transaction count are left out rather than reported.
    pub fn predict(&self, transactions: &[Transaction]) -> Vec<PredictedSpend> {
        let mut categories: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();

        for transaction in transactions {
            categories.entry(transaction.category.as_str()).or_default().push(transaction);
        }

        let mut predictions: Vec<PredictedSpend> = categories.into_iter()
            .filter_map(|(category, history)| self.predict_category(category, history))
            .collect();

        predictions.sort_by(|a, b| {
            b.likelihood.total_cmp(&a.likelihood).then_with(|| a.category.cmp(&b.category))
        });

        predictions
    }

    fn predict_category(&self, category: &str, mut history: Vec<&Transaction>) -> Option<PredictedSpend> {
        if history.len() < self.config.min_transactions {
            debug!("Skipping prediction for [{category}]: {} transactions", history.len());
            return None;
        }

        history.sort_by_key(|transaction| transaction.timestamp);

        let timestamps: Vec<DateTime<Utc>> = history.iter().map(|transaction| transaction.timestamp).collect();
        let interval = average_interval(&timestamps)?;
        let last = *timestamps.last()?;
        let predicted_next_date = last.checked_add_signed(interval)?;

        let total: Decimal = history.iter().map(|transaction| transaction.magnitude()).sum();
        let average_amount = total / Decimal::from(history.len());

        let likelihood = self.likelihood(history.len(), average_amount);

        let warning = (likelihood > self.config.warning_threshold).then(|| {
            format!(
                "High likelihood ({:.0}%) of spending in {category} category around {}",
                likelihood * 100.0,
                predicted_next_date.format("%b %d, %Y")
            )
        });

        Some(PredictedSpend {
            category: category.to_string(),
            likelihood,
            predicted_next_date,
            warning
        })
    }

    pub fn likelihood(&self, count: usize, average_amount: Decimal) -> f64 {
        let likelihood = (self.frequency_signal(count) + self.amount_signal(average_amount)) / 2.0;
        likelihood.clamp(0.0, 1.0)
    }

    pub fn frequency_signal(&self, count: usize) -> f64 {
        let lookback_days = f64::from(self.config.lookback.approx_days());

        if lookback_days <= 0.0 {
            return 1.0;
        }

        let signal = count as f64 / lookback_days * f64::from(self.config.reference_period_days);
        signal.clamp(0.0, 1.0)
    }

    pub fn amount_signal(&self, average_amount: Decimal) -> f64 {
        let signal = average_amount.abs()
            .checked_div(self.config.amount_ceiling)
            .map(|ratio| ratio.min(Decimal::ONE))
            .and_then(|ratio| ratio.to_f64())
            .unwrap_or(1.0);

        signal.clamp(0.0, 1.0)
    }
}

/// Mean gap between consecutive timestamps, computed as `(last - first) / (n - 1)`.
///
/// Expects ascending input; returns `None` for fewer than two timestamps.
pub fn average_interval(timestamps: &[DateTime<Utc>]) -> Option<Duration> {
    let (first, last) = (timestamps.first()?, timestamps.last()?);
    let gaps = i64::try_from(timestamps.len().checked_sub(1)?).ok().filter(|gaps| *gaps > 0)?;

    let span = *last - *first;

    Some(Duration::milliseconds(span.num_milliseconds() / gaps))
}
