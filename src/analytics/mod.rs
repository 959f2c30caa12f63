//! Pure computations over transaction lists. Nothing in here touches the Transaction Store.

mod bill_analyzer;
mod category_aggregator;
mod spending_predictor;
mod temporal_analyzer;
#[cfg(test)]
mod tests;

pub use bill_analyzer::{bill_shares, merchant_bills, recurring_bills, upcoming_bills};
pub use category_aggregator::{aggregate_by, aggregate_totals, aggregate_transactions, category_counts, AmountMode};
pub use spending_predictor::{average_interval, SpendingPredictor};
pub use temporal_analyzer::{analyze_daily_patterns, analyze_time_patterns};
