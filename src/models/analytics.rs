use chrono::{DateTime, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::HourOfDay;

/// Total spend for one category and its share of the full category set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: Decimal,
    /// Percentage in `0..=100`, zero when the overall total is zero.
    pub percentage_of_total: Decimal
}

/// The complete, untruncated set of category totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    /// Sorted by `total_amount` descending, then by category name.
    pub totals: Vec<CategoryTotal>,
    pub grand_total: Decimal,
    /// `false` when `grand_total` is zero and every percentage was reported as zero.
    pub percentages_defined: bool
}

impl CategoryBreakdown {
    /// The `n` highest totals. Percentages stay relative to the full set.
    pub fn top(&self, n: usize) -> Vec<CategoryTotal> {
        self.totals.iter().take(n).cloned().collect()
    }
}

/// How often and how much an account spends in one (day-of-week, hour) bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePattern {
    pub day_of_week: Weekday,
    pub time_of_day: HourOfDay,
    pub frequency: usize,
    pub average_spend: Decimal
}

/// Predicted next spend for a category with enough history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictedSpend {
    pub category: String,
    /// Heuristic score in `[0, 1]`.
    pub likelihood: f64,
    pub predicted_next_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>
}

/// Result of a full spending analysis for one account and time range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingAnalytics {
    pub top_categories: Vec<CategoryTotal>,
    pub time_patterns: Vec<TimePattern>,
    pub predicted_spending: Vec<PredictedSpend>,
    pub total_spent: Decimal,
    pub monthly_average: Decimal
}

/// How many transactions a category saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub transaction_count: usize
}

/// Spend on one day of the week across a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPattern {
    pub day_of_week: Weekday,
    pub transaction_count: usize,
    pub total_spent: Decimal,
    pub average_spend: Decimal
}

/// A merchant's share of a month's bill payments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillShare {
    pub merchant: String,
    pub total_amount: Decimal,
    pub percentage_of_total: Decimal
}

/// A bill seen in enough distinct months to be considered recurring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringBill {
    pub merchant: String,
    pub category: String,
    pub months_present: usize,
    pub average_amount: Decimal,
    pub median_amount: Decimal,
    pub first_occurrence: DateTime<Utc>,
    pub last_occurrence: DateTime<Utc>
}

/// Expected next payment of a recurring bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingBill {
    pub merchant: String,
    pub category: String,
    pub expected_amount: Decimal,
    pub due_date: NaiveDate
}
