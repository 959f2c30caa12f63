mod account;
mod analytics;
mod errors;
mod transaction;

pub use account::Account;
pub use analytics::{
    BillShare, CategoryBreakdown, CategoryCount, CategoryTotal, DailyPattern, PredictedSpend, RecurringBill, SpendingAnalytics,
    TimePattern, UpcomingBill
};
pub use errors::{AnalyticsError, ErrorKind};
pub use transaction::Transaction;

/// Default category label for salary and other income.
pub const INCOME_CATEGORY: &str = "Income";

/// Default category labels treated as bill payments.
pub const BILL_CATEGORIES: [&str; 2] = ["Bill Payment", "Subscription"];
