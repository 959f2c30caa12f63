use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{CategoryBreakdown, CategoryCount, CategoryTotal, Transaction};

/// How transaction amounts contribute to a total.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AmountMode {
    /// Inflows and outflows both count by their absolute value.
    Magnitude,
    /// Raw signed amounts, for callers that already restricted the input to one direction.
    Signed
}

impl AmountMode {
    fn apply(&self, transaction: &Transaction) -> Decimal {
        match self {
            AmountMode::Magnitude => transaction.magnitude(),
            AmountMode::Signed => transaction.amount
        }
    }
}

/// Totals per category with each category's share of the overall total.
pub fn aggregate_transactions(transactions: &[Transaction], mode: AmountMode) -> CategoryBreakdown {
    aggregate_by(transactions, mode, |transaction| transaction.category.as_str())
}

/// Same as [`aggregate_transactions`], grouping on an arbitrary label (merchant, location, ...).
pub fn aggregate_by<F>(transactions: &[Transaction], mode: AmountMode, label: F) -> CategoryBreakdown
where
    F: Fn(&Transaction) -> &str,
{
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();

    for transaction in transactions {
        *totals.entry(label(transaction).to_string()).or_insert(Decimal::ZERO) += mode.apply(transaction);
    }

    breakdown(totals)
}

/// Builds a breakdown from sums the store already aggregated. Sums are taken as magnitudes.
pub fn aggregate_totals(totals: BTreeMap<String, Decimal>) -> CategoryBreakdown {
    breakdown(totals.into_iter().map(|(category, total)| (category, total.abs())))
}

/// Transaction count per category, busiest first, ties by name.
pub fn category_counts(transactions: &[Transaction]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for transaction in transactions {
        *counts.entry(transaction.category.as_str()).or_default() += 1;
    }

    let mut counts: Vec<CategoryCount> = counts.into_iter()
        .map(|(category, transaction_count)| CategoryCount {
            category: category.to_string(),
            transaction_count
        })
        .collect();

    counts.sort_by(|a, b| b.transaction_count.cmp(&a.transaction_count).then_with(|| a.category.cmp(&b.category)));

    counts
}

fn breakdown(totals: impl IntoIterator<Item = (String, Decimal)>) -> CategoryBreakdown {
    let totals: Vec<(String, Decimal)> = totals.into_iter().collect();
    let grand_total: Decimal = totals.iter().map(|(_, total)| *total).sum();
    let percentages_defined = !grand_total.is_zero();

    let mut totals: Vec<CategoryTotal> = totals.into_iter()
        .map(|(category, total_amount)| CategoryTotal {
            percentage_of_total: percentage(total_amount, grand_total),
            category,
            total_amount
        })
        .collect();

    totals.sort_by(|a, b| b.total_amount.cmp(&a.total_amount).then_with(|| a.category.cmp(&b.category)));

    CategoryBreakdown {
        totals,
        grand_total,
        percentages_defined
    }
}

fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }

    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}
