use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::analytics::category_aggregator::{aggregate_by, AmountMode};
use crate::models::{BillShare, RecurringBill, Transaction, UpcomingBill};
use crate::types::MonthScope;

struct BillGroup<'a> {
    merchant: &'a str,
    category: &'a str,
    /// Ascending by timestamp.
    payments: Vec<&'a Transaction>,
    months_present: usize
}

impl BillGroup<'_> {
    fn magnitudes(&self) -> Vec<Decimal> {
        self.payments.iter().map(|payment| payment.magnitude()).collect()
    }

    fn average_amount(&self) -> Decimal {
        let magnitudes = self.magnitudes();
        let count = magnitudes.len();

        if count == 0 {
            return Decimal::ZERO;
        }

        magnitudes.into_iter().sum::<Decimal>() / Decimal::from(count)
    }

    fn median_amount(&self) -> Decimal {
        let mut magnitudes = self.magnitudes();
        magnitudes.sort();

        let middle = magnitudes.len() / 2;

        match magnitudes.len() {
            0 => Decimal::ZERO,
            length if length % 2 == 1 => magnitudes[middle],
            _ => (magnitudes[middle - 1] + magnitudes[middle]) / Decimal::TWO
        }
    }
}

/// Share of the bill total per merchant, largest first.
pub fn bill_shares(bills: &[Transaction]) -> Vec<BillShare> {
    aggregate_by(bills, AmountMode::Magnitude, |transaction| transaction.merchant.as_str())
        .totals
        .into_iter()
        .map(|total| BillShare {
            merchant: total.category,
            total_amount: total.total_amount,
            percentage_of_total: total.percentage_of_total
        })
        .collect()
}

/// Payments to `merchant` in any of `bill_categories`, newest first.
pub fn merchant_bills(transactions: &[Transaction], merchant: &str, bill_categories: &[String]) -> Vec<Transaction> {
    let mut bills: Vec<Transaction> = transactions.iter()
        .filter(|transaction| transaction.merchant == merchant && bill_categories.contains(&transaction.category))
        .cloned()
        .collect();

    bills.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));

    bills
}

/// Bills in `bill_categories` paid in at least `min_months` distinct calendar months,
/// grouped by merchant and category, highest average amount first.
pub fn recurring_bills(transactions: &[Transaction], bill_categories: &[String], min_months: usize) -> Vec<RecurringBill> {
    let mut bills: Vec<RecurringBill> = recurring_groups(transactions, bill_categories, min_months)
        .into_iter()
        .filter_map(|group| {
            let first = group.payments.first()?.timestamp;
            let last = group.payments.last()?.timestamp;

            Some(RecurringBill {
                merchant: group.merchant.to_string(),
                category: group.category.to_string(),
                months_present: group.months_present,
                average_amount: group.average_amount(),
                median_amount: group.median_amount(),
                first_occurrence: first,
                last_occurrence: last
            })
        })
        .collect();

    bills.sort_by(|a, b| b.average_amount.cmp(&a.average_amount).then_with(|| a.merchant.cmp(&b.merchant)));

    bills
}

/// Next expected payment of each recurring bill, soonest first.
///
/// The due date falls in the month after the last payment, on the average day-of-month of past
/// payments (truncated), clamped to the length of that month.
pub fn upcoming_bills(transactions: &[Transaction], bill_categories: &[String], min_months: usize) -> Vec<UpcomingBill> {
    let mut bills: Vec<UpcomingBill> = recurring_groups(transactions, bill_categories, min_months)
        .into_iter()
        .filter_map(|group| {
            let due_date = next_due_date(&group)?;

            Some(UpcomingBill {
                merchant: group.merchant.to_string(),
                category: group.category.to_string(),
                expected_amount: group.average_amount(),
                due_date
            })
        })
        .collect();

    bills.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.merchant.cmp(&b.merchant)));

    bills
}

fn next_due_date(group: &BillGroup<'_>) -> Option<NaiveDate> {
    let last_payment = group.payments.last()?.timestamp.date_naive();
    let next_month = last_payment.checked_add_months(Months::new(1))?;

    let day_sum: u32 = group.payments.iter().map(|payment| payment.timestamp.day()).sum();
    let average_day = day_sum / u32::try_from(group.payments.len()).ok()?;

    let scope = MonthScope::new(next_month.year(), next_month.month()).ok()?;
    let day = average_day.clamp(1, scope.days_in_month());

    NaiveDate::from_ymd_opt(scope.year(), scope.month(), day)
}

fn recurring_groups<'a>(transactions: &'a [Transaction], bill_categories: &[String], min_months: usize) -> Vec<BillGroup<'a>> {
    let mut groups: BTreeMap<(&str, &str), Vec<&Transaction>> = BTreeMap::new();

    for transaction in transactions {
        if bill_categories.iter().any(|category| *category == transaction.category) {
            groups.entry((transaction.merchant.as_str(), transaction.category.as_str()))
                .or_default()
                .push(transaction);
        }
    }

    groups.into_iter()
        .filter_map(|((merchant, category), mut payments)| {
            payments.sort_by_key(|payment| payment.timestamp);

            let months: BTreeSet<(i32, u32)> = payments.iter()
                .map(|payment| (payment.timestamp.year(), payment.timestamp.month()))
                .collect();

            (months.len() >= min_months).then(|| BillGroup {
                merchant,
                category,
                payments,
                months_present: months.len()
            })
        })
        .collect()
}
