use std::collections::HashMap;

use chrono::{Datelike, FixedOffset, Timelike, Weekday};
use rust_decimal::Decimal;

use crate::models::{DailyPattern, TimePattern, Transaction};
use crate::types::{BucketKey, HourOfDay};

#[derive(Debug, Default)]
struct BucketStats {
    count: usize,
    total: Decimal
}

impl BucketStats {
    fn record(&mut self, transaction: &Transaction) {
        self.count += 1;
        self.total += transaction.magnitude();
    }

    fn average(&self) -> Decimal {
        if self.count == 0 {
            return Decimal::ZERO;
        }

        self.total / Decimal::from(self.count)
    }
}

/// Buckets transactions by (day-of-week, hour) as seen from `offset`.
///
/// Only observed buckets are returned, most frequent first, then by higher average spend.
pub fn analyze_time_patterns(transactions: &[Transaction], offset: FixedOffset) -> Vec<TimePattern> {
    let mut buckets: HashMap<BucketKey, BucketStats> = HashMap::new();

    for transaction in transactions {
        let local = transaction.timestamp.with_timezone(&offset);
        let Some(hour) = HourOfDay::new(local.hour()) else {
            continue;
        };

        buckets.entry(BucketKey::new(local.weekday(), hour)).or_default().record(transaction);
    }

    let mut patterns: Vec<(BucketKey, TimePattern)> = buckets.into_iter()
        .map(|(key, stats)| (key, TimePattern {
            day_of_week: key.day,
            time_of_day: key.hour,
            frequency: stats.count,
            average_spend: stats.average()
        }))
        .collect();

    patterns.sort_by(|(a_key, a), (b_key, b)| {
        b.frequency.cmp(&a.frequency)
            .then_with(|| b.average_spend.cmp(&a.average_spend))
            .then_with(|| a_key.ordinal().cmp(&b_key.ordinal()))
    });

    patterns.into_iter().map(|(_, pattern)| pattern).collect()
}

/// Spend per day of the week as seen from `offset`, Monday first. Days without spend are omitted.
pub fn analyze_daily_patterns(transactions: &[Transaction], offset: FixedOffset) -> Vec<DailyPattern> {
    let mut days: HashMap<Weekday, BucketStats> = HashMap::new();

    for transaction in transactions {
        let day = transaction.timestamp.with_timezone(&offset).weekday();
        days.entry(day).or_default().record(transaction);
    }

    let mut patterns: Vec<DailyPattern> = days.into_iter()
        .map(|(day_of_week, stats)| DailyPattern {
            day_of_week,
            transaction_count: stats.count,
            average_spend: stats.average(),
            total_spent: stats.total
        })
        .collect();

    patterns.sort_by_key(|pattern| pattern.day_of_week.num_days_from_monday());

    patterns
}
