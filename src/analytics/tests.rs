use super::{
    aggregate_totals, aggregate_transactions, analyze_daily_patterns, analyze_time_patterns, average_interval,
    bill_shares, category_counts, merchant_bills, recurring_bills, upcoming_bills, AmountMode, SpendingPredictor
};
use crate::config::PredictorConfig;
use crate::models::Transaction;

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use anyhow::Result;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, TimeZone, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

const CATEGORIES: [&str; 6] = ["Groceries", "Dining", "Rent", "Transport", "Utilities", "Shopping"];

fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

fn create_transaction(timestamp: DateTime<Utc>, amount: &str, category: &str, merchant: &str) -> Result<Transaction> {
    Ok(Transaction {
        id: format!("{category}-{}", timestamp.timestamp()),
        account_id: "A1".to_string(),
        timestamp,
        amount: Decimal::from_str(amount)?,
        category: category.to_string(),
        merchant: merchant.to_string(),
        location: "Springfield".to_string()
    })
}

fn random_transactions(seed: u64, count: usize) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = at(2024, 1, 1, 0);

    (0..count)
        .map(|index| {
            let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
            let cents: i64 = rng.gen_range(-250_000..50_000);

            Transaction {
                id: index.to_string(),
                account_id: "A1".to_string(),
                timestamp: start + Duration::minutes(rng.gen_range(0..60 * 24 * 180)),
                amount: Decimal::new(cents, 2),
                category: category.to_string(),
                merchant: format!("{category} Merchant {}", rng.gen_range(0..3)),
                location: "Springfield".to_string()
            }
        })
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {expected} but found {actual}");
}

#[test]
fn test_category_percentages_sum_to_one_hundred_over_the_full_set() {
    let tolerance = Decimal::new(1, 10);

    for seed in 0..20 {
        let transactions = random_transactions(seed, 50);
        let breakdown = aggregate_transactions(&transactions, AmountMode::Magnitude);
        let sum: Decimal = breakdown.totals.iter().map(|total| total.percentage_of_total).sum();

        assert!(breakdown.percentages_defined);
        assert!((sum - Decimal::ONE_HUNDRED).abs() < tolerance, "seed {seed} summed to {sum}");
    }
}

#[test]
fn test_category_totals_use_magnitudes_and_sort_deterministically() -> Result<()> {
    let transactions = vec![
        create_transaction(at(2024, 1, 1, 9), "-30.00", "Dining", "Cafe")?,
        create_transaction(at(2024, 1, 2, 9), "50.00", "Refunds", "Store")?,
        create_transaction(at(2024, 1, 3, 9), "-20.00", "Dining", "Cafe")?,
        create_transaction(at(2024, 1, 4, 9), "-50.00", "Books", "Shop")?,
    ];

    let breakdown = aggregate_transactions(&transactions, AmountMode::Magnitude);
    let names: Vec<&str> = breakdown.totals.iter().map(|total| total.category.as_str()).collect();

    assert_eq!(names, vec!["Books", "Dining", "Refunds"]);
    assert_eq!(breakdown.grand_total, Decimal::from(150));
    assert_eq!(breakdown.totals[1].total_amount, Decimal::from(50));

    Ok(())
}

#[test]
fn test_signed_mode_keeps_raw_amounts() -> Result<()> {
    let income = vec![
        create_transaction(at(2024, 1, 1, 9), "2000.00", "Income", "Employer")?,
        create_transaction(at(2024, 1, 15, 9), "-100.00", "Income", "Employer")?,
    ];

    let breakdown = aggregate_transactions(&income, AmountMode::Signed);

    assert_eq!(breakdown.grand_total, Decimal::from(1900));
    assert_eq!(breakdown.totals[0].percentage_of_total, Decimal::ONE_HUNDRED);

    Ok(())
}

#[test]
fn test_truncation_happens_after_percentages_are_computed() {
    let totals: BTreeMap<String, Decimal> = CATEGORIES.iter()
        .map(|category| (category.to_string(), Decimal::from(100)))
        .collect();

    let breakdown = aggregate_totals(totals);
    let top = breakdown.top(5);

    assert_eq!(top.len(), 5);
    assert_eq!(breakdown.totals.len(), 6);

    let expected = Decimal::ONE_HUNDRED / Decimal::from(6);
    let tolerance = Decimal::new(1, 10);

    for total in top {
        assert!((total.percentage_of_total - expected).abs() < tolerance);
    }
}

#[test]
fn test_zero_total_reports_zero_percentages_without_dividing() {
    let totals = BTreeMap::from([
        ("Groceries".to_string(), Decimal::ZERO),
        ("Dining".to_string(), Decimal::ZERO),
    ]);

    let breakdown = aggregate_totals(totals);

    assert!(!breakdown.percentages_defined);
    assert!(breakdown.totals.iter().all(|total| total.percentage_of_total.is_zero()));
    assert!(aggregate_totals(BTreeMap::new()).totals.is_empty());
}

#[test]
fn test_time_pattern_frequencies_account_for_every_transaction() {
    for seed in 0..20 {
        let transactions = random_transactions(seed, 200);
        let patterns = analyze_time_patterns(&transactions, Utc.fix());
        let total: usize = patterns.iter().map(|pattern| pattern.frequency).sum();

        assert_eq!(total, transactions.len());
        assert!(patterns.iter().all(|pattern| pattern.frequency > 0));
    }
}

#[test]
fn test_time_patterns_are_sparse_and_ordered() -> Result<()> {
    // 2024-01-01 is a Monday.
    let transactions = vec![
        create_transaction(at(2024, 1, 1, 9), "-10.00", "Dining", "Cafe")?,
        create_transaction(at(2024, 1, 8, 9), "-30.00", "Dining", "Cafe")?,
        create_transaction(at(2024, 1, 2, 18), "-100.00", "Groceries", "Market")?,
        create_transaction(at(2024, 1, 3, 7), "-5.00", "Transport", "Metro")?,
    ];

    let patterns = analyze_time_patterns(&transactions, Utc.fix());

    assert_eq!(patterns.len(), 3);
    assert_eq!(patterns[0].day_of_week, Weekday::Mon);
    assert_eq!(patterns[0].time_of_day.to_string(), "09:00");
    assert_eq!(patterns[0].frequency, 2);
    assert_eq!(patterns[0].average_spend, Decimal::from(20));
    assert_eq!(patterns[1].day_of_week, Weekday::Tue);
    assert_eq!(patterns[2].day_of_week, Weekday::Wed);

    Ok(())
}

#[test]
fn test_time_patterns_use_the_configured_zone() -> Result<()> {
    let transactions = vec![create_transaction(at(2024, 1, 1, 2), "-10.00", "Dining", "Cafe")?];
    let new_york = FixedOffset::west_opt(5 * 3600).ok_or_else(|| anyhow::anyhow!("bad offset"))?;

    let utc = analyze_time_patterns(&transactions, Utc.fix());
    let local = analyze_time_patterns(&transactions, new_york);

    assert_eq!((utc[0].day_of_week, utc[0].time_of_day.hour()), (Weekday::Mon, 2));
    assert_eq!((local[0].day_of_week, local[0].time_of_day.hour()), (Weekday::Sun, 21));

    Ok(())
}

#[test]
fn test_empty_input_yields_empty_patterns() {
    assert!(analyze_time_patterns(&[], Utc.fix()).is_empty());
    assert!(analyze_daily_patterns(&[], Utc.fix()).is_empty());
}

#[test]
fn test_daily_patterns_total_per_weekday_monday_first() -> Result<()> {
    let transactions = vec![
        create_transaction(at(2024, 1, 7, 12), "-40.00", "Dining", "Cafe")?,
        create_transaction(at(2024, 1, 1, 9), "-10.00", "Dining", "Cafe")?,
        create_transaction(at(2024, 1, 8, 19), "-30.00", "Groceries", "Market")?,
    ];

    let patterns = analyze_daily_patterns(&transactions, Utc.fix());

    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[0].day_of_week, Weekday::Mon);
    assert_eq!(patterns[0].transaction_count, 2);
    assert_eq!(patterns[0].total_spent, Decimal::from(40));
    assert_eq!(patterns[0].average_spend, Decimal::from(20));
    assert_eq!(patterns[1].day_of_week, Weekday::Sun);

    Ok(())
}

#[test]
fn test_average_interval_matches_pairwise_mean() {
    let timestamps = vec![at(2024, 1, 1, 0), at(2024, 1, 11, 0), at(2024, 1, 21, 0)];

    let pairwise: i64 = timestamps.windows(2)
        .map(|pair| (pair[1] - pair[0]).num_milliseconds())
        .sum::<i64>() / (timestamps.len() as i64 - 1);

    assert_eq!(average_interval(&timestamps), Some(Duration::milliseconds(pairwise)));
    assert_eq!(average_interval(&timestamps), Some(Duration::days(10)));
    assert_eq!(average_interval(&timestamps[..1]), None);
    assert_eq!(average_interval(&[]), None);
}

#[test]
fn test_predictor_weekly_groceries_scenario() -> Result<()> {
    let transactions = vec![
        create_transaction(at(2024, 1, 15, 10), "-100.00", "Groceries", "Market")?,
        create_transaction(at(2024, 1, 1, 10), "-100.00", "Groceries", "Market")?,
        create_transaction(at(2024, 1, 8, 10), "-100.00", "Groceries", "Market")?,
    ];

    let predictor = SpendingPredictor::new(PredictorConfig::default());
    let predictions = predictor.predict(&transactions);

    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0].category, "Groceries");
    assert_eq!(predictions[0].predicted_next_date, at(2024, 1, 22, 10));
    assert_close(predictor.frequency_signal(3), 0.5);
    assert_close(predictor.amount_signal(Decimal::from(100)), 0.1);
    assert_close(predictions[0].likelihood, 0.3);
    assert!(predictions[0].warning.is_none());

    Ok(())
}

#[test]
fn test_predictor_omits_categories_with_sparse_history() {
    for seed in 0..20 {
        let transactions = random_transactions(seed, 12);
        let mut counts: HashMap<&str, usize> = HashMap::new();

        for transaction in &transactions {
            *counts.entry(transaction.category.as_str()).or_default() += 1;
        }

        let predictions = SpendingPredictor::new(PredictorConfig::default()).predict(&transactions);

        for prediction in &predictions {
            assert!(counts[prediction.category.as_str()] >= 3, "seed {seed} predicted {}", prediction.category);
        }

        let eligible = counts.values().filter(|count| **count >= 3).count();

        assert_eq!(predictions.len(), eligible);
    }
}

#[test]
fn test_predictor_likelihood_bounds_and_warning_threshold() {
    let predictor = SpendingPredictor::new(PredictorConfig::default());

    for seed in 0..20 {
        let predictions = predictor.predict(&random_transactions(seed, 300));

        for prediction in &predictions {
            assert!((0.0..=1.0).contains(&prediction.likelihood));
            assert_eq!(prediction.warning.is_some(), prediction.likelihood > 0.7);
        }

        assert!(predictions.windows(2).all(|pair| pair[0].likelihood >= pair[1].likelihood));
    }
}

#[test]
fn test_predictor_warns_for_frequent_expensive_categories() -> Result<()> {
    let transactions: Vec<Transaction> = (0..40)
        .map(|day| create_transaction(at(2024, 1, 1, 8) + Duration::days(day * 4), "-1500.00", "Rent", "Landlord"))
        .collect::<Result<_>>()?;

    let predictions = SpendingPredictor::new(PredictorConfig::default()).predict(&transactions);
    let warning = predictions[0].warning.clone().unwrap_or_default();

    assert_close(predictions[0].likelihood, 1.0);
    assert!(warning.contains("Rent"));
    assert!(warning.contains("100%"));
    assert!(warning.contains("Jun 09, 2024"));

    Ok(())
}

#[test]
fn test_category_counts_account_for_every_transaction() {
    let transactions = random_transactions(31, 400);

    let counts = category_counts(&transactions);

    assert_eq!(counts.iter().map(|count| count.transaction_count).sum::<usize>(), 400);
    assert!(counts.windows(2).all(|pair| {
        pair[0].transaction_count > pair[1].transaction_count
            || (pair[0].transaction_count == pair[1].transaction_count && pair[0].category < pair[1].category)
    }));
    assert!(category_counts(&[]).is_empty());
}

#[test]
fn test_merchant_bills_keep_only_bill_categories_newest_first() -> Result<()> {
    let categories = vec!["Bill Payment".to_string(), "Subscription".to_string()];
    let transactions = vec![
        create_transaction(at(2024, 1, 5, 8), "-110.00", "Bill Payment", "Power Co")?,
        create_transaction(at(2024, 2, 5, 8), "-95.00", "Bill Payment", "Power Co")?,
        create_transaction(at(2024, 2, 9, 8), "-12.00", "Shopping", "Power Co")?,
        create_transaction(at(2024, 2, 7, 8), "-15.00", "Subscription", "Streamly")?,
    ];

    let history = merchant_bills(&transactions, "Power Co", &categories);

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].timestamp, at(2024, 2, 5, 8));
    assert_eq!(history[1].timestamp, at(2024, 1, 5, 8));
    assert!(merchant_bills(&transactions, "Nobody", &categories).is_empty());

    Ok(())
}

#[test]
fn test_bill_shares_split_by_merchant() -> Result<()> {
    let bills = vec![
        create_transaction(at(2024, 2, 1, 8), "-75.00", "Bill Payment", "Power Co")?,
        create_transaction(at(2024, 2, 3, 8), "-25.00", "Subscription", "Streamly")?,
    ];

    let shares = bill_shares(&bills);

    assert_eq!(shares[0].merchant, "Power Co");
    assert_eq!(shares[0].percentage_of_total, Decimal::from(75));
    assert_eq!(shares[1].percentage_of_total, Decimal::from(25));

    Ok(())
}

#[test]
fn test_recurring_and_upcoming_bills() -> Result<()> {
    let categories = vec!["Bill Payment".to_string(), "Subscription".to_string()];
    let transactions = vec![
        create_transaction(at(2023, 11, 28, 8), "-90.00", "Bill Payment", "Power Co")?,
        create_transaction(at(2023, 12, 30, 8), "-110.00", "Bill Payment", "Power Co")?,
        create_transaction(at(2024, 1, 31, 8), "-100.00", "Bill Payment", "Power Co")?,
        create_transaction(at(2023, 11, 5, 8), "-15.00", "Subscription", "Streamly")?,
        create_transaction(at(2023, 12, 5, 8), "-15.00", "Subscription", "Streamly")?,
        create_transaction(at(2024, 1, 5, 8), "-15.00", "Subscription", "Streamly")?,
        create_transaction(at(2024, 1, 6, 8), "-45.00", "Subscription", "Streamly")?,
        create_transaction(at(2023, 12, 9, 8), "-60.00", "Bill Payment", "Water Co")?,
        create_transaction(at(2024, 1, 9, 8), "-60.00", "Bill Payment", "Water Co")?,
        create_transaction(at(2024, 1, 9, 8), "-400.00", "Groceries", "Market")?,
    ];

    let recurring = recurring_bills(&transactions, &categories, 3);

    assert_eq!(recurring.len(), 2);
    assert_eq!(recurring[0].merchant, "Power Co");
    assert_eq!(recurring[0].months_present, 3);
    assert_eq!(recurring[0].average_amount, Decimal::from(100));
    assert_eq!(recurring[0].median_amount, Decimal::from(100));
    assert_eq!(recurring[0].last_occurrence, at(2024, 1, 31, 8));
    assert_eq!(recurring[1].merchant, "Streamly");
    assert_eq!(recurring[1].median_amount, Decimal::from(15));

    let upcoming = upcoming_bills(&transactions, &categories, 3);

    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0].merchant, "Streamly");
    assert_eq!(upcoming[0].due_date, NaiveDate::from_ymd_opt(2024, 2, 5).unwrap());
    // Average day 29 lands on the leap day of February 2024.
    assert_eq!(upcoming[1].merchant, "Power Co");
    assert_eq!(upcoming[1].due_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

    Ok(())
}
