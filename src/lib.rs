//! Spending analytics over a per-account stream of categorized transactions.
//!
//! [`engine::AnalyticsEngine`] reads from a [`storage::TransactionStore`] and derives category
//! totals, temporal spending patterns and per-category spending predictions.

pub mod analytics;
pub mod config;
pub mod engine;
pub mod models;
pub mod storage;
pub mod types;
