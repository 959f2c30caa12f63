use std::io::{stderr, stdout, BufWriter, Write};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use spending_analytics_engine::engine::AnalyticsEngine;
use spending_analytics_engine::models::{ErrorKind, SpendingAnalytics};
use spending_analytics_engine::storage::{load_csv, MemoryStore};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: spending-analytics-engine [transactions].csv [account_id] [time_range:optional] [log_level:optional] > [output].json");
        eprintln!("Available time ranges: \"1 month\", \"3 months\", \"6 months\", \"1 year\" or \"<n> days|weeks|months|years\" (default: 1 month)");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let path = &args[1];
    let account_id = &args[2];
    let time_range = args.get(3).map(String::as_str);
    let log_level = args.get(4)
        .map(|s| parse_log_level(s)).unwrap_or_else(|| LevelFilter::ERROR);

    setup_logging(log_level);

    let store = Arc::new(MemoryStore::new());

    if let Err(error) = load_csv(path, store.clone()).await {
        eprintln!("Unable to load transactions from {path}: {error}");
        exit(1);
    }

    let engine = AnalyticsEngine::new(store);

    let timer = Instant::now();
    let result = engine.analyze_spending(account_id, time_range).await;
    let duration = timer.elapsed();

    info!("Analyzed spending in: {duration:?}");

    match result {
        Ok(analytics) => write_results_to_stdout(&analytics)?,
        Err(error) => {
            eprintln!("{error}");
            exit(exit_code(error.kind()));
        }
    }

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the JSON document, so logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Validation => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::Upstream => 4
    }
}

fn write_results_to_stdout(analytics: &SpendingAnalytics) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    serde_json::to_writer_pretty(&mut output, analytics)?;
    writeln!(output)?;

    output.flush()?;

    Ok(())
}
