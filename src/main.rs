mod cli;
mod engine;
mod ingest;
mod mock;
mod models;
mod report;
mod types;

use std::io::{stderr, stdout, BufWriter};
use std::time::Instant;

use anyhow::Result;
use chrono::{Days, NaiveDate, Utc};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::cli::{CliArgs, Command, FilterArgs, GenerateArgs, SummaryArgs};
use crate::engine::{EngineConfig, TransactionQueryEngine};
use crate::ingest::Ingested;
use crate::mock::{MockConfig, MockGenerator};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    setup_logging(args.log_level);

    let engine = TransactionQueryEngine::new(EngineConfig::new(args.utc_offset));

    match args.command {
        Command::Query(filter) => run_query(&engine, &filter).await,
        Command::Summary(summary) => run_summary(&engine, &summary).await,
        Command::Generate(generate) => run_generate(&engine, &generate)
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Results go to stdout so that they can be redirected, logging has to use stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

async fn run_query(engine: &TransactionQueryEngine, filter: &FilterArgs) -> Result<()> {
    let ingested = load(filter).await?;
    let criteria = filter.criteria(today(engine, filter.today));

    let timer = Instant::now();
    let filtered = engine.filter(&ingested.transactions, &criteria);

    info!(
        "Matched [{}] of [{}] transactions with [{}] warnings in {:?}",
        filtered.transactions.len(), ingested.transactions.len(), filtered.warnings.len(), timer.elapsed()
    );

    report::write_transactions(BufWriter::new(stdout().lock()), filtered.transactions.iter().copied())
}

async fn run_summary(engine: &TransactionQueryEngine, args: &SummaryArgs) -> Result<()> {
    let ingested = load(&args.filter).await?;
    let criteria = args.filter.criteria(today(engine, args.filter.today));

    let timer = Instant::now();
    let result = engine.query(&ingested.transactions, &criteria);

    info!(
        "Summarized [{}] of [{}] matching transactions with [{}] warnings in {:?}",
        result.summary.count, result.transactions.len(), result.warnings.len(), timer.elapsed()
    );

    let comparison = if args.compare {
        match criteria.date_range.previous_period() {
            Some(previous_range) => {
                let previous = engine.query(&ingested.transactions, &criteria.clone().with_date_range(previous_range));
                Some(result.summary.growth_over(&previous.summary))
            }
            None => {
                warn!("Period comparison needs a date range bounded on both sides, skipping it");
                None
            }
        }
    } else {
        None
    };

    report::write_summary(BufWriter::new(stdout().lock()), &result.summary, comparison.as_ref())
}

fn run_generate(engine: &TransactionQueryEngine, args: &GenerateArgs) -> Result<()> {
    let start = args.start.unwrap_or_else(|| {
        let today = today(engine, None);
        today.checked_sub_days(Days::new(u64::from(args.days.saturating_sub(1)))).unwrap_or(today)
    });

    let config = MockConfig {
        count: args.count,
        start,
        days: args.days,
        malformed_rate: args.malformed_rate
    };

    let transactions = MockGenerator::new(args.seed).generate(&config);

    info!("Generated [{}] mock transactions starting [{start}] with seed [{}]", transactions.len(), args.seed);

    report::write_transactions(BufWriter::new(stdout().lock()), &transactions)
}

async fn load(filter: &FilterArgs) -> Result<Ingested> {
    let ingested = ingest::load(&filter.input).await?;

    if !ingested.rejected.is_empty() {
        warn!("Skipped [{}] unreadable rows in [{}]", ingested.rejected.len(), filter.input.display());
    }

    Ok(ingested)
}

fn today(engine: &TransactionQueryEngine, explicit: Option<NaiveDate>) -> NaiveDate {
    explicit.unwrap_or_else(|| Utc::now().with_timezone(&engine.config().reference_offset).date_naive())
}
