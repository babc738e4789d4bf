use std::path::PathBuf;

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::models::{DateRange, FilterCriteria, StatusFilter, TimeRange};

const MAX_WINDOW_DAYS: i64 = 36_500;

/// Filter and summarize payment transactions for dashboard views
#[derive(Parser, Debug)]
#[command(name = "transaction-query-engine")]
#[command(about = "Filter and summarize payment transactions for dashboard views", long_about = None)]
pub struct CliArgs {
    /// Log verbosity written to stderr
    #[arg(
        long = "log-level",
        global = true,
        value_name = "LEVEL",
        default_value = "error",
        value_parser = parse_log_level,
        help = "Log level: error, warn, info, debug or trace"
    )]
    pub log_level: LevelFilter,

    /// Offset used to turn timestamps into calendar dates
    #[arg(
        long = "utc-offset",
        global = true,
        value_name = "OFFSET",
        default_value = "+00:00",
        allow_hyphen_values = true,
        value_parser = parse_utc_offset,
        help = "Reference offset for daily buckets, e.g. +05:30 (default: UTC)"
    )]
    pub utc_offset: FixedOffset,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the transactions matching the filters as CSV
    Query(FilterArgs),
    /// Write volume, rates and the daily series of the matching transactions
    Summary(SummaryArgs),
    /// Write seeded mock transactions as CSV
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Input CSV file path containing transaction records
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(long, value_name = "STATUS", default_value = "all", help = "all, success, pending or failed")]
    pub status: StatusFilter,

    #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "range", help = "First day to include")]
    pub from: Option<NaiveDate>,

    #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "range", help = "Last day to include")]
    pub to: Option<NaiveDate>,

    #[arg(long, value_name = "PRESET", help = "today, 7d, 30d, 90d, month or all")]
    pub range: Option<TimeRange>,

    #[arg(long, value_name = "YYYY-MM-DD", help = "Day the range presets are relative to (default: current date)")]
    pub today: Option<NaiveDate>,

    #[arg(long, value_name = "TERM", default_value = "", help = "Case-insensitive match on client name or bank account")]
    pub search: String,
}

impl FilterArgs {
    pub fn date_range(&self, today: NaiveDate) -> DateRange {
        match self.range {
            Some(range) => range.resolve(today),
            None => DateRange::new(self.from, self.to)
        }
    }

    pub fn criteria(&self, today: NaiveDate) -> FilterCriteria {
        FilterCriteria::new()
            .with_status(self.status.clone())
            .with_date_range(self.date_range(today))
            .with_term(self.search.clone())
    }
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[arg(long, help = "Add growth against the preceding period of equal length")]
    pub compare: bool,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[arg(long, value_name = "COUNT", default_value_t = 200)]
    pub count: usize,

    #[arg(long, value_name = "SEED", default_value_t = 42)]
    pub seed: u64,

    #[arg(long, value_name = "YYYY-MM-DD", help = "First day of the window (default: DAYS before today)")]
    pub start: Option<NaiveDate>,

    #[arg(
        long,
        value_name = "DAYS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u32).range(1..=MAX_WINDOW_DAYS),
        help = "Length of the window in days, at most 100 years"
    )]
    pub days: u32,

    #[arg(
        long = "malformed-rate",
        value_name = "RATE",
        default_value_t = 0.0,
        value_parser = parse_rate,
        help = "Share of deliberately corrupted records, between 0 and 1"
    )]
    pub malformed_rate: f64,
}

pub(crate) fn parse_log_level(level: &str) -> Result<LevelFilter, String> {
    let level = match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    };

    Ok(level)
}

pub(crate) fn parse_utc_offset(value: &str) -> Result<FixedOffset, String> {
    let value = value.trim();

    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix())
    }

    let (sign, digits) = if let Some(rest) = value.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = value.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(format!("offset '{value}' must start with '+' or '-'"))
    };

    let digits: String = digits.chars().filter(|c| *c != ':').collect();

    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("offset '{value}' must look like +HH:MM"))
    }

    let hours: i32 = digits[..2].parse().map_err(|error| format!("offset '{value}': {error}"))?;
    let minutes: i32 = digits[2..].parse().map_err(|error| format!("offset '{value}': {error}"))?;

    if minutes >= 60 {
        return Err(format!("offset '{value}' has more than 59 minutes"))
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("offset '{value}' is out of range"))
}

pub(crate) fn parse_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value.trim().parse().map_err(|error| format!("rate '{value}': {error}"))?;

    if !(0.0..=1.0).contains(&rate) {
        return Err(format!("rate '{value}' must be between 0 and 1"))
    }

    Ok(rate)
}
