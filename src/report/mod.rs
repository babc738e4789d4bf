
use std::io::Write;

use anyhow::Result;
use csv::WriterBuilder;
use rust_decimal::Decimal;

use crate::models::{AggregateSummary, PeriodComparison, Transaction};

const TRANSACTION_HEADER: [&str; 7] = ["id", "amount", "currency", "status", "timestamp", "client", "bank_account"];
const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Writes transactions as CSV in the same layout the ingest side reads.
///
/// The header is always written, even for an empty result.
pub fn write_transactions<'a, W, I>(writer: W, transactions: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut output = WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    output.write_record(TRANSACTION_HEADER)?;

    for transaction in transactions {
        output.serialize(transaction)?;
    }

    output.flush()?;

    Ok(())
}

/// Writes the summary as `metric,value` rows followed by the `date,volume` series.
pub fn write_summary<W: Write>(mut output: W, summary: &AggregateSummary, comparison: Option<&PeriodComparison>) -> Result<()> {
    writeln!(output, "metric,value")?;
    writeln!(output, "count,{}", summary.count)?;
    writeln!(output, "total_volume,{}", summary.total_volume)?;
    writeln!(output, "successful_volume,{}", summary.successful_volume)?;
    writeln!(output, "success_rate,{}", rounded(summary.success_rate))?;
    writeln!(output, "failure_rate,{}", rounded(summary.failure_rate))?;
    writeln!(output, "average_amount,{}", rounded(summary.average_amount))?;
    writeln!(output, "success_count,{}", summary.status_counts.success)?;
    writeln!(output, "pending_count,{}", summary.status_counts.pending)?;
    writeln!(output, "failed_count,{}", summary.status_counts.failed)?;

    if let Some(comparison) = comparison {
        writeln!(output, "volume_growth,{}", optional(comparison.volume_growth))?;
        writeln!(output, "count_growth,{}", optional(comparison.count_growth))?;
    }

    writeln!(output)?;
    writeln!(output, "date,volume")?;

    for bucket in &summary.series {
        writeln!(output, "{},{}", bucket.date, bucket.volume)?;
    }

    output.flush()?;

    Ok(())
}

fn rounded(value: Decimal) -> Decimal {
    value.round_dp(DISPLAY_DECIMAL_PLACES)
}

fn optional(value: Option<Decimal>) -> String {
    value.map(|value| rounded(value).to_string()).unwrap_or_else(|| "n/a".to_string())
}
