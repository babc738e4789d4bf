use super::{EngineConfig, TransactionQueryEngine};

use std::str::FromStr;

use anyhow::Result;
use chrono::{FixedOffset, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{
    DateRange, FilterCriteria, IssueReason, QueryWarning, StatusFilter, Transaction, TransactionStatus, VolumeBucket
};
use crate::types::Currency;

fn create_transaction(transaction_id: &str, amount: &str, status: &str, timestamp: &str, client_name: &str, bank_account: &str) -> Result<Transaction> {
    Ok(Transaction {
        transaction_id: transaction_id.to_string(),
        amount: Decimal::from_str(amount)?,
        currency: Currency::INR,
        status: TransactionStatus::from(status),
        timestamp: timestamp.to_string(),
        client_name: client_name.to_string(),
        bank_account: bank_account.to_string()
    })
}

fn date(value: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::from_str(value)?)
}

fn sample_transactions() -> Result<Vec<Transaction>> {
    Ok(vec![
        create_transaction("TXN001", "1500.00", "success", "2024-03-01T09:30:00Z", "TechCorp India Ltd", "HDFC Bank ****4521")?,
        create_transaction("TXN002", "250.50", "failed", "2024-03-01T14:05:00Z", "Sharma Traders", "ICICI Bank ****8834")?,
        create_transaction("TXN003", "9800.00", "pending", "2024-03-02T11:00:00Z", "Green Valley Foods", "SBI ****1290")?,
        create_transaction("TXN004", "420.00", "success", "2024-03-03T18:45:00Z", "Kapoor Textiles", "HDFC Bank ****7712")?,
        create_transaction("TXN005", "75.25", "success", "2024-03-04T08:00:00Z", "Fintech Solutions Pvt Ltd", "Axis Bank ****3300")?,
    ])
}

fn ids(transactions: &[&Transaction]) -> Vec<String> {
    transactions.iter().map(|tx| tx.transaction_id.clone()).collect()
}

#[test]
fn test_filter_with_default_criteria_returns_everything_in_order() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let transactions = sample_transactions()?;

    let filtered = engine.filter(&transactions, &FilterCriteria::new());

    assert_eq!(filtered.cloned(), transactions);
    assert!(filtered.warnings.is_empty());

    Ok(())
}

#[test]
fn test_filter_by_status_keeps_only_matching_records() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let transactions = sample_transactions()?;
    let criteria = FilterCriteria::new().with_status(StatusFilter::Only(TransactionStatus::Success));

    let filtered = engine.filter(&transactions, &criteria);

    assert_eq!(ids(&filtered.transactions), vec!["TXN001", "TXN004", "TXN005"]);

    Ok(())
}

#[test]
fn test_filter_by_date_range_is_inclusive_on_both_bounds() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let transactions = sample_transactions()?;
    let criteria = FilterCriteria::new().with_date_range(DateRange::between(date("2024-03-02")?, date("2024-03-03")?));

    let filtered = engine.filter(&transactions, &criteria);

    assert_eq!(ids(&filtered.transactions), vec!["TXN003", "TXN004"]);

    Ok(())
}

#[test]
fn test_filter_with_single_bound_is_open_ended() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let transactions = sample_transactions()?;

    let from_only = FilterCriteria::new().with_date_range(DateRange::new(Some(date("2024-03-03")?), None));
    let until_only = FilterCriteria::new().with_date_range(DateRange::new(None, Some(date("2024-03-01")?)));

    assert_eq!(ids(&engine.filter(&transactions, &from_only).transactions), vec!["TXN004", "TXN005"]);
    assert_eq!(ids(&engine.filter(&transactions, &until_only).transactions), vec!["TXN001", "TXN002"]);

    Ok(())
}

#[test]
fn test_filter_with_inverted_date_range_returns_nothing_and_one_warning() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let transactions = sample_transactions()?;
    let criteria = FilterCriteria::new().with_date_range(DateRange::between(date("2024-03-02")?, date("2024-03-01")?));

    let filtered = engine.filter(&transactions, &criteria);

    assert!(filtered.transactions.is_empty());
    assert_eq!(filtered.warnings, vec![QueryWarning::InvalidCriteria {
        start: date("2024-03-02")?,
        end: date("2024-03-01")?
    }]);

    Ok(())
}

#[test]
fn test_filter_excludes_and_reports_malformed_timestamps_when_dates_are_checked() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let mut transactions = sample_transactions()?;
    transactions.push(create_transaction("TXN006", "10.00", "success", "yesterday", "TechCorp India Ltd", "HDFC Bank ****4521")?);

    let criteria = FilterCriteria::new().with_date_range(DateRange::new(Some(date("2024-03-01")?), None));
    let filtered = engine.filter(&transactions, &criteria);

    assert_eq!(filtered.transactions.len(), 5);
    assert!(matches!(
        &filtered.warnings[..],
        [QueryWarning::DataQuality(issue)] if issue.transaction_id == "TXN006"
            && matches!(issue.reason, IssueReason::MalformedTimestamp(_))
    ));

    let unbounded = engine.filter(&transactions, &FilterCriteria::new());

    assert_eq!(unbounded.transactions.len(), 6);
    assert!(unbounded.warnings.is_empty());

    Ok(())
}

#[test]
fn test_search_is_case_insensitive_across_client_and_bank_account() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let transactions = sample_transactions()?;

    assert_eq!(ids(&engine.search(&transactions, "tech").transactions), vec!["TXN001", "TXN005"]);
    assert_eq!(ids(&engine.search(&transactions, "  HDFC ").transactions), vec!["TXN001", "TXN004"]);
    assert_eq!(ids(&engine.search(&transactions, "****1290").transactions), vec!["TXN003"]);
    assert!(engine.search(&transactions, "paytm").transactions.is_empty());

    Ok(())
}

#[test]
fn test_search_with_blank_term_matches_everything() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let transactions = sample_transactions()?;

    assert_eq!(engine.search(&transactions, "").transactions.len(), transactions.len());
    assert_eq!(engine.search(&transactions, "   ").transactions.len(), transactions.len());

    Ok(())
}

#[test]
fn test_filter_is_idempotent_and_never_fabricates_records() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let transactions = sample_transactions()?;
    let criteria = FilterCriteria::new()
        .with_status(StatusFilter::Only(TransactionStatus::Success))
        .with_date_range(DateRange::new(Some(date("2024-03-01")?), Some(date("2024-03-03")?)))
        .with_term("hdfc");

    let once = engine.filter(&transactions, &criteria);
    let twice = engine.filter(once.transactions.iter().copied(), &criteria);

    assert_eq!(twice.cloned(), once.cloned());
    assert!(once.transactions.iter().all(|tx| transactions.contains(tx)));
    assert_eq!(ids(&once.transactions), vec!["TXN001", "TXN004"]);

    Ok(())
}

#[test]
fn test_aggregate_of_empty_set_is_all_zero() {
    let engine = TransactionQueryEngine::default();
    let aggregated = engine.aggregate(&Vec::<Transaction>::new());

    assert_eq!(aggregated.summary.count, 0);
    assert!(aggregated.summary.total_volume.is_zero());
    assert!(aggregated.summary.success_rate.is_zero());
    assert!(aggregated.summary.failure_rate.is_zero());
    assert!(aggregated.summary.average_amount.is_zero());
    assert!(aggregated.summary.series.is_empty());
    assert!(aggregated.issues.is_empty());
}

#[test]
fn test_aggregate_computes_volume_rates_and_daily_series() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let transactions = vec![
        create_transaction("A", "100", "success", "2024-03-01", "TechCorp India Ltd", "HDFC Bank ****4521")?,
        create_transaction("B", "200", "failed", "2024-03-02", "Sharma Traders", "ICICI Bank ****8834")?,
    ];

    let summary = engine.aggregate(&transactions).summary;

    assert_eq!(summary.total_volume, Decimal::from(300));
    assert_eq!(summary.success_rate, Decimal::from(50));
    assert_eq!(summary.failure_rate, Decimal::from(50));
    assert_eq!(summary.series, vec![
        VolumeBucket { date: date("2024-03-01")?, volume: Decimal::from(100) },
        VolumeBucket { date: date("2024-03-02")?, volume: Decimal::from(200) },
    ]);

    Ok(())
}

#[test]
fn test_aggregate_buckets_by_day_and_counts_each_status() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let transactions = sample_transactions()?;

    let summary = engine.aggregate(&transactions).summary;

    assert_eq!(summary.count, 5);
    assert_eq!(summary.total_volume, Decimal::from_str("12045.75")?);
    assert_eq!(summary.successful_volume, Decimal::from_str("1995.25")?);
    assert_eq!(summary.status_counts.success, 3);
    assert_eq!(summary.status_counts.pending, 1);
    assert_eq!(summary.status_counts.failed, 1);
    assert_eq!(summary.success_rate, Decimal::from(60));
    assert_eq!(summary.failure_rate, Decimal::from(20));
    assert_eq!(summary.average_amount, Decimal::from_str("2409.15")?);
    assert_eq!(summary.series.len(), 4);
    assert_eq!(summary.series[0].volume, Decimal::from_str("1750.50")?);

    Ok(())
}

#[test]
fn test_aggregate_truncates_dates_in_reference_offset() -> Result<()> {
    let transactions = vec![
        create_transaction("A", "100", "success", "2024-03-01T20:00:00Z", "TechCorp India Ltd", "HDFC Bank ****4521")?,
    ];

    let utc = TransactionQueryEngine::default().aggregate(&transactions).summary;
    let india = FixedOffset::east_opt(5 * 3600 + 30 * 60).ok_or_else(|| anyhow::anyhow!("invalid offset"))?;
    let ist = TransactionQueryEngine::new(EngineConfig::new(india)).aggregate(&transactions).summary;

    assert_eq!(utc.series[0].date, date("2024-03-01")?);
    assert_eq!(ist.series[0].date, date("2024-03-02")?);

    Ok(())
}

#[test]
fn test_aggregate_excludes_malformed_records_but_summarizes_the_rest() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let transactions = vec![
        create_transaction("GOOD", "100", "success", "2024-03-01T10:00:00Z", "TechCorp India Ltd", "HDFC Bank ****4521")?,
        create_transaction("BAD_DATE", "50", "success", "31/02/2024", "Sharma Traders", "ICICI Bank ****8834")?,
        create_transaction("BAD_AMOUNT", "-20", "failed", "2024-03-01T11:00:00Z", "Green Valley Foods", "SBI ****1290")?,
        create_transaction("BAD_STATUS", "30", "refunded", "2024-03-01T12:00:00Z", "Kapoor Textiles", "HDFC Bank ****7712")?,
    ];

    let aggregated = engine.aggregate(&transactions);

    assert_eq!(aggregated.summary.count, 1);
    assert_eq!(aggregated.summary.total_volume, Decimal::from(100));
    assert_eq!(aggregated.summary.success_rate, Decimal::from(100));

    let reasons: Vec<_> = aggregated.issues.iter()
        .map(|issue| (issue.transaction_id.as_str(), issue.reason.clone()))
        .collect();

    assert_eq!(reasons, vec![
        ("BAD_DATE", IssueReason::MalformedTimestamp("31/02/2024".to_string())),
        ("BAD_AMOUNT", IssueReason::NegativeAmount(Decimal::from(-20))),
        ("BAD_STATUS", IssueReason::UnrecognizedStatus("refunded".to_string())),
    ]);

    Ok(())
}

#[test]
fn test_aggregate_reports_overflowing_amounts() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let mut huge = create_transaction("HUGE", "0", "success", "2024-03-01", "TechCorp India Ltd", "HDFC Bank ****4521")?;
    huge.amount = Decimal::MAX;

    let mut second = huge.clone();
    second.transaction_id = "HUGE_AGAIN".to_string();

    let aggregated = engine.aggregate(&vec![huge, second]);

    assert_eq!(aggregated.summary.count, 1);
    assert_eq!(aggregated.summary.total_volume, Decimal::MAX);
    assert_eq!(aggregated.summary.average_amount, Decimal::MAX);
    assert_eq!(aggregated.summary.success_rate, Decimal::ONE_HUNDRED);
    assert!(matches!(aggregated.issues[0].reason, IssueReason::VolumeOverflow(_)));

    Ok(())
}

#[test]
fn test_aggregate_reports_records_without_client_name() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let mut transactions = sample_transactions()?;
    transactions.push(create_transaction("TXN006", "300.00", "success", "2024-03-02T10:00:00Z", "  ", "SBI ****1290")?);

    let aggregated = engine.aggregate(&transactions);

    assert_eq!(aggregated.summary.count, 5);
    assert_eq!(aggregated.summary.total_volume, Decimal::from_str("12045.75")?);
    assert_eq!(aggregated.issues.len(), 1);
    assert_eq!(aggregated.issues[0].transaction_id, "TXN006");
    assert_eq!(aggregated.issues[0].reason, IssueReason::MissingClientName);

    Ok(())
}

#[test]
fn test_aggregate_is_referentially_transparent() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let transactions = sample_transactions()?;

    assert_eq!(engine.aggregate(&transactions).summary, engine.aggregate(&transactions).summary);

    Ok(())
}

#[test]
fn test_query_combines_filter_and_aggregate_warnings() -> Result<()> {
    let engine = TransactionQueryEngine::default();
    let mut transactions = sample_transactions()?;
    transactions.push(create_transaction("TXN006", "99", "chargeback", "2024-03-02T10:00:00Z", "TechCorp India Ltd", "HDFC Bank ****4521")?);

    let result = engine.query(&transactions, &FilterCriteria::search("techcorp"));

    assert_eq!(ids(&result.transactions), vec!["TXN001", "TXN006"]);
    assert_eq!(result.summary.count, 1);
    assert_eq!(result.summary.total_volume, Decimal::from_str("1500.00")?);
    assert_eq!(result.warnings.len(), 1);

    Ok(())
}
