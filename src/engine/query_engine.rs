use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{
    AggregateSummary, DataQualityIssue, FilterCriteria, QueryWarning, Transaction, TransactionStatus, VolumeBucket
};

/// Caller-owned engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Offset used to truncate timestamps into calendar dates. Never the host zone.
    pub reference_offset: FixedOffset
}

impl EngineConfig {
    pub fn new(reference_offset: FixedOffset) -> Self {
        Self { reference_offset }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { reference_offset: Utc.fix() }
    }
}

/// Output of [`TransactionQueryEngine::filter`].
#[derive(Debug, Clone, Default)]
pub struct Filtered<'a> {
    /// Matching transactions in their original order.
    pub transactions: Vec<&'a Transaction>,
    pub warnings: Vec<QueryWarning>
}

impl Filtered<'_> {
    pub fn cloned(&self) -> Vec<Transaction> {
        self.transactions.iter().map(|tx| (*tx).clone()).collect()
    }
}

/// Output of [`TransactionQueryEngine::aggregate`].
#[derive(Debug, Clone, Default)]
pub struct Aggregated {
    pub summary: AggregateSummary,
    /// Records excluded from the summary.
    pub issues: Vec<DataQualityIssue>
}

/// Filtered transactions together with their summary.
#[derive(Debug, Clone, Default)]
pub struct QueryResult<'a> {
    pub transactions: Vec<&'a Transaction>,
    pub summary: AggregateSummary,
    pub warnings: Vec<QueryWarning>
}

/// Stateless query and aggregation over in-memory transactions.
///
/// Every operation is a pure function of its inputs and the engine configuration.
/// Nothing here fails: inconsistent criteria and malformed records are returned
/// as warnings next to the result.
#[derive(Debug, Clone, Default)]
pub struct TransactionQueryEngine {
    config: EngineConfig
}

impl TransactionQueryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Applies status, date range and free-text predicates, in that order.
    ///
    /// An inverted date range yields no transactions and a single
    /// `QueryWarning::InvalidCriteria`. When a date bound is present, records whose
    /// timestamp cannot be parsed are dropped and reported.
    pub fn filter<'a, I>(&self, transactions: I, criteria: &FilterCriteria) -> Filtered<'a>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        if let Some((start, end)) = criteria.date_range.inverted_bounds() {
            let warning = QueryWarning::InvalidCriteria { start, end };
            warn!("{warning}");

            return Filtered { transactions: Vec::new(), warnings: vec![warning] }
        }

        let term = criteria.normalized_term();
        let check_dates = !criteria.date_range.is_unbounded();
        let mut filtered = Filtered::default();
        let mut scanned = 0usize;

        for tx in transactions {
            scanned += 1;

            if !criteria.status.matches(&tx.status) {
                continue;
            }

            if check_dates {
                match tx.date_in(&self.config.reference_offset) {
                    Some(date) if criteria.date_range.contains(date) => {}
                    Some(_) => continue,
                    None => {
                        let issue = DataQualityIssue::malformed_timestamp(tx);
                        warn!("{issue}");
                        filtered.warnings.push(issue.into());
                        continue;
                    }
                }
            }

            if let Some(needle) = &term {
                if !tx.matches_term(needle) {
                    continue;
                }
            }

            filtered.transactions.push(tx);
        }

        debug!("Filter matched [{}] of [{}] transactions", filtered.transactions.len(), scanned);

        filtered
    }

    /// Free-text search across client name and bank account.
    pub fn search<'a, I>(&self, transactions: I, term: &str) -> Filtered<'a>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        self.filter(transactions, &FilterCriteria::search(term))
    }

    /// Summarizes the given transactions.
    ///
    /// Records with an unrecognized status, an empty client name, a negative amount
    /// or an unparseable timestamp are excluded and reported; the rest are still
    /// summarized.
    pub fn aggregate<'a, I>(&self, transactions: I) -> Aggregated
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut aggregated = Aggregated::default();
        let mut buckets = BTreeMap::<NaiveDate, Decimal>::new();

        for tx in transactions {
            let date = match self.inspect(tx) {
                Ok(date) => date,
                Err(issue) => {
                    warn!("{issue}");
                    aggregated.issues.push(issue);
                    continue;
                }
            };

            let summary = &mut aggregated.summary;

            //NOTE: Every partial sum (successful volume, day buckets) is bounded by the total,
            //      so checking the total is enough to keep all of them in range.
            let Some(total_volume) = summary.total_volume.checked_add(tx.amount) else {
                let issue = DataQualityIssue::volume_overflow(tx);
                warn!("{issue}");
                aggregated.issues.push(issue);
                continue;
            };

            summary.total_volume = total_volume;

            if tx.status == TransactionStatus::Success {
                summary.successful_volume += tx.amount;
            }

            *buckets.entry(date).or_insert(Decimal::ZERO) += tx.amount;
            summary.status_counts.record(&tx.status);
            summary.count += 1;
        }

        let summary = &mut aggregated.summary;
        summary.refresh_rates();
        summary.series = buckets.into_iter()
            .map(|(date, volume)| VolumeBucket { date, volume })
            .collect();

        debug!(
            "Aggregated [{}] transactions into [{}] daily buckets, [{}] excluded",
            summary.count, summary.series.len(), aggregated.issues.len()
        );

        aggregated
    }

    /// Filters, then summarizes the matching transactions.
    pub fn query<'a, I>(&self, transactions: I, criteria: &FilterCriteria) -> QueryResult<'a>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let Filtered { transactions, mut warnings } = self.filter(transactions, criteria);
        let Aggregated { summary, issues } = self.aggregate(transactions.iter().copied());

        warnings.extend(issues.into_iter().map(QueryWarning::from));

        QueryResult { transactions, summary, warnings }
    }

    fn inspect(&self, tx: &Transaction) -> Result<NaiveDate, DataQualityIssue> {
        if !tx.status.is_recognized() {
            return Err(DataQualityIssue::unrecognized_status(tx))
        }

        if tx.client_name.trim().is_empty() {
            return Err(DataQualityIssue::missing_client_name(tx))
        }

        if tx.amount < Decimal::ZERO {
            return Err(DataQualityIssue::negative_amount(tx))
        }

        tx.date_in(&self.config.reference_offset)
            .ok_or_else(|| DataQualityIssue::malformed_timestamp(tx))
    }
}
