use chrono::{Datelike, Days, NaiveDate};
use std::str::FromStr;

use crate::models::errors::CriteriaParseError;
use crate::models::TransactionStatus;

/// Status predicate of a query. `All` disables the predicate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TransactionStatus)
}

impl StatusFilter {
    pub fn matches(&self, status: &TransactionStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => expected == status
        }
    }
}

impl FromStr for StatusFilter {
    type Err = CriteriaParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "all" | "" => Ok(StatusFilter::All),
            "success" => Ok(StatusFilter::Only(TransactionStatus::Success)),
            "pending" => Ok(StatusFilter::Only(TransactionStatus::Pending)),
            "failed" => Ok(StatusFilter::Only(TransactionStatus::Failed)),
            _ => Err(CriteriaParseError::UnknownStatus(value.to_string()))
        }
    }
}

/// Inclusive calendar date range. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start: Some(start), end: Some(end) }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Returns both bounds when the start lies after the end.
    pub fn inverted_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => Some((start, end)),
            _ => None
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (None, None) => true,
            (Some(start), None) => date >= start,
            (None, Some(end)) => date <= end,
            (Some(start), Some(end)) => date >= start && date <= end
        }
    }

    /// The equally long range ending the day before this one starts.
    ///
    /// Only defined for ranges bounded on both sides and not inverted.
    pub fn previous_period(&self) -> Option<DateRange> {
        let (start, end) = (self.start?, self.end?);

        if start > end {
            return None
        }

        let length = (end - start).num_days() as u64 + 1;
        let previous_end = start.checked_sub_days(Days::new(1))?;
        let previous_start = start.checked_sub_days(Days::new(length))?;

        Some(DateRange::between(previous_start, previous_end))
    }
}

/// Dashboard time range presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Today,
    Last7Days,
    Last30Days,
    Last90Days,
    ThisMonth,
    All
}

impl TimeRange {
    /// Resolves the preset into concrete dates relative to `today`.
    ///
    /// The "last N days" presets include `today` itself.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        match self {
            TimeRange::Today => DateRange::between(today, today),
            TimeRange::Last7Days => trailing_days(today, 7),
            TimeRange::Last30Days => trailing_days(today, 30),
            TimeRange::Last90Days => trailing_days(today, 90),
            TimeRange::ThisMonth => DateRange::between(today.with_day(1).unwrap_or(today), today),
            TimeRange::All => DateRange::default()
        }
    }
}

fn trailing_days(today: NaiveDate, days: u64) -> DateRange {
    let start = today.checked_sub_days(Days::new(days - 1)).unwrap_or(NaiveDate::MIN);
    DateRange::between(start, today)
}

impl FromStr for TimeRange {
    type Err = CriteriaParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "today" => Ok(TimeRange::Today),
            "7d" => Ok(TimeRange::Last7Days),
            "30d" => Ok(TimeRange::Last30Days),
            "90d" => Ok(TimeRange::Last90Days),
            "month" => Ok(TimeRange::ThisMonth),
            "all" => Ok(TimeRange::All),
            _ => Err(CriteriaParseError::UnknownTimeRange(value.to_string()))
        }
    }
}

/// Caller-owned query over a transaction collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub status: StatusFilter,
    pub date_range: DateRange,
    /// Free-text term matched against client name and bank account.
    pub term: String
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria carrying only a free-text term.
    pub fn search(term: impl Into<String>) -> Self {
        Self::new().with_term(term)
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Trimmed, lowercased term, or `None` when the term matches everything.
    pub fn normalized_term(&self) -> Option<String> {
        let term = self.term.trim();

        if term.is_empty() {
            return None
        }

        Some(term.to_lowercase())
    }
}
