use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::TransactionStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub success: usize,
    pub pending: usize,
    pub failed: usize
}

impl StatusCounts {
    pub(crate) fn record(&mut self, status: &TransactionStatus) {
        match status {
            TransactionStatus::Success => self.success += 1,
            TransactionStatus::Pending => self.pending += 1,
            TransactionStatus::Failed => self.failed += 1,
            TransactionStatus::Unrecognized(_) => {}
        }
    }
}

/// Summed amount for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeBucket {
    pub date: NaiveDate,
    pub volume: Decimal
}

/// Statistics derived from a set of valid transactions.
///
/// Rates are percentages in `[0, 100]` and are zero for an empty set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub count: usize,
    pub total_volume: Decimal,
    /// Volume of transactions with `success` status only.
    pub successful_volume: Decimal,
    pub success_rate: Decimal,
    pub failure_rate: Decimal,
    pub average_amount: Decimal,
    pub status_counts: StatusCounts,
    /// Per-day volume, ascending by date.
    pub series: Vec<VolumeBucket>
}

impl AggregateSummary {
    /// Recomputes the derived ratios from `count`, `status_counts` and `total_volume`.
    pub(crate) fn refresh_rates(&mut self) {
        let count = Decimal::from(self.count);

        self.success_rate = percentage(Decimal::from(self.status_counts.success), count);
        self.failure_rate = percentage(Decimal::from(self.status_counts.failed), count);
        self.average_amount = if count.is_zero() { Decimal::ZERO } else { self.total_volume / count };
    }

    /// Growth of this period against `previous`, in percent.
    pub fn growth_over(&self, previous: &AggregateSummary) -> PeriodComparison {
        PeriodComparison {
            volume_growth: growth(self.total_volume, previous.total_volume),
            count_growth: growth(Decimal::from(self.count), Decimal::from(previous.count))
        }
    }
}

/// Period-over-period change. `None` when the previous period is zero or the
/// change does not fit in a `Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodComparison {
    pub volume_growth: Option<Decimal>,
    pub count_growth: Option<Decimal>
}

fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO
    }

    part * Decimal::ONE_HUNDRED / whole
}

fn growth(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None
    }

    let change = current.checked_sub(previous)?;

    //NOTE: Scaling first keeps full precision; dividing first only overflows when the
    //      percentage itself is out of range.
    change.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(previous))
        .or_else(|| change.checked_div(previous)?.checked_mul(Decimal::ONE_HUNDRED))
}
