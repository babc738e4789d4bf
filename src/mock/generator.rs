use chrono::{Duration, NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing::{error, warn};

use crate::models::{Transaction, TransactionDraft, TransactionStatus};

const PROBABILITY_SUCCESS: f64 = 0.85;
const PROBABILITY_PENDING: f64 = 0.08;

const MIN_AMOUNT_PAISE: i64 = 10_000;
const MAX_AMOUNT_PAISE: i64 = 50_000_000;
const SECONDS_PER_DAY: i64 = 86_400;

const CLIENTS: [&str; 10] = [
    "TechCorp India Ltd",
    "Sharma Traders",
    "Green Valley Foods",
    "Kapoor Textiles",
    "Fintech Solutions Pvt Ltd",
    "Mehta Electronics",
    "Sunrise Pharma",
    "Patel Logistics",
    "Bluewave Retail",
    "Reddy Constructions"
];

const BANKS: [&str; 6] = [
    "HDFC Bank",
    "ICICI Bank",
    "SBI",
    "Axis Bank",
    "Kotak Mahindra Bank",
    "Yes Bank"
];

pub struct MockConfig {
    /// Number of records to produce.
    pub count: usize,
    /// First day of the generated window.
    pub start: NaiveDate,
    /// Length of the window in days.
    pub days: u32,
    /// Share of records deliberately corrupted, in `[0, 1]`.
    pub malformed_rate: f64
}

/// Seeded source of dashboard mock transactions. The same seed and config always
/// produce the same records.
pub struct MockGenerator {
    rng: StdRng,
    next_id: u64
}

impl MockGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_id: 1
        }
    }

    /// Generates `config.count` transactions ordered by timestamp.
    pub fn generate(&mut self, config: &MockConfig) -> Vec<Transaction> {
        let malformed_rate = if (0.0..=1.0).contains(&config.malformed_rate) {
            config.malformed_rate
        } else {
            warn!("Malformed rate [{}] is outside [0, 1], generating clean records", config.malformed_rate);
            0.0
        };

        let window = SECONDS_PER_DAY * i64::from(config.days.max(1));
        let mut offsets: Vec<i64> = (0..config.count).map(|_| self.rng.gen_range(0..window)).collect();
        offsets.sort_unstable();

        let midnight = config.start.and_time(NaiveTime::MIN);
        let mut transactions = Vec::with_capacity(config.count);

        for offset in offsets {
            let Some(created_at) = Duration::try_seconds(offset)
                .and_then(|delta| midnight.checked_add_signed(delta))
                .map(|instant| instant.and_utc()) else {
                warn!("Offset [{offset}s] from [{}] is outside the supported date range, skipping record", config.start);
                continue;
            };

            let transaction_id = format!("TXN{:06}", self.next_id);
            self.next_id += 1;

            match self.next_draft().validate(transaction_id, created_at) {
                Ok(transaction) if self.rng.gen_bool(malformed_rate) => transactions.push(self.corrupt(transaction)),
                Ok(transaction) => transactions.push(transaction),
                Err(error) => error!("Generated draft was rejected: {error}")
            }
        }

        transactions
    }

    fn next_draft(&mut self) -> TransactionDraft {
        let client_name = CLIENTS.choose(&mut self.rng).copied().unwrap_or(CLIENTS[0]);
        let bank = BANKS.choose(&mut self.rng).copied().unwrap_or(BANKS[0]);
        let account_suffix: u16 = self.rng.gen_range(0..10_000);
        let amount = Decimal::new(self.rng.gen_range(MIN_AMOUNT_PAISE..MAX_AMOUNT_PAISE), 2);

        let roll: f64 = self.rng.r#gen();
        let status = if roll < PROBABILITY_SUCCESS {
            TransactionStatus::Success
        } else if roll < PROBABILITY_SUCCESS + PROBABILITY_PENDING {
            TransactionStatus::Pending
        } else {
            TransactionStatus::Failed
        };

        TransactionDraft {
            client_name: client_name.to_string(),
            bank_account: format!("{bank} ****{account_suffix:04}"),
            amount: amount.to_string(),
            currency: None,
            status: Some(status.to_string())
        }
    }

    fn corrupt(&mut self, mut transaction: Transaction) -> Transaction {
        match self.rng.gen_range(0..3) {
            0 => transaction.timestamp = "not-a-date".to_string(),
            1 => transaction.amount = -transaction.amount,
            _ => transaction.status = TransactionStatus::Unrecognized("refunded".to_string())
        }

        transaction
    }
}
