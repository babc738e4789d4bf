mod currency;
mod errors;

pub use currency::Currency;
pub use errors::CurrencyError;

pub type TransactionId = String;
