use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    #[error("Currency error: code is an empty string")]
    Empty,
    #[error("Currency error: code [{0}] must be exactly three letters")]
    InvalidLength(String),
    #[error("Currency error: code [{0}] contains non-alphabetic characters")]
    InvalidCharacters(String)
}
