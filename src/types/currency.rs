use crate::types::errors::CurrencyError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const CODE_LENGTH: usize = 3;

/// An ISO 4217 alphabetic currency code such as `INR` or `USD`.
///
/// Codes are normalized to uppercase on parse; the bytes are stored inline so the
/// type stays `Copy`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Currency([u8; CODE_LENGTH]);

impl Currency {
    pub const INR: Currency = Currency(*b"INR");

    pub fn as_str(&self) -> &str {
        //NOTE: Construction only ever admits ASCII letters so this cannot fail
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::INR
    }
}

impl Display for Currency {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(CurrencyError::Empty)
        }

        if value.len() != CODE_LENGTH {
            return Err(CurrencyError::InvalidLength(value.to_string()))
        }

        if !value.bytes().all(|byte| byte.is_ascii_alphabetic()) {
            return Err(CurrencyError::InvalidCharacters(value.to_string()))
        }

        let mut code = [0u8; CODE_LENGTH];

        for (slot, byte) in code.iter_mut().zip(value.bytes()) {
            *slot = byte.to_ascii_uppercase();
        }

        Ok(Currency(code))
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Currency::from_str(&value).map_err(de::Error::custom)
    }
}

impl Serialize for Currency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
