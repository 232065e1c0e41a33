//! Currency code value object.

use serde::{Deserialize, Serialize};

use shootflow_core::{DomainError, DomainResult, ValueObject};

/// 3-letter ISO 4217 currency code, stored uppercased.
///
/// No conversion or arithmetic lives here; amounts are integers in the
/// currency's minor unit and the code only travels alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Marketplace default currency.
    pub const DEFAULT_CODE: &'static str = "AUD";

    /// Parse and normalize a currency code.
    ///
    /// Accepts exactly three ASCII alphabetic characters (surrounding
    /// whitespace ignored) and uppercases them.
    pub fn parse(code: &str) -> DomainResult<Self> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::validation(format!(
                "currency must be a 3-letter ISO code, got '{code}'"
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(Self::DEFAULT_CODE.to_string())
    }
}

impl ValueObject for Currency {}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Currency {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}
