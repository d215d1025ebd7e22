use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const MAX_SYMBOL_LEN: usize = 32;

/// Validated provider symbol, e.g. `BTCUSDT`.
///
/// Symbols are uppercased on parse since the provider is case-sensitive
/// and only documents uppercase pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if trimmed.len() > MAX_SYMBOL_LEN {
            return Err(ConfigError::SymbolTooLong {
                len: trimmed.len(),
                max: MAX_SYMBOL_LEN,
            });
        }
        for (index, ch) in trimmed.chars().enumerate() {
            if !ch.is_ascii_alphanumeric() {
                return Err(ConfigError::SymbolInvalidChar { ch, index });
            }
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
