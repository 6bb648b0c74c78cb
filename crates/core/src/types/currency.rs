//! Display currencies and the fixed conversion rate table.
//!
//! All stored prices and totals are kept in the base currency (MDL). The
//! other currencies exist only as display projections: a price is multiplied
//! by the fixed rate when rendered, never when persisted.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A display currency supported by the storefront.
///
/// MDL is the base currency; everything else is a fixed-rate projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "MDL")]
    Mdl,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    /// Conversion rate from the base currency into this currency.
    ///
    /// The table is fixed: `{MDL: 1, USD: 0.056, EUR: 0.048}`.
    #[must_use]
    pub fn rate(&self) -> Decimal {
        match self {
            Self::Mdl => Decimal::ONE,
            Self::Usd => Decimal::new(56, 3),
            Self::Eur => Decimal::new(48, 3),
        }
    }

    /// Symbol used when rendering a price in this currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Mdl => "L",
            Self::Usd => "$",
            Self::Eur => "€",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Mdl => "MDL",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }

    /// Project a base-currency amount into this currency.
    #[must_use]
    pub fn convert(&self, base_amount: Decimal) -> Decimal {
        base_amount * self.rate()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unknown currency code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown currency code: {0}")]
pub struct CurrencyParseError(pub String);

impl FromStr for Currency {
    type Err = CurrencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MDL" => Ok(Self::Mdl),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            other => Err(CurrencyParseError(other.to_owned())),
        }
    }
}
