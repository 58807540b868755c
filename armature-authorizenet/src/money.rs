//! Money and currency types

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies accepted by Authorize.net merchant accounts (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
    CAD,
    EUR,
    GBP,
    AUD,
    NZD,
    CHF,
    DKK,
    NOK,
    PLN,
    SEK,
}

impl Currency {
    /// Get currency code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::CAD => "CAD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::AUD => "AUD",
            Self::NZD => "NZD",
            Self::CHF => "CHF",
            Self::DKK => "DKK",
            Self::NOK => "NOK",
            Self::PLN => "PLN",
            Self::SEK => "SEK",
        }
    }

    /// Decimal places of the minor unit
    pub fn decimals(&self) -> u32 {
        2
    }

    /// Parse from string
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Self::USD),
            "CAD" => Some(Self::CAD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            "AUD" => Some(Self::AUD),
            "NZD" => Some(Self::NZD),
            "CHF" => Some(Self::CHF),
            "DKK" => Some(Self::DKK),
            "NOK" => Some(Self::NOK),
            "PLN" => Some(Self::PLN),
            "SEK" => Some(Self::SEK),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Money amount with currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in smallest currency unit (cents)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Money {
    /// Create a new money amount from smallest unit
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create USD amount from cents
    pub fn usd(cents: i64) -> Self {
        Self::new(cents, Currency::USD)
    }

    /// Create from decimal amount (e.g., 25.00)
    ///
    /// Returns `None` when the amount does not fit the minor unit range.
    pub fn from_decimal(amount: Decimal, currency: Currency) -> Option<Self> {
        let scaled = amount
            .checked_mul(Decimal::from(10i64.pow(currency.decimals())))?
            .round();
        scaled.to_i64().map(|amount| Self { amount, currency })
    }

    /// Get amount as decimal
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.amount, self.currency.decimals())
    }

    /// Amount as the gateway expects it, e.g. `25.00`
    pub fn gateway_amount(&self) -> String {
        format!(
            "{:.prec$}",
            self.to_decimal(),
            prec = self.currency.decimals() as usize
        )
    }

    /// Check if strictly positive
    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.gateway_amount(), self.currency)
    }
}
