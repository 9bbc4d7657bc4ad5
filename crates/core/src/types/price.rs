//! Type-safe price representation using decimal arithmetic.
//!
//! Formatting follows the `en-US` currency style used across the storefront:
//! known currencies get their narrow symbol, unknown ISO codes are written out
//! followed by a no-break space, amounts are grouped by thousands and rounded
//! half away from zero to the currency's minor units.
//!
//! ```rust
//! use eecol_core::format_currency;
//! use rust_decimal::Decimal;
//!
//! assert_eq!(format_currency(Decimal::new(195, 1), "USD").unwrap(), "$19.50");
//! assert_eq!(format_currency(Decimal::ZERO, "USD").unwrap(), "$0.00");
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing a currency code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    #[error("Invalid currency code: {0:?}")]
    InvalidCode(String),
}

/// ISO 4217 currency code, stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse and normalise a three letter code.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::InvalidCode` unless `code` is exactly three
    /// ASCII letters.
    pub fn parse(code: &str) -> Result<Self, CurrencyError> {
        let trimmed = code.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(CurrencyError::InvalidCode(code.to_string()))
        }
    }

    /// The code itself (e.g. `CAD`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display prefix in `en-US`.
    #[must_use]
    pub fn prefix(&self) -> String {
        match self.0.as_str() {
            "USD" => "$".to_string(),
            "CAD" => "CA$".to_string(),
            "AUD" => "A$".to_string(),
            "MXN" => "MX$".to_string(),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            "JPY" => "¥".to_string(),
            "CNY" => "CN¥".to_string(),
            "INR" => "₹".to_string(),
            other => format!("{other}\u{a0}"),
        }
    }

    /// Number of fraction digits shown.
    #[must_use]
    pub fn minor_units(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "KRW" | "CLP" | "ISK" | "VND" => 0,
            "BHD" | "KWD" | "OMR" | "JOD" | "TND" => 3,
            _ => 2,
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A price with currency information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        let digits = self.currency_code.minor_units();
        let rounded = self
            .amount
            .round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let plain = format!("{:.*}", digits as usize, rounded.abs());
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), ""));

        let mut out = String::with_capacity(plain.len() + 8);
        out.push_str(sign);
        out.push_str(&self.currency_code.prefix());
        out.push_str(&group_thousands(int_part));
        if !frac_part.is_empty() {
            out.push('.');
            out.push_str(frac_part);
        }
        out
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Format `amount` in `currency` the way product tiles and the cart show it.
///
/// # Errors
///
/// Returns `CurrencyError::InvalidCode` when `currency` is not an ISO code.
pub fn format_currency(amount: Decimal, currency: &str) -> Result<String, CurrencyError> {
    let code = CurrencyCode::parse(currency)?;
    Ok(Price::new(amount, code).display())
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fmt(amount: &str, currency: &str) -> String {
        format_currency(amount.parse().unwrap(), currency).unwrap()
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(fmt("19.5", "USD"), "$19.50");
        assert_eq!(fmt("0", "USD"), "$0.00");
        assert_eq!(fmt("1234567.891", "USD"), "$1,234,567.89");
    }

    #[test]
    fn test_format_rounds_half_away_from_zero() {
        assert_eq!(fmt("2.345", "USD"), "$2.35");
        assert_eq!(fmt("-2.345", "USD"), "-$2.35");
    }

    #[test]
    fn test_format_negative_rounding_to_zero_has_no_sign() {
        assert_eq!(fmt("-0.001", "USD"), "$0.00");
    }

    #[test]
    fn test_format_other_currencies() {
        assert_eq!(fmt("12", "cad"), "CA$12.00");
        assert_eq!(fmt("1500.4", "JPY"), "¥1,500");
        assert_eq!(fmt("3.5", "CHF"), "CHF\u{a0}3.50");
    }

    #[test]
    fn test_format_invalid_currency() {
        let err = format_currency(Decimal::ONE, "dollars").unwrap_err();
        assert_eq!(err, CurrencyError::InvalidCode("dollars".to_string()));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("123456"), "123,456");
    }

    #[test]
    fn test_price_deserializes_code() {
        let price: Price = serde_json::from_str(r#"{"amount":"4.20","currency_code":"usd"}"#).unwrap();
        assert_eq!(price.currency_code.as_str(), "USD");
        assert_eq!(price.to_string(), "$4.20");
    }
}
