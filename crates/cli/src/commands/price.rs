//! Price formatting.

use eecol_core::{CurrencyError, format_currency, text::parse_number};
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while formatting a price.
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("Not a number: {0}")]
    NotANumber(String),

    #[error("Amount out of range: {0}")]
    OutOfRange(f64),

    #[error(transparent)]
    Currency(#[from] CurrencyError),
}

/// Format `amount` (any numeric text) in `currency`.
///
/// # Errors
///
/// Returns an error if the amount is not numeric or the currency code is
/// invalid.
pub fn format_amount(amount: &str, currency: &str) -> Result<String, PriceError> {
    let number = parse_number(amount).ok_or_else(|| PriceError::NotANumber(amount.to_string()))?;
    let decimal = Decimal::try_from(number).map_err(|_| PriceError::OutOfRange(number))?;
    Ok(format_currency(decimal, currency)?)
}

/// Format a JSON price value, either a number or numeric text.
///
/// # Errors
///
/// See [`format_amount`].
pub fn format_value(value: &Value, currency: &str) -> Result<String, PriceError> {
    match value {
        Value::Number(n) => format_amount(&n.to_string(), currency),
        Value::String(s) => format_amount(s, currency),
        other => Err(PriceError::NotANumber(other.to_string())),
    }
}

/// Print a formatted amount.
///
/// # Errors
///
/// See [`format_amount`].
#[allow(clippy::print_stdout)]
pub fn print(amount: &str, currency: &str) -> Result<(), PriceError> {
    println!("{}", format_amount(amount, currency)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("19.5", "USD").unwrap(), "$19.50");
        assert_eq!(format_amount("", "USD").unwrap(), "$0.00");
        assert_eq!(format_amount(" 1234.5 ", "CAD").unwrap(), "CA$1,234.50");
    }

    #[test]
    fn test_format_amount_errors() {
        assert!(matches!(
            format_amount("abc", "USD"),
            Err(PriceError::NotANumber(_))
        ));
        assert!(matches!(
            format_amount("1", "US"),
            Err(PriceError::Currency(_))
        ));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(42.1), "USD").unwrap(), "$42.10");
        assert_eq!(format_value(&json!("7"), "EUR").unwrap(), "€7.00");
        assert!(format_value(&json!(null), "USD").is_err());
    }
}
