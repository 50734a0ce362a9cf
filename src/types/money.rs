//! Monetary Conversion
//!
//! Amounts cross the API boundary as decimal currency values and are
//! held everywhere else as integer cents.

use thiserror::Error;

/// Cents per currency unit
pub const CENTS_PER_UNIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoneyError {
    #[error("amount must be >= 0, got {0}")]
    Negative(f64),

    #[error("amount must be a finite number")]
    NotFinite,

    #[error("amount is not a number: {0:?}")]
    NotNumeric(String),

    #[error("amount is too large: {0}")]
    Overflow(f64),
}

/// Convert a decimal amount to cents, rounding at the hundredths boundary.
pub fn amount_to_cents(amount: f64) -> Result<i64, MoneyError> {
    if !amount.is_finite() {
        return Err(MoneyError::NotFinite);
    }

    let cents = (amount * CENTS_PER_UNIT as f64).round();

    // -0.001 rounds to -0.0, which is a zero amount rather than a negative one
    if cents < 0.0 {
        return Err(MoneyError::Negative(amount));
    }
    if cents >= i64::MAX as f64 {
        return Err(MoneyError::Overflow(amount));
    }

    Ok(cents as i64)
}

/// Convert cents back to the externally visible decimal amount
pub fn cents_to_amount(cents: i64) -> f64 {
    cents as f64 / CENTS_PER_UNIT as f64
}

/// Parse a decimal amount from form text (e.g. "1234.56")
pub fn parse_amount(s: &str) -> Result<f64, MoneyError> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| MoneyError::NotNumeric(s.to_string()))
}

/// Parse form text straight to cents
pub fn parse_cents(s: &str) -> Result<i64, MoneyError> {
    amount_to_cents(parse_amount(s)?)
}
