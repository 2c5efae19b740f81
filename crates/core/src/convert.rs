use thiserror::Error;

use crate::RateRecord;

/// Default number of decimal places for user-facing currency amounts.
pub const DECIMAL_PLACES: u32 = 2;

#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    #[error("invalid amount: {0}")]
    InvalidAmount(f64),
    #[error("invalid or unsupported currency: {0}")]
    InvalidCurrency(String),
    #[error("error during currency conversion calculation")]
    Calculation,
}

/// Round half away from zero, matching currency display conventions.
pub fn round_to_places(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Convert an amount between two currencies through the shared base of the
/// rate table. Both codes must be present in `rates`; the same-currency case
/// short-circuits to plain rounding so a rate is never divided by itself.
pub fn convert_amount(
    amount: f64,
    from_currency: &str,
    to_currency: &str,
    rates: &[RateRecord],
    decimal_places: Option<u32>,
) -> Result<f64, ConvertError> {
    if amount <= 0.0 || !amount.is_finite() {
        return Err(ConvertError::InvalidAmount(amount));
    }

    let from = from_currency.trim().to_ascii_uppercase();
    let to = to_currency.trim().to_ascii_uppercase();
    let places = decimal_places.unwrap_or(DECIMAL_PLACES);

    let from_rate = lookup(&from, rates).ok_or_else(|| ConvertError::InvalidCurrency(from.clone()))?;
    let to_rate = lookup(&to, rates).ok_or_else(|| ConvertError::InvalidCurrency(to.clone()))?;

    if from == to {
        return Ok(round_to_places(amount, places));
    }

    let converted = amount / from_rate * to_rate;
    if !converted.is_finite() {
        return Err(ConvertError::Calculation);
    }
    Ok(round_to_places(converted, places))
}

fn lookup(code: &str, rates: &[RateRecord]) -> Option<f64> {
    rates.iter().find(|rate| rate.code == code).map(|rate| rate.rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(code: &str, value: f64) -> RateRecord {
        RateRecord {
            code: code.to_string(),
            rate: value,
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    fn table() -> Vec<RateRecord> {
        vec![rate("USD", 1.0), rate("EUR", 0.9), rate("JPY", 148.0)]
    }

    #[test]
    fn converts_through_shared_base() {
        let converted = convert_amount(100.0, "EUR", "USD", &table(), None).expect("convert");
        assert_eq!(converted, 111.11);
    }

    #[test]
    fn same_currency_returns_rounded_amount() {
        let converted = convert_amount(10.25, "USD", "USD", &table(), Some(1)).expect("convert");
        assert_eq!(converted, 10.3);
        // The shortcut never touches the stored rate value.
        let degenerate = vec![rate("USD", 0.0)];
        let converted = convert_amount(42.0, "USD", "USD", &degenerate, None).expect("convert");
        assert_eq!(converted, 42.0);
    }

    #[test]
    fn missing_currency_names_the_offending_code() {
        let err = convert_amount(50.0, "XXX", "USD", &table(), None).expect_err("must fail");
        assert_eq!(err, ConvertError::InvalidCurrency("XXX".to_string()));
        let err = convert_amount(50.0, "USD", "ZZZ", &table(), None).expect_err("must fail");
        assert_eq!(err, ConvertError::InvalidCurrency("ZZZ".to_string()));
    }

    #[test]
    fn rejects_bad_amounts() {
        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = convert_amount(amount, "EUR", "USD", &table(), None).expect_err("must fail");
            assert!(matches!(err, ConvertError::InvalidAmount(_)), "{}", amount);
        }
    }

    #[test]
    fn codes_are_normalized_before_lookup() {
        let converted = convert_amount(100.0, " eur ", "usd", &table(), None).expect("convert");
        assert_eq!(converted, 111.11);
    }

    #[test]
    fn zero_base_rate_is_a_calculation_error() {
        let rates = vec![rate("USD", 1.0), rate("BAD", 0.0)];
        let err = convert_amount(10.0, "BAD", "USD", &rates, None).expect_err("must fail");
        assert_eq!(err, ConvertError::Calculation);
    }

    #[test]
    fn round_trip_is_stable_within_rounding() {
        let rates = table();
        let forward = convert_amount(250.0, "USD", "JPY", &rates, None).expect("forward");
        let back = convert_amount(forward, "JPY", "USD", &rates, None).expect("back");
        assert!((back - 250.0).abs() < 0.01, "round trip drifted: {}", back);
    }

    #[test]
    fn custom_decimal_places_are_honored() {
        let converted = convert_amount(100.0, "EUR", "USD", &table(), Some(4)).expect("convert");
        assert_eq!(converted, 111.1111);
        let converted = convert_amount(100.0, "EUR", "USD", &table(), Some(0)).expect("convert");
        assert_eq!(converted, 111.0);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // 0.125 is exactly representable, so the half-way case is genuine.
        assert_eq!(round_to_places(0.125, 2), 0.13);
        assert_eq!(round_to_places(-0.125, 2), -0.13);
        assert_eq!(round_to_places(2.5, 0), 3.0);
        assert_eq!(round_to_places(-2.5, 0), -3.0);
    }
}
