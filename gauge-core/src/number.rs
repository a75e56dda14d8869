//! Numeral parsing for user-typed input
//!
//! Converter input arrives as free text straight from an input field, so
//! partial or malformed numerals are the normal case, not an exception.
//! Parsing takes the longest leading decimal or scientific numeral and
//! ignores whatever follows it, so "1.5e" on the way to "1.5e10" still
//! reads as 1.5. The value must be finite.

use thiserror::Error;

/// Error type for numeral parsing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Number is not finite: {0}")]
    NonFinite(String),
}

/// Parse the leading numeral of `s` into a finite `f64`.
///
/// Supports: "123", "-42", "3.14", ".5", "1.", "1.5e10", "2E-3", and any of
/// those followed by trailing text ("12abc" is 12, "1.5e" is 1.5).
/// Rejects text without a leading numeral, words such as "inf" or "NaN",
/// and values that overflow to infinity ("1e400").
pub fn parse_numeral(s: &str) -> Result<f64, NumberError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NumberError::ParseError("empty input".to_string()));
    }

    let prefix = leading_numeral(s).ok_or_else(|| NumberError::ParseError(s.to_string()))?;

    let value: f64 = prefix
        .parse()
        .map_err(|_| NumberError::ParseError(s.to_string()))?;

    if !value.is_finite() {
        return Err(NumberError::NonFinite(s.to_string()));
    }

    Ok(value)
}

/// Longest prefix of `s` shaped like `[+-]digits[.digits][(e|E)[+-]digits]`
fn leading_numeral(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        end += 1 + frac_digits;
    }

    if int_digits + frac_digits == 0 {
        return None;
    }

    // An exponent only counts once it has at least one digit
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    Some(&s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_and_decimal() {
        assert_eq!(parse_numeral("42"), Ok(42.0));
        assert_eq!(parse_numeral("-3.5"), Ok(-3.5));
        assert_eq!(parse_numeral("  7.25  "), Ok(7.25));
    }

    #[test]
    fn test_partial_decimals() {
        assert_eq!(parse_numeral(".5"), Ok(0.5));
        assert_eq!(parse_numeral("1."), Ok(1.0));
    }

    #[test]
    fn test_scientific() {
        assert_eq!(parse_numeral("1.5e10"), Ok(1.5e10));
        assert_eq!(parse_numeral("2E-3"), Ok(0.002));
    }

    #[test]
    fn test_leading_numeral_with_trailing_text() {
        assert_eq!(parse_numeral("12abc"), Ok(12.0));
        assert_eq!(parse_numeral("1.5e"), Ok(1.5));
        assert_eq!(parse_numeral("1.5e+"), Ok(1.5));
        assert_eq!(parse_numeral("2e3x"), Ok(2000.0));
        assert_eq!(parse_numeral("-4.5 kg"), Ok(-4.5));
        assert_eq!(parse_numeral("3.1.4"), Ok(3.1));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(parse_numeral("abc"), Err(NumberError::ParseError(_))));
        assert!(matches!(parse_numeral(""), Err(NumberError::ParseError(_))));
        assert!(matches!(parse_numeral("   "), Err(NumberError::ParseError(_))));
        assert!(matches!(parse_numeral("-"), Err(NumberError::ParseError(_))));
        assert!(matches!(parse_numeral("."), Err(NumberError::ParseError(_))));
        assert!(matches!(parse_numeral("e5"), Err(NumberError::ParseError(_))));
        assert!(matches!(parse_numeral("x12"), Err(NumberError::ParseError(_))));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(parse_numeral("inf").is_err());
        assert!(parse_numeral("NaN").is_err());
        assert!(matches!(parse_numeral("1e400"), Err(NumberError::NonFinite(_))));
    }
}
