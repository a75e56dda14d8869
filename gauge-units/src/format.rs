//! Result formatting for display
//!
//! Everyday magnitudes are shown with 8 significant digits and no trailing
//! zeros. Very small or very large magnitudes switch to scientific notation
//! with a 6-digit mantissa fraction and a signed exponent (`9.461000e+15`).

/// Magnitudes below this render in scientific notation
pub const SCIENTIFIC_BELOW: f64 = 0.001;

/// Magnitudes above this render in scientific notation
pub const SCIENTIFIC_ABOVE: f64 = 1_000_000.0;

const SIGNIFICANT_DIGITS: usize = 8;
const MANTISSA_DIGITS: usize = 6;

// An f64 never has more significant decimal digits than this
const EXACT_DIGITS: usize = 767;

/// Format a conversion result. Non-finite values yield an empty string.
pub fn format_result(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude < SCIENTIFIC_BELOW || magnitude > SCIENTIFIC_ABOVE {
        scientific(value)
    } else {
        significant(value)
    }
}

/// Round `value` to `digits` significant digits, ties away from zero.
///
/// Returns the digits and the decimal exponent of the first one.
fn round_digits(value: f64, digits: usize) -> (Vec<u8>, i32) {
    // Exact decimal expansion, so a trailing 5 is a true tie
    let exact = format!("{:.*e}", EXACT_DIGITS, value.abs());
    let (mantissa, exp) = exact.split_once('e').unwrap_or((exact.as_str(), "0"));
    let mut exp: i32 = exp.parse().unwrap_or(0);

    let all: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).map(|b| b - b'0').collect();
    let mut kept: Vec<u8> = all.iter().copied().take(digits).collect();

    if all.get(digits).is_some_and(|&d| d >= 5) {
        let mut i = kept.len();
        loop {
            if i == 0 {
                kept.insert(0, 1);
                kept.truncate(digits);
                exp += 1;
                break;
            }
            i -= 1;
            if kept[i] == 9 {
                kept[i] = 0;
            } else {
                kept[i] += 1;
                break;
            }
        }
    }

    (kept, exp)
}

fn digit_string(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

fn sign(value: f64) -> &'static str {
    if value < 0.0 { "-" } else { "" }
}

fn scientific(value: f64) -> String {
    let (digits, exp) = round_digits(value, MANTISSA_DIGITS + 1);
    let exp_sign = if exp >= 0 { "+" } else { "-" };
    format!(
        "{}{}.{}e{}{}",
        sign(value),
        digit_string(&digits[..1]),
        digit_string(&digits[1..]),
        exp_sign,
        exp.abs()
    )
}

fn significant(value: f64) -> String {
    let (digits, exp) = round_digits(value, SIGNIFICANT_DIGITS);
    let text = digit_string(&digits);

    let body = if exp >= SIGNIFICANT_DIGITS as i32 - 1 {
        format!("{}{}", text, "0".repeat((exp - (SIGNIFICANT_DIGITS as i32 - 1)) as usize))
    } else if exp >= 0 {
        let (int_part, frac_part) = text.split_at(exp as usize + 1);
        format!("{}.{}", int_part, frac_part)
    } else {
        format!("0.{}{}", "0".repeat((-exp - 1) as usize), text)
    };

    format!("{}{}", sign(value), trim_fraction(body))
}

fn trim_fraction(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
