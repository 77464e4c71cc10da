//! Numeric coercion for string-typed measures.
//!
//! Nothing here fails: anything that does not parse contributes zero.

/// Whole-field coercion. Surrounding whitespace is ignored, an empty field is 0,
/// and any other non-numeric content (or a non-finite value) is 0.
pub fn number_or_zero(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Leading-prefix coercion: the longest numeric prefix after leading whitespace
/// (`"10-15"` -> 10, `"3.5mm"` -> 3.5), or 0 when there is none.
pub fn leading_number_or_zero(raw: &str) -> f64 {
    leading_number(raw).unwrap_or(0.0)
}

/// Longest prefix of the form `[+-]digits[.digits][e[+-]digits]`.
pub fn leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Largest magnitude `hundredths` distinguishes; anything beyond is clamped to it.
pub const MAX_WHOLE: f64 = 1e15;

/// Digits needed to write any finite `f64` fraction exactly.
const EXACT_FRACTION_DIGITS: usize = 1100;

/// Round to two decimals, returned as integer hundredths.
///
/// Rounds the exact binary value (`0.015` is stored just below the midpoint and
/// gives 1), with true halves going away from zero (`0.125` gives 13). This is
/// how a fixed two-decimal rendering rounds. Non-finite input gives 0 and
/// magnitudes above `MAX_WHOLE` are clamped.
pub fn hundredths(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let magnitude = value.abs().min(MAX_WHOLE);
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, magnitude);
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits = fraction.bytes().map(|b| i64::from(b.wrapping_sub(b'0')));
    let tenths = digits.next().unwrap_or(0);
    let cents = digits.next().unwrap_or(0);
    let round_up = digits.next().map_or(false, |d| d >= 5);

    let whole = whole.parse::<i64>().unwrap_or(0);
    let rounded = whole * 100 + tenths * 10 + cents + i64::from(round_up);
    if value < 0.0 {
        -rounded
    } else {
        rounded
    }
}
