//! Lenient numeric coercion for form text.
//!
//! Form inputs are parsed the way browsers coerce them: the longest numeric
//! prefix wins and trailing garbage is ignored. A string with no numeric
//! prefix becomes NaN (floats) or `None` (ints) instead of an error.

use std::num::IntErrorKind;

use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Parse the longest decimal prefix of `raw`, or NaN if there is none.
pub fn parse_float_lenient(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return f64::NAN;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse the leading integer of `raw` (decimal, or hex with a `0x` prefix).
/// Out-of-range values saturate at the `i64` bounds.
pub fn parse_int_lenient(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(digits.len(), |(idx, _)| idx);
    if end == 0 {
        return None;
    }

    let signed = if negative { format!("-{}", &digits[..end]) } else { digits[..end].to_string() };
    match i64::from_str_radix(&signed, radix) {
        Ok(value) => Some(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Render a number the way it appears in form payloads and query strings.
/// Magnitudes from `1e21` up and below `1e-6` use exponent notation (`1e+21`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_negative() { "-Infinity" } else { "Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        let exp = format!("{value:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    } else {
        value.to_string()
    }
}

/// JSON number for `value`. Integral values encode without a fractional
/// part, so 12.0 is written as 12; non-finite values become `null`.
pub fn number_json(value: f64) -> JsonValue {
    const SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if value.fract() == 0.0 && value.abs() <= SAFE_INTEGER {
        JsonValue::from(value as i64)
    } else {
        JsonValue::from(value)
    }
}

pub(crate) fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    number_json(*value).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_takes_longest_numeric_prefix() {
        assert_eq!(parse_float_lenient("12.5"), 12.5);
        assert_eq!(parse_float_lenient("  3.25m"), 3.25);
        assert_eq!(parse_float_lenient("-.5"), -0.5);
        assert_eq!(parse_float_lenient("7."), 7.0);
        assert_eq!(parse_float_lenient("1e3x"), 1000.0);
        assert_eq!(parse_float_lenient("2e"), 2.0);
        assert_eq!(parse_float_lenient("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn float_without_digits_is_nan() {
        assert!(parse_float_lenient("tall").is_nan());
        assert!(parse_float_lenient(".").is_nan());
        assert!(parse_float_lenient("-").is_nan());
    }

    #[test]
    fn int_truncates_and_ignores_trailing_text() {
        assert_eq!(parse_int_lenient("12.7"), Some(12));
        assert_eq!(parse_int_lenient(" -4 zone"), Some(-4));
        assert_eq!(parse_int_lenient("0x1A"), Some(26));
        assert_eq!(parse_int_lenient("pH 6"), None);
        assert_eq!(parse_int_lenient(""), None);
    }

    #[test]
    fn int_overflow_saturates() {
        assert_eq!(parse_int_lenient("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_int_lenient("-99999999999999999999 zone"), Some(i64::MIN));
        assert_eq!(parse_int_lenient("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_int_lenient("0xFFFFFFFFFFFFFFFFFF"), Some(i64::MAX));
    }

    #[test]
    fn numbers_render_without_trailing_fraction() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_notation() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn json_numbers_drop_integral_fractions() {
        assert_eq!(number_json(1.0).to_string(), "1");
        assert_eq!(number_json(-0.0).to_string(), "0");
        assert_eq!(number_json(2.5).to_string(), "2.5");
        assert!(number_json(f64::NAN).is_null());
        assert!(number_json(f64::INFINITY).is_null());
    }
}
