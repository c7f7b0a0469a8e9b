//! Lenient value coercion
//!
//! Cells come from spreadsheets typed by hand. A cell that does not parse
//! takes the default instead of failing the row.

use serde_json::Value;

/// Length of the leading `[+-]?digits` run, after leading whitespace
fn int_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start { "" } else { &s[..end] }
}

/// Leading `[+-]?digits[.digits][e[+-]digits]` run
fn float_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut mantissa_digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
            mantissa_digits += 1;
        }
        end = frac;
    }
    if mantissa_digits == 0 {
        return "";
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_digits_start = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits_start {
            end = exp;
        }
    }
    &s[..end]
}

/// Base-10 integer parse of the leading numeric run, `default` when there is none.
///
/// `"150"` → 150, `"12 visits"` → 12, `"3.9"` → 3, `"N/A"` / `""` → `default`.
pub fn parse_int_or_default(value: &str, default: i64) -> i64 {
    int_prefix(value.trim_start()).parse().unwrap_or(default)
}

/// Float parse of the leading numeric run, `default` when there is none or it is not finite.
pub fn parse_float_or_default(value: &str, default: f64) -> f64 {
    float_prefix(value.trim_start())
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(default)
}

/// Non-negative integer metric from an untrusted value (0 on anything unusable)
pub fn int_from_value(value: Option<&Value>) -> u64 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => parse_int_or_default(s, 0),
        _ => 0,
    };
    parsed.max(0) as u64
}

/// Non-negative float metric from an untrusted value (0.0 on anything unusable)
pub fn float_from_value(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => parse_float_or_default(s, 0.0),
        _ => 0.0,
    };
    if parsed > 0.0 { parsed } else { 0.0 }
}

/// `true` for boolean true and the strings "true" / "yes" in any case
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes")
        }
        _ => false,
    }
}

/// Pass-through text: strings verbatim, scalars stringified, absent/null as `""`
pub fn text_from_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_int_or_default() {
        assert_eq!(parse_int_or_default("150", 0), 150);
        assert_eq!(parse_int_or_default("  42abc", 0), 42);
        assert_eq!(parse_int_or_default("3.9", 0), 3);
        assert_eq!(parse_int_or_default("-7", 0), -7);
        assert_eq!(parse_int_or_default("N/A", 0), 0);
        assert_eq!(parse_int_or_default("", 5), 5);
        assert_eq!(parse_int_or_default("abc", -1), -1);
        assert_eq!(parse_int_or_default("+", 9), 9);
    }

    #[test]
    fn test_parse_float_or_default() {
        assert_eq!(parse_float_or_default("12.50", 0.0), 12.5);
        assert_eq!(parse_float_or_default(".5", 0.0), 0.5);
        assert_eq!(parse_float_or_default("1e3 dollars", 0.0), 1000.0);
        assert_eq!(parse_float_or_default("7e", 0.0), 7.0);
        assert_eq!(parse_float_or_default("N/A", 0.0), 0.0);
        assert_eq!(parse_float_or_default("", 1.5), 1.5);
        assert_eq!(parse_float_or_default(".", 0.0), 0.0);
        assert_eq!(parse_float_or_default("1e999", 0.0), 0.0);
    }

    #[test]
    fn test_int_from_value_never_negative() {
        assert_eq!(int_from_value(Some(&json!(150))), 150);
        assert_eq!(int_from_value(Some(&json!("150"))), 150);
        assert_eq!(int_from_value(Some(&json!(2.7))), 2);
        assert_eq!(int_from_value(Some(&json!(-4))), 0);
        assert_eq!(int_from_value(Some(&json!("-4"))), 0);
        assert_eq!(int_from_value(Some(&json!(true))), 0);
        assert_eq!(int_from_value(None), 0);
    }

    #[test]
    fn test_float_from_value() {
        assert_eq!(float_from_value(Some(&json!(19.99))), 19.99);
        assert_eq!(float_from_value(Some(&json!("abc"))), 0.0);
        assert_eq!(float_from_value(Some(&json!("-3.5"))), 0.0);
        assert_eq!(float_from_value(Some(&json!(null))), 0.0);
    }

    #[test]
    fn test_truthy() {
        for v in [json!("true"), json!("TRUE"), json!("yes"), json!(" Yes "), json!(true)] {
            assert!(truthy(Some(&v)), "{v} should be true");
        }
        for v in [json!("false"), json!("no"), json!(""), json!(1), json!(null), json!(false)] {
            assert!(!truthy(Some(&v)), "{v} should be false");
        }
        assert!(!truthy(None));
    }

    #[test]
    fn test_text_from_value() {
        assert_eq!(text_from_value(Some(&json!("a b"))), "a b");
        assert_eq!(text_from_value(Some(&json!(12))), "12");
        assert_eq!(text_from_value(Some(&json!(null))), "");
        assert_eq!(text_from_value(None), "");
    }
}
