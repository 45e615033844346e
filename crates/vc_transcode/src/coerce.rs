//! Loose scalar coercions between plain and typed representations.
//!
//! Every function returns `None` when the input has no sensible value of
//! the target kind; callers turn that into a missing value.

use alloc::format;
use alloc::string::{String, ToString};

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use num_bigint::BigInt;
use vc_object::Value;

/// Integral numbers below this magnitude print without an exponent.
const PLAIN_INTEGER_LIMIT: f64 = 1e21;

/// ISO-8601 with millisecond precision and a `Z` suffix.
#[inline]
pub fn date_to_iso(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Shortest decimal form of a number, integers without a fraction.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        String::from("NaN")
    } else if n.is_infinite() {
        String::from(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        String::from("0")
    } else if n.fract() == 0.0 && n.abs() < PLAIN_INTEGER_LIMIT {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// Numeric value; unparseable input and `NaN` give `None`.
pub fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => *n,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::String(s) => parse_number(s)?,
        Value::Date(d) => d.timestamp_millis() as f64,
        Value::BigInt(b) => b.to_string().parse().ok()?,
        Value::Undefined | Value::List(_) | Value::Object(_) => return None,
    };
    (!n.is_nan()).then_some(n)
}

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    match s {
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ if s.bytes().any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E')) => None,
        _ => s.parse().ok(),
    }
}

/// String form; lists and objects give `None`.
pub fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(format_number(*n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::from("null")),
        Value::Date(d) => Some(date_to_iso(d)),
        Value::BigInt(b) => Some(b.to_str_radix(10)),
        Value::Undefined | Value::List(_) | Value::Object(_) => None,
    }
}

/// Boolean form: strings are true only when equal to `"true"`, everything
/// else by truthiness.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        other => other.is_truthy(),
    }
}

/// Date from an ISO-8601 string, a plain `YYYY-MM-DD` date or epoch
/// milliseconds.
pub fn to_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Number(n) if n.is_finite() => DateTime::from_timestamp_millis(*n as i64),
        Value::String(s) => parse_date(s.trim()),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Big integer from a decimal string, an integral number or a boolean.
pub fn to_big_int(value: &Value) -> Option<BigInt> {
    match value {
        Value::BigInt(b) => Some(b.clone()),
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => {
            format_number(*n).parse().ok()
        }
        Value::Bool(b) => Some(BigInt::from(u8::from(*b))),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn numbers_from_loose_input() {
        assert_eq!(to_number(&Value::from("42")), Some(42.0));
        assert_eq!(to_number(&Value::from(" 1.5e3 ")), Some(1500.0));
        assert_eq!(to_number(&Value::from("")), Some(0.0));
        assert_eq!(to_number(&Value::from(true)), Some(1.0));
        assert_eq!(to_number(&Value::from("abc")), None);
        assert_eq!(to_number(&Value::from("nan")), None);
        assert_eq!(to_number(&Value::from("inf")), None);
        assert_eq!(to_number(&Value::from("-Infinity")), Some(f64::NEG_INFINITY));
        assert_eq!(to_number(&Value::Undefined), None);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(123456789012.0), "123456789012");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn strings_and_booleans() {
        assert_eq!(to_string(&Value::from(3)).as_deref(), Some("3"));
        assert_eq!(to_string(&Value::from(false)).as_deref(), Some("false"));
        assert_eq!(to_string(&Value::from(vc_object::ObjectRef::plain())), None);
        assert!(to_bool(&Value::from("true")));
        assert!(!to_bool(&Value::from("yes")));
        assert!(to_bool(&Value::from(2)));
        assert!(!to_bool(&Value::Null));
    }

    #[test]
    fn dates() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(to_date(&Value::from("2024-01-02T03:04:05.000Z")), Some(expected));
        assert_eq!(to_date(&Value::from("2024-01-02T05:04:05+02:00")), Some(expected));
        assert_eq!(to_date(&Value::from("2024-01-02T03:04:05")), Some(expected));
        assert_eq!(
            to_date(&Value::from("2024-01-02")),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(
            to_date(&Value::from(expected.timestamp_millis() as f64)),
            Some(expected)
        );
        assert_eq!(to_date(&Value::from("yesterday")), None);
        assert_eq!(date_to_iso(&expected), "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn big_integers() {
        let big: BigInt = "98765432109876543210".parse().unwrap();
        assert_eq!(to_big_int(&Value::from("98765432109876543210")), Some(big));
        assert_eq!(to_big_int(&Value::from(12)), Some(BigInt::from(12)));
        assert_eq!(to_big_int(&Value::from(1.5)), None);
        assert_eq!(to_big_int(&Value::from("1.5")), None);
    }
}
