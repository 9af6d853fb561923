//! Lenient numeric deserializers.
//!
//! Browser forms post numbers either as JSON numbers or as numeric strings
//! (`"50"`). These helpers accept both and reject anything that is not a
//! whole number, so bad input surfaces as a 400 instead of reaching storage.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Text(String),
}

fn to_i32<E: de::Error>(value: NumberOrString) -> Result<i32, E> {
    match value {
        NumberOrString::Int(n) => {
            i32::try_from(n).map_err(|_| E::custom(format!("{} is out of range", n)))
        }
        NumberOrString::Float(f) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => {
            Ok(f as i32)
        }
        NumberOrString::Float(f) => Err(E::custom(format!("expected a whole number, got {}", f))),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<i32>()
            .map_err(|_| E::custom(format!("expected a whole number, got \"{}\"", s))),
    }
}

/// Deserialize an `i32` from a number or a numeric string.
pub fn int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    to_i32(NumberOrString::deserialize(deserializer)?)
}

/// Optional variant of [`int`]; use with `#[serde(default)]`.
pub fn option_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => to_i32(value).map(Some),
    }
}

/// Treat a missing or empty query value as absent, otherwise parse it.
pub fn parse_non_empty<T: std::str::FromStr>(
    raw: Option<&str>,
    field: &str,
) -> Result<Option<T>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| format!("{} must be a number", field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(deserialize_with = "int")]
        quantity: i32,
        #[serde(default, deserialize_with = "option_int")]
        amount: Option<i32>,
    }

    fn parse(json: &str) -> Result<Body, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse(r#"{"quantity": 50}"#).unwrap().quantity, 50);
        assert_eq!(parse(r#"{"quantity": "50"}"#).unwrap().quantity, 50);
        assert_eq!(parse(r#"{"quantity": " 7 "}"#).unwrap().quantity, 7);
        assert_eq!(parse(r#"{"quantity": 3.0}"#).unwrap().quantity, 3);
        assert_eq!(parse(r#"{"quantity": -2}"#).unwrap().quantity, -2);
    }

    #[test]
    fn test_rejects_non_integers() {
        assert!(parse(r#"{"quantity": "abc"}"#).is_err());
        assert!(parse(r#"{"quantity": 2.7}"#).is_err());
        assert!(parse(r#"{"quantity": ""}"#).is_err());
        assert!(parse(r#"{"quantity": 9999999999}"#).is_err());
    }

    #[test]
    fn test_optional_field() {
        assert_eq!(parse(r#"{"quantity": 1}"#).unwrap().amount, None);
        assert_eq!(parse(r#"{"quantity": 1, "amount": null}"#).unwrap().amount, None);
        assert_eq!(parse(r#"{"quantity": 1, "amount": "25"}"#).unwrap().amount, Some(25));
    }

    #[test]
    fn test_parse_non_empty() {
        assert_eq!(parse_non_empty::<Decimal>(None, "minPrice"), Ok(None));
        assert_eq!(parse_non_empty::<Decimal>(Some(""), "minPrice"), Ok(None));
        assert_eq!(
            parse_non_empty::<Decimal>(Some("5"), "minPrice"),
            Ok(Some(Decimal::from(5)))
        );
        assert_eq!(
            parse_non_empty::<Decimal>(Some("five"), "minPrice"),
            Err("minPrice must be a number".to_string())
        );
    }
}
