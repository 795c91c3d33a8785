//! Reusable field validators
//!
//! Each validator receives the field's wire name and its JSON value. Missing
//! fields are passed as `Value::Null`, so every validator except [`required`]
//! lets null through.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Validator: field is required (not null, not blank)
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Err(format!("'{}' is required", field)),
        Value::String(s) if s.trim().is_empty() => Err(format!("'{}' is required", field)),
        _ => Ok(()),
    }
}

/// Validator: number must be strictly positive
pub fn positive() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value.as_i64() {
        Some(num) if num <= 0 => Err(format!(
            "'{}' must be positive (value: {})",
            field, num
        )),
        _ => Ok(()),
    }
}

/// Validator: string length, in characters, must be within range
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        let Some(s) = value.as_str() else {
            return Ok(());
        };
        let len = s.chars().count();
        if len < min {
            Err(format!(
                "'{}' must have at least {} characters (currently: {})",
                field, min, len
            ))
        } else if len > max {
            Err(format!(
                "'{}' must not exceed {} characters (currently: {})",
                field, max, len
            ))
        } else {
            Ok(())
        }
    }
}

/// Validator: string made only of ASCII digits, with a length within range
pub fn digits(
    min: usize,
    max: usize,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        let Some(s) = value.as_str() else {
            return Ok(());
        };
        if !digits_regex().is_match(s) || s.len() < min || s.len() > max {
            if min == max {
                Err(format!("'{}' must have exactly {} digits", field, min))
            } else {
                Err(format!(
                    "'{}' must have between {} and {} digits",
                    field, min, max
                ))
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: Brazilian state code, two uppercase letters
pub fn state_code() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value.as_str() {
        Some(s) if !state_regex().is_match(s) => Err(format!(
            "'{}' must be a two-letter uppercase state code (value: {})",
            field, s
        )),
        _ => Ok(()),
    }
}

fn digits_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"))
}

fn state_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{2}$").expect("valid state regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === required() ===

    #[test]
    fn test_required_null_value_returns_error() {
        let v = required();
        let result = v("nome", &json!(null));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("required"));
    }

    #[test]
    fn test_required_blank_string_returns_error() {
        let v = required();
        assert!(v("nome", &json!("   ")).is_err());
    }

    #[test]
    fn test_required_string_value_returns_ok() {
        let v = required();
        assert!(v("nome", &json!("Ana")).is_ok());
    }

    #[test]
    fn test_required_number_value_returns_ok() {
        let v = required();
        assert!(v("clienteId", &json!(1)).is_ok());
    }

    // === positive() ===

    #[test]
    fn test_positive_zero_returns_error() {
        let v = positive();
        assert!(v("clienteId", &json!(0)).is_err());
    }

    #[test]
    fn test_positive_negative_returns_error() {
        let v = positive();
        let result = v("clienteId", &json!(-3));
        assert!(result.unwrap_err().contains("positive"));
    }

    #[test]
    fn test_positive_null_passthrough() {
        let v = positive();
        assert!(v("clienteId", &json!(null)).is_ok());
    }

    // === string_length() ===

    #[test]
    fn test_string_length_counts_characters() {
        let v = string_length(2, 3);
        assert!(v("nome", &json!("Zé")).is_ok());
        assert!(v("nome", &json!("Joã")).is_ok());
        assert!(v("nome", &json!("João")).is_err());
        assert!(v("nome", &json!("A")).is_err());
    }

    // === digits() ===

    #[test]
    fn test_digits_exact_length() {
        let v = digits(11, 11);
        assert!(v("cpf", &json!("12345678900")).is_ok());
        let err = v("cpf", &json!("1234567890")).unwrap_err();
        assert!(err.contains("exactly 11 digits"));
    }

    #[test]
    fn test_digits_rejects_punctuation() {
        let v = digits(11, 11);
        assert!(v("cpf", &json!("123.456.789-00")).is_err());
    }

    #[test]
    fn test_digits_range() {
        let v = digits(13, 19);
        assert!(v("numero", &json!("4111111111111")).is_ok());
        assert!(v("numero", &json!("4111111111111111111")).is_ok());
        assert!(v("numero", &json!("411111111111")).is_err());
        assert!(v("numero", &json!("41111111111111111111")).is_err());
    }

    // === state_code() ===

    #[test]
    fn test_state_code() {
        let v = state_code();
        assert!(v("uf", &json!("SP")).is_ok());
        assert!(v("uf", &json!("sp")).is_err());
        assert!(v("uf", &json!("SPX")).is_err());
        assert!(v("uf", &json!(null)).is_ok());
    }
}
