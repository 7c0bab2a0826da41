//! Reusable field validators
//!
//! Each validator only checks the JSON type it understands and lets other
//! types through, so validators compose on one field.

use serde_json::Value;

/// Validator: field is required (not null)
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_null() {
            Err(format!("Field '{}' is required", field))
        } else {
            Ok(())
        }
    }
}

/// Validator: string must contain something other than whitespace
pub fn non_empty() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Err(format!("Field '{}' is required", field)),
        Value::String(s) if s.trim().is_empty() => {
            Err(format!("Field '{}' must not be empty", field))
        }
        _ => Ok(()),
    }
}

/// Validator: number must be zero or more
///
/// JSON numbers are always finite, so this also rules out NaN and
/// infinities that slipped in through a filter.
pub fn non_negative() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if !num.is_finite() || num < 0.0 {
                Err(format!(
                    "Field '{}' must not be negative (value: {})",
                    field, num
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: string length must be within range
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
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
        } else {
            Ok(())
        }
    }
}

/// Validator: value must be in allowed list
pub fn in_list(
    allowed: Vec<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if allowed.iter().any(|a| a == s) {
                Ok(())
            } else {
                Err(format!(
                    "'{}' must be one of: {:?} (value: {})",
                    field, allowed, s
                ))
            }
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === required() ===

    #[test]
    fn test_required_null_value_returns_error() {
        let v = required();
        let result = v("name", &json!(null));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("required"));
    }

    #[test]
    fn test_required_empty_string_returns_ok() {
        let v = required();
        assert!(v("name", &json!("")).is_ok());
    }

    // === non_empty() ===

    #[test]
    fn test_non_empty_rejects_blank() {
        let v = non_empty();
        assert!(v("label", &json!("  ")).is_err());
        assert!(v("label", &json!(null)).is_err());
        assert!(v("label", &json!("Matte")).is_ok());
    }

    // === non_negative() ===

    #[test]
    fn test_non_negative_accepts_zero() {
        let v = non_negative();
        assert!(v("price", &json!(0)).is_ok());
        assert!(v("price", &json!(12.5)).is_ok());
    }

    #[test]
    fn test_non_negative_rejects_negative() {
        let v = non_negative();
        let result = v("price", &json!(-0.5));
        assert!(result.unwrap_err().contains("negative"));
    }

    // === string_length() ===

    #[test]
    fn test_string_length_bounds() {
        let v = string_length(1, 5);
        assert!(v("label", &json!("")).is_err());
        assert!(v("label", &json!("abcdef")).is_err());
        assert!(v("label", &json!("abc")).is_ok());
    }

    #[test]
    fn test_string_length_counts_characters() {
        let v = string_length(1, 3);
        assert!(v("label", &json!("née")).is_ok());
    }

    // === in_list() ===

    #[test]
    fn test_in_list() {
        let v = in_list(vec!["draft".to_string(), "published".to_string()]);
        assert!(v("status", &json!("draft")).is_ok());
        assert!(v("status", &json!("archived")).is_err());
        assert!(v("status", &json!(1)).is_ok());
    }
}
