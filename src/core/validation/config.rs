//! Per-field validation configuration

use crate::core::error::{FieldError, ValidationError};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

type Validator = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;
type Filter = Arc<dyn Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync>;

/// Filters and validators keyed by field name
///
/// Fields are processed in the order their first rule was added.
#[derive(Clone, Default)]
pub struct ValidationConfig {
    name: String,
    validators: IndexMap<String, Vec<Validator>>,
    filters: IndexMap<String, Vec<Filter>>,
}

impl ValidationConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_validator<F>(&mut self, field: &str, validator: F)
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators
            .entry(field.to_string())
            .or_default()
            .push(Arc::new(validator));
    }

    pub fn add_filter<F>(&mut self, field: &str, filter: F)
    where
        F: Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.filters
            .entry(field.to_string())
            .or_default()
            .push(Arc::new(filter));
    }

    /// Builder form of [`add_validator`](Self::add_validator)
    pub fn validate<F>(mut self, field: &str, validator: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.add_validator(field, validator);
        self
    }

    /// Builder form of [`add_filter`](Self::add_filter)
    pub fn filter<F>(mut self, field: &str, filter: F) -> Self
    where
        F: Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.add_filter(field, filter);
        self
    }

    /// Normalize then validate an object payload
    ///
    /// Field errors are reported under `prefix.field` (or `field` when the
    /// prefix is empty). Every failing field is collected before returning.
    pub fn validate_and_filter(&self, prefix: &str, payload: Value) -> Result<Value, ValidationError> {
        let Value::Object(mut object) = payload else {
            return Err(ValidationError::FieldError {
                field: display_field(prefix, ""),
                message: format!("{} must be an object", self.name),
            });
        };

        let mut errors = Vec::new();

        for (field, filters) in &self.filters {
            let Some(value) = object.remove(field) else {
                continue;
            };
            let mut current = value;
            for filter in filters {
                match filter(field, current.clone()) {
                    Ok(next) => current = next,
                    Err(e) => {
                        errors.push(FieldError {
                            field: display_field(prefix, field),
                            message: e.to_string(),
                        });
                        break;
                    }
                }
            }
            object.insert(field.clone(), current);
        }

        for (field, validators) in &self.validators {
            let value = object.get(field).cloned().unwrap_or(Value::Null);
            for validator in validators {
                if let Err(message) = validator(field, &value) {
                    errors.push(FieldError {
                        field: display_field(prefix, field),
                        message,
                    });
                    break;
                }
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(object))
        } else {
            Err(ValidationError::from_errors(errors))
        }
    }
}

impl std::fmt::Debug for ValidationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationConfig")
            .field("name", &self.name)
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn display_field(prefix: &str, field: &str) -> String {
    match (prefix.is_empty(), field.is_empty()) {
        (true, _) => field.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}.{field}"),
    }
}
