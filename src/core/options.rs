//! Configurable option groups of a printable product
//!
//! A product exposes named option groups (`printingType`, `laminationType`,
//! `features.roundCorners`, ...), each a list of labelled choices with a
//! price surcharge. The backend stores them as nested objects. Older forms
//! submit them flattened, with every option list encoded as a JSON string
//! under `<group>.options` and its toggle under `<group>.isEnabled`.

use crate::core::error::{FieldError, ListviewError, ParseError, Result, ValidationError};
use crate::core::validation::{ValidationConfig, filters, validators};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};

const OPTIONS_KEY: &str = "options";
const ENABLED_KEY: &str = "isEnabled";
const FLAT_OPTIONS_SUFFIX: &str = ".options";

/// Longest choice label accepted
pub const MAX_LABEL_CHARS: usize = 100;

/// One selectable choice within a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChoice {
    pub label: String,
    pub price: f64,
}

/// A named group of choices that can be switched off as a whole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionGroup {
    pub is_enabled: bool,
    pub options: Vec<OptionChoice>,
}

impl OptionGroup {
    pub fn new(options: Vec<OptionChoice>) -> Self {
        Self {
            is_enabled: true,
            options,
        }
    }

    pub fn choice(&self, label: &str) -> Option<&OptionChoice> {
        self.options.iter().find(|o| o.label == label)
    }
}

/// Ordered map of group name to group
///
/// Nested groups use dotted names, e.g. `features.dieCut`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OptionSchema {
    groups: IndexMap<String, OptionGroup>,
}

impl OptionSchema {
    /// Read every option group out of a nested product object
    ///
    /// Any object holding an `options` key is a group; other objects are
    /// searched for nested groups. Invalid choices are reported together
    /// as one validation error.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(ParseError::OptionField {
                field: String::new(),
                message: "expected an object".to_string(),
            }
            .into());
        };

        let mut schema = Self::default();
        let mut errors = Vec::new();
        schema.collect_nested(map, "", &mut errors)?;

        if errors.is_empty() {
            Ok(schema)
        } else {
            Err(ValidationError::from_errors(errors).into())
        }
    }

    /// Read option groups out of the legacy flat form encoding
    ///
    /// A group whose encoded list cannot be decoded or validated is kept
    /// with no options and a warning is logged.
    pub fn from_flat_form(form: &Map<String, Value>) -> Self {
        let mut schema = Self::default();

        for (key, value) in form {
            let Some(name) = key.strip_suffix(FLAT_OPTIONS_SUFFIX) else {
                continue;
            };
            let is_enabled = form
                .get(&format!("{name}.{ENABLED_KEY}"))
                .and_then(flag)
                .unwrap_or(true);

            let options = match decode_flat_options(key, name, value) {
                Ok(options) => options,
                Err(e) => {
                    tracing::warn!(
                        group = %name,
                        error = %e,
                        "Option group could not be read, keeping it without options"
                    );
                    Vec::new()
                }
            };

            schema.insert(name, OptionGroup { is_enabled, options });
        }

        schema
    }

    /// Encode back into the flat form representation
    pub fn to_flat_form(&self) -> Map<String, Value> {
        let mut form = Map::new();
        for (name, group) in &self.groups {
            form.insert(format!("{name}.{ENABLED_KEY}"), Value::Bool(group.is_enabled));
            form.insert(
                format!("{name}{FLAT_OPTIONS_SUFFIX}"),
                Value::String(choices_to_value(&group.options).to_string()),
            );
        }
        form
    }

    /// Encode as nested objects, splitting dotted group names
    pub fn to_nested_value(&self) -> Value {
        let mut root = Map::new();
        for (name, group) in &self.groups {
            let path: Vec<&str> = name.split('.').collect();
            let encoded = json!({
                ENABLED_KEY: group.is_enabled,
                OPTIONS_KEY: choices_to_value(&group.options),
            });
            insert_at_path(&mut root, &path, encoded);
        }
        Value::Object(root)
    }

    pub fn insert(&mut self, name: impl Into<String>, group: OptionGroup) {
        self.groups.insert(name.into(), group);
    }

    pub fn get(&self, name: &str) -> Option<&OptionGroup> {
        self.groups.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionGroup)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Groups currently offered to customers
    pub fn enabled_groups(&self) -> impl Iterator<Item = (&str, &OptionGroup)> {
        self.iter().filter(|(_, group)| group.is_enabled)
    }

    /// Surcharge of `label` in `group`, if both exist
    pub fn price_of(&self, group: &str, label: &str) -> Option<f64> {
        self.get(group)?.choice(label).map(|c| c.price)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn collect_nested(
        &mut self,
        map: &Map<String, Value>,
        prefix: &str,
        errors: &mut Vec<FieldError>,
    ) -> Result<()> {
        for (key, value) in map {
            let Value::Object(object) = value else {
                continue;
            };
            let name = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            if !object.contains_key(OPTIONS_KEY) {
                self.collect_nested(object, &name, errors)?;
                continue;
            }

            let is_enabled = object.get(ENABLED_KEY).and_then(flag).unwrap_or(true);
            let items = match object.get(OPTIONS_KEY) {
                Some(Value::Array(items)) => items.clone(),
                Some(Value::Null) | None => Vec::new(),
                Some(Value::String(encoded)) => decode_list(&name, encoded)?,
                Some(other) => {
                    return Err(ParseError::OptionField {
                        field: name,
                        message: format!("expected a list, got {other}"),
                    }
                    .into());
                }
            };

            match validate_choices(&name, &items) {
                Ok(options) => self.insert(name, OptionGroup { is_enabled, options }),
                Err(e) => errors.extend(e.fields()),
            }
        }
        Ok(())
    }
}

/// Rules every option choice must satisfy
pub fn choice_rules() -> ValidationConfig {
    ValidationConfig::new("option")
        .filter("label", filters::trim())
        .filter("price", filters::numeric())
        .filter("price", filters::round_decimals(2))
        .validate("label", validators::non_empty())
        .validate("label", validators::string_length(1, MAX_LABEL_CHARS))
        .validate("price", validators::required())
        .validate("price", validators::non_negative())
}

fn validate_choices(group: &str, items: &[Value]) -> std::result::Result<Vec<OptionChoice>, ValidationError> {
    let rules = choice_rules();
    let mut options = Vec::with_capacity(items.len());
    let mut errors = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let prefix = format!("{group}[{index}]");
        let normalized = match rules.validate_and_filter(&prefix, item.clone()) {
            Ok(value) => value,
            Err(e) => {
                errors.extend(e.fields());
                continue;
            }
        };

        let label = match normalized.get("label") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                errors.push(FieldError {
                    field: format!("{prefix}.label"),
                    message: "Field 'label' must be text".to_string(),
                });
                continue;
            }
        };
        let Some(price) = normalized.get("price").and_then(Value::as_f64) else {
            errors.push(FieldError {
                field: format!("{prefix}.price"),
                message: "Field 'price' must be a number".to_string(),
            });
            continue;
        };

        options.push(OptionChoice { label, price });
    }

    if errors.is_empty() {
        Ok(options)
    } else {
        Err(ValidationError::from_errors(errors))
    }
}

fn decode_flat_options(key: &str, name: &str, value: &Value) -> Result<Vec<OptionChoice>> {
    let items = match value {
        Value::String(encoded) => decode_list(key, encoded)?,
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => {
            return Err(ParseError::OptionField {
                field: key.to_string(),
                message: format!("expected a JSON string, got {other}"),
            }
            .into());
        }
    };
    Ok(validate_choices(name, &items)?)
}

fn decode_list(field: &str, encoded: &str) -> Result<Vec<Value>> {
    if encoded.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Vec<Value>>(encoded).map_err(|e| {
        ListviewError::from(ParseError::OptionField {
            field: field.to_string(),
            message: e.to_string(),
        })
    })
}

fn insert_at_path(map: &mut Map<String, Value>, path: &[&str], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            map.insert(leaf.to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_at_path(child, rest, value);
            }
        }
    }
}

fn choices_to_value(options: &[OptionChoice]) -> Value {
    Value::Array(
        options
            .iter()
            .map(|o| json!({ "label": o.label, "price": o.price }))
            .collect(),
    )
}

/// Read a toggle sent either as a JSON bool or as form text
fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Orderable quantities of a product, ascending and without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuantityTiers(Vec<u32>);

impl QuantityTiers {
    /// Keep the positive integers among `values`
    ///
    /// Entries may be numbers or numeric strings; anything else is dropped.
    pub fn from_values(values: &[Value]) -> Self {
        let mut tiers = Self::default();
        for value in values {
            if let Some(q) = tier_from_value(value) {
                tiers.insert(q);
            }
        }
        tiers
    }

    /// Accept a JSON array or a JSON-string encoded array
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(values) => Self::from_values(values),
            Value::String(encoded) => serde_json::from_str::<Vec<Value>>(encoded)
                .map(|values| Self::from_values(&values))
                .unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Add a tier, returning false for zero or an existing tier
    pub fn insert(&mut self, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        match self.0.binary_search(&quantity) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, quantity);
                true
            }
        }
    }

    pub fn remove(&mut self, quantity: u32) -> bool {
        match self.0.binary_search(&quantity) {
            Ok(pos) => {
                self.0.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for QuantityTiers {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn tier_from_value(value: &Value) -> Option<u32> {
    let q = match value {
        Value::Number(n) => match n.as_u64() {
            Some(q) => q,
            None => {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || f <= 0.0 {
                    return None;
                }
                f as u64
            }
        },
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(q).ok().filter(|q| *q > 0)
}
