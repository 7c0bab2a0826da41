//! Catalog products (visiting card templates) and their configurable options

use crate::core::error::{ListviewError, Result};
use crate::core::field::FieldValue;
use crate::core::options::{OptionSchema, QuantityTiers};
use crate::core::record::Record;
use crate::core::validation::{ValidationConfig, filters, validators};
use crate::export::{CsvExport, date_cell, number_cell};
use crate::resources::{TextValue, cell, text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";

/// A fixed extra charge that can be switched on for a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surcharge {
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub price: Option<f64>,
    /// Multiplier or note text, depending on the surcharge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Surcharge {
    /// Price charged when enabled, 0 otherwise
    pub fn charge(&self) -> f64 {
        if self.is_enabled {
            self.price.unwrap_or(0.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantitySetting {
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub values: QuantityTiers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitingCard {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub category: Option<TextValue>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub sub_category: Option<TextValue>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub product_name: Option<TextValue>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub total_price: Option<f64>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub quantity: Option<QuantitySetting>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub design_file: Option<Surcharge>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub special_notes: Option<Surcharge>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub card_size_multiplier: Option<Surcharge>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub created_at: Option<DateTime<Utc>>,

    /// Option groups and any other product attributes, kept as served
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VisitingCard {
    pub fn category(&self) -> Option<&str> {
        self.category.as_ref()?.as_str()
    }

    pub fn sub_category(&self) -> Option<&str> {
        self.sub_category.as_ref()?.as_str()
    }

    pub fn product_name(&self) -> Option<&str> {
        self.product_name.as_ref()?.as_str()
    }

    pub fn is_published(&self) -> bool {
        self.status.as_deref() == Some(STATUS_PUBLISHED)
    }

    /// Quantities a customer may order, empty when quantities are switched off
    pub fn quantity_tiers(&self) -> &[u32] {
        match &self.quantity {
            Some(setting) if setting.is_enabled => setting.values.as_slice(),
            _ => &[],
        }
    }

    /// Base price plus every enabled surcharge
    pub fn calculate_total(&self) -> f64 {
        let surcharges: f64 = [&self.design_file, &self.special_notes, &self.card_size_multiplier]
            .into_iter()
            .flatten()
            .map(Surcharge::charge)
            .sum();
        self.total_price.unwrap_or(0.0) + surcharges
    }

    /// The product's option groups, validated
    pub fn option_schema(&self) -> Result<OptionSchema> {
        OptionSchema::from_value(&Value::Object(self.extra.clone()))
    }

    /// Rules for the top-level fields of a create or update payload
    pub fn validation_config() -> ValidationConfig {
        ValidationConfig::new("visiting_card")
            .filter("status", filters::trim())
            .filter("status", filters::lowercase())
            .filter("totalPrice", filters::numeric())
            .filter("totalPrice", filters::round_decimals(2))
            .validate("status", validators::required())
            .validate(
                "status",
                validators::in_list(vec![STATUS_DRAFT.to_string(), STATUS_PUBLISHED.to_string()]),
            )
            .validate("totalPrice", validators::non_negative())
    }

    /// Normalize a payload before it is sent to the backend
    ///
    /// Top-level fields go through [`Self::validation_config`] and every
    /// option group is validated and written back in nested form.
    pub fn prepare_payload(payload: Value) -> Result<Value> {
        let normalized = Self::validation_config().validate_and_filter("", payload)?;
        let schema = OptionSchema::from_value(&normalized)?;

        let (Value::Object(mut object), Value::Object(groups)) = (normalized, schema.to_nested_value())
        else {
            return Err(ListviewError::internal("visiting card payload is not a JSON object"));
        };
        for (key, value) in groups {
            object.insert(key, value);
        }
        Ok(Value::Object(object))
    }
}

/// Published and draft counts of a product list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub published: usize,
    pub draft: usize,
}

impl StatusSummary {
    pub fn of(cards: &[VisitingCard]) -> Self {
        cards.iter().fold(Self::default(), |mut summary, card| {
            match card.status.as_deref() {
                Some(STATUS_PUBLISHED) => summary.published += 1,
                Some(STATUS_DRAFT) => summary.draft += 1,
                _ => {}
            }
            summary
        })
    }
}

impl Record for VisitingCard {
    fn resource_name() -> &'static str {
        "visiting_cards"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn price(&self) -> Option<f64> {
        self.total_price
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["category", "product_name", "status", "sub_category"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "category" => text(self.category()),
            "sub_category" => text(self.sub_category()),
            "product_name" => text(self.product_name()),
            "status" => text(self.status.as_deref()),
            _ => self.common_field(field),
        }
    }
}

impl CsvExport for VisitingCard {
    fn csv_headers() -> Vec<&'static str> {
        vec![
            "ID",
            "Product Name",
            "Category",
            "Sub Category",
            "Status",
            "Base Price",
            "Total With Extras",
            "Created Date",
        ]
    }

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            cell(self.product_name()),
            cell(self.category()),
            cell(self.sub_category()),
            cell(self.status.as_deref()),
            number_cell(self.total_price),
            number_cell(Some(self.calculate_total())),
            date_cell(self.created_at),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::apply_filters;
    use crate::core::error::ListviewError;
    use crate::core::query::FilterCriteria;
    use serde_json::json;

    fn card() -> VisitingCard {
        serde_json::from_value(json!({
            "_id": "v1",
            "category": {"values": "Business"},
            "subCategory": {"values": "Premium"},
            "productName": {"values": "Matte Classic"},
            "status": "published",
            "totalPrice": "250",
            "quantity": {"isEnabled": true, "values": ["500", 100, 100, 0]},
            "designFile": {"isEnabled": true, "price": 50},
            "specialNotes": {"isEnabled": false, "price": 30, "value": "Rush"},
            "cardSizeMultiplier": {"isEnabled": true, "value": 2, "price": 20},
            "printingType": {
                "isEnabled": true,
                "options": [{"label": "Single Side", "price": 0}, {"label": "Double Side", "price": 40}]
            },
            "features": {
                "roundCorners": {"isEnabled": false, "options": "[{\"label\":\"Yes\",\"price\":15}]"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_calculate_total() {
        assert_eq!(card().calculate_total(), 320.0);

        let mut bare = card();
        bare.total_price = None;
        bare.design_file = None;
        bare.card_size_multiplier = None;
        assert_eq!(bare.calculate_total(), 0.0);
    }

    #[test]
    fn test_quantity_tiers() {
        let mut card = card();
        assert_eq!(card.quantity_tiers(), &[100, 500]);

        if let Some(setting) = card.quantity.as_mut() {
            setting.is_enabled = false;
        }
        assert!(card.quantity_tiers().is_empty());
    }

    #[test]
    fn test_option_schema_from_extra() {
        let schema = card().option_schema().unwrap();

        let names: Vec<_> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["printingType", "features.roundCorners"]);
        assert_eq!(schema.price_of("printingType", "Double Side"), Some(40.0));
        assert_eq!(schema.enabled_groups().count(), 1);
    }

    #[test]
    fn test_status_summary() {
        let mut draft = card();
        draft.status = Some("draft".to_string());
        let mut unknown = card();
        unknown.status = None;

        let summary = StatusSummary::of(&[card(), draft, unknown]);
        assert_eq!(summary, StatusSummary { published: 1, draft: 1 });
    }

    #[test]
    fn test_search_covers_nested_text() {
        let mut other = card();
        other.id = "v2".to_string();
        other.product_name = Some(TextValue {
            values: Some("Glossy".to_string()),
        });
        other.status = Some("draft".to_string());

        let found = apply_filters(vec![card(), other.clone()], &FilterCriteria::default().with_search("gloss"));
        assert_eq!(found, vec![other.clone()]);

        let found = apply_filters(vec![card(), other], &FilterCriteria::default().with_exact("status", "published"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "v1");
    }

    #[test]
    fn test_prepare_payload_normalizes() {
        let payload = json!({
            "status": " Published ",
            "totalPrice": "99.999",
            "laminationType": {"isEnabled": true, "options": "[{\"label\":\" Gloss \",\"price\":\"12.346\"}]"}
        });

        let prepared = VisitingCard::prepare_payload(payload).unwrap();
        assert_eq!(prepared["status"], json!("published"));
        assert_eq!(prepared["totalPrice"], json!(100.0));
        assert_eq!(
            prepared["laminationType"],
            json!({"isEnabled": true, "options": [{"label": "Gloss", "price": 12.35}]})
        );
    }

    #[test]
    fn test_prepare_payload_rejects_bad_status_and_options() {
        let err = VisitingCard::prepare_payload(json!({"status": "archived"})).unwrap_err();
        assert!(matches!(err, ListviewError::Validation(_)));

        let err = VisitingCard::prepare_payload(json!({
            "status": "draft",
            "gsm": {"options": [{"label": "", "price": -1}]}
        }))
        .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_prepare_payload_never_yields_null_body() {
        for payload in [Value::Null, json!(["draft"]), json!("published")] {
            assert!(VisitingCard::prepare_payload(payload).is_err());
        }

        let prepared = VisitingCard::prepare_payload(json!({"status": "draft"})).unwrap();
        assert!(prepared.is_object());
    }
}
