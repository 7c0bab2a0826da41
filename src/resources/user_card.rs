//! Cards configured by customers from a catalog product
//!
//! A user card records which choice the customer picked in every option
//! group of the product, plus the quoted total.

use crate::core::field::FieldValue;
use crate::core::record::Record;
use crate::export::{CsvExport, MISSING, date_cell, number_cell};
use crate::resources::{TextValue, UserRef, cell, text};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Product name used when the catalog entry has none
pub const CUSTOM_PRODUCT_LABEL: &str = "Custom Card";

/// The catalog product a card was made from (`ProductId`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub product_name: Option<TextValue>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub category: Option<TextValue>,
}

impl ProductRef {
    pub fn name(&self) -> Option<&str> {
        self.product_name.as_ref()?.as_str()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_ref()?.as_str()
    }
}

/// The choice picked in one option group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectedOption {
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub price: Option<f64>,
    /// Free value for groups without labels (the size multiplier)
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedOptions {
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub printing_type: Option<SelectedOption>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub lamination_type: Option<SelectedOption>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub size: Option<SelectedOption>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub demmy_size: Option<SelectedOption>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub card_size_multiplier: Option<SelectedOption>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub board_type: Option<SelectedOption>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub board_thickness: Option<SelectedOption>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub paper_type: Option<SelectedOption>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub gsm: Option<SelectedOption>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub special_options: Option<SelectedOption>,
    /// Feature choices by feature key (`boxPacking`, `roundCorners`, ...)
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_map")]
    pub features: IndexMap<String, SelectedOption>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub quantity: Option<f64>,
}

/// One priced line of a breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceItem {
    pub label: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Items with a price above zero, fixed groups first, then features
    pub items: Vec<PriceItem>,
    pub base_price: f64,
    pub quantity: f64,
    /// `base_price × quantity`
    pub calculated_total: f64,
}

impl SelectedOptions {
    fn priced_groups(&self) -> [(&'static str, Option<&SelectedOption>); 10] {
        [
            ("Printing", self.printing_type.as_ref()),
            ("Lamination", self.lamination_type.as_ref()),
            ("Size", self.size.as_ref()),
            ("Demo Size", self.demmy_size.as_ref()),
            ("Size Multiplier", self.card_size_multiplier.as_ref()),
            ("Board Type", self.board_type.as_ref()),
            ("Board Thickness", self.board_thickness.as_ref()),
            ("Paper Type", self.paper_type.as_ref()),
            ("GSM", self.gsm.as_ref()),
            ("Special Options", self.special_options.as_ref()),
        ]
    }

    /// Price every selection and total it for the ordered quantity
    ///
    /// A missing or zero quantity counts as one card.
    pub fn price_breakdown(&self) -> PriceBreakdown {
        let fixed = self.priced_groups().into_iter().map(|(label, option)| PriceItem {
            label: label.to_string(),
            price: option.and_then(|o| o.price).unwrap_or(0.0),
        });
        let features = self.features.iter().map(|(key, option)| PriceItem {
            label: humanize_key(key),
            price: option.price.unwrap_or(0.0),
        });

        let items: Vec<PriceItem> = fixed.chain(features).filter(|item| item.price > 0.0).collect();
        let base_price = items.iter().map(|item| item.price).sum();
        let quantity = self.quantity.filter(|q| *q > 0.0).unwrap_or(1.0);

        PriceBreakdown {
            items,
            base_price,
            quantity,
            calculated_total: base_price * quantity,
        }
    }

    /// Labels of the chosen features, in backend order
    pub fn feature_labels(&self) -> Vec<&str> {
        self.features
            .values()
            .filter_map(|o| o.label.as_deref())
            .filter(|l| !l.is_empty())
            .collect()
    }
}

/// `roundCorners` -> `Round Corners`
fn humanize_key(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            label.push(' ');
            label.push(c);
        } else {
            label.push(c);
        }
    }
    label
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCard {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(
        rename = "userId",
        default,
        deserialize_with = "crate::core::lenient::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<UserRef>,

    #[serde(
        rename = "ProductId",
        default,
        deserialize_with = "crate::core::lenient::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub product: Option<ProductRef>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub selected_options: Option<SelectedOptions>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub total_price: Option<f64>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserCard {
    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref()?.name.as_deref()
    }

    pub fn user_email(&self) -> Option<&str> {
        self.user.as_ref()?.email.as_deref()
    }

    pub fn product_name(&self) -> Option<&str> {
        self.product.as_ref()?.name()
    }

    pub fn category(&self) -> Option<&str> {
        self.product.as_ref()?.category()
    }

    /// Breakdown of the selected options, `None` when nothing was selected
    pub fn price_breakdown(&self) -> Option<PriceBreakdown> {
        self.selected_options.as_ref().map(SelectedOptions::price_breakdown)
    }
}

impl Record for UserCard {
    fn resource_name() -> &'static str {
        "user_cards"
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

    fn related_id(&self, relation: &str) -> Option<&str> {
        match relation {
            "user" => self.user.as_ref()?.id.as_deref(),
            "product" => self.product.as_ref()?.id.as_deref(),
            _ => None,
        }
    }

    fn relations() -> &'static [&'static str] {
        &["user", "product"]
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["user_name", "user_email", "product_name", "category", "id"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "user" | "user_name" => text(self.user_name()),
            "user_email" => text(self.user_email()),
            "product" | "product_name" => text(self.product_name()),
            "category" => text(self.category()),
            _ => self.common_field(field),
        }
    }
}

impl CsvExport for UserCard {
    fn csv_headers() -> Vec<&'static str> {
        vec![
            "Order ID",
            "User Name",
            "User Email",
            "Product Name",
            "Category",
            "Quantity",
            "Total Price (₹)",
            "Created Date",
            "Printing Type",
            "Lamination Type",
            "Features",
        ]
    }

    fn csv_row(&self) -> Vec<String> {
        let options = self.selected_options.as_ref();
        let label = |o: Option<&SelectedOption>| cell(o.and_then(|o| o.label.as_deref()));
        let features = options.map(|o| o.feature_labels().join(", ")).unwrap_or_default();

        vec![
            self.id.clone(),
            cell(self.user_name()),
            cell(self.user_email()),
            self.product_name().unwrap_or(CUSTOM_PRODUCT_LABEL).to_string(),
            cell(self.category()),
            options
                .and_then(|o| o.quantity)
                .map(|q| number_cell(Some(q)))
                .unwrap_or_else(|| MISSING.to_string()),
            number_cell(self.total_price),
            date_cell(self.created_at),
            label(options.and_then(|o| o.printing_type.as_ref())),
            label(options.and_then(|o| o.lamination_type.as_ref())),
            if features.is_empty() {
                "None".to_string()
            } else {
                features
            },
        ]
    }
}
