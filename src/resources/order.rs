//! Orders placed by customers

use crate::core::field::{FieldKind, FieldValue};
use crate::core::record::Record;
use crate::export::{CsvExport, date_cell, number_cell};
use crate::resources::{UserRef, cell, text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub order_id: Option<String>,

    #[serde(
        rename = "userId",
        default,
        deserialize_with = "crate::core::lenient::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<UserRef>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub product_name: Option<String>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub product_category: Option<String>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub printing_type: Option<String>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub quantity: Option<f64>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub total_price: Option<f64>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub order_status: Option<String>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub payment_status: Option<String>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient_vec")]
    pub images: Vec<String>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub design_file: Option<String>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref()?.name.as_deref()
    }

    pub fn user_email(&self) -> Option<&str> {
        self.user.as_ref()?.email.as_deref()
    }
}

impl Record for Order {
    fn resource_name() -> &'static str {
        "orders"
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
            _ => None,
        }
    }

    fn relations() -> &'static [&'static str] {
        &["user"]
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["order_id", "user_name", "user_email"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "order_id" => text(self.order_id.as_deref()),
            "user" | "user_name" => text(self.user_name()),
            "user_email" => text(self.user_email()),
            "product_name" => text(self.product_name.as_deref()),
            "product_category" => text(self.product_category.as_deref()),
            "printing_type" => text(self.printing_type.as_deref()),
            "order_status" => text(self.order_status.as_deref()),
            "payment_status" => text(self.payment_status.as_deref()),
            "quantity" => self.quantity.map(FieldValue::Number),
            _ => self.common_field(field),
        }
    }

    fn field_kind(field: &str) -> FieldKind {
        match field {
            "quantity" | "price" => FieldKind::Number,
            "created_at" => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }
}

impl CsvExport for Order {
    fn csv_headers() -> Vec<&'static str> {
        vec![
            "Order ID",
            "Customer",
            "Email",
            "Product",
            "Quantity",
            "Total Price",
            "Order Status",
            "Payment Status",
            "Created Date",
        ]
    }

    fn csv_row(&self) -> Vec<String> {
        vec![
            cell(self.order_id.as_deref()),
            cell(self.user_name()),
            cell(self.user_email()),
            cell(self.product_name.as_deref()),
            number_cell(self.quantity),
            number_cell(self.total_price),
            cell(self.order_status.as_deref()),
            cell(self.payment_status.as_deref()),
            date_cell(self.created_at),
        ]
    }
}
