//! Record types served by the console backend
//!
//! Field names follow the backend's JSON. Nested references are decoded
//! leniently: a reference that arrives in an unexpected shape becomes
//! `None` rather than failing the whole list.

pub mod content;
pub mod customer;
pub mod order;
pub mod user_card;
pub mod visiting_card;

pub use content::{Banner, ContactSubmission, Faq, Review};
pub use customer::Customer;
pub use order::Order;
pub use user_card::{PriceBreakdown, PriceItem, SelectedOption, SelectedOptions, UserCard};
pub use visiting_card::{StatusSummary, Surcharge, VisitingCard};

use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};

/// A user embedded in another record (`userId` on orders and cards)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A catalog text field stored as `{ "values": "..." }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    #[serde(default)]
    pub values: Option<String>,
}

impl TextValue {
    pub fn as_str(&self) -> Option<&str> {
        self.values.as_deref().filter(|v| !v.is_empty())
    }
}

/// Text field value of an optional string
pub(crate) fn text(value: Option<&str>) -> Option<FieldValue> {
    value.map(|v| FieldValue::String(v.to_string()))
}

/// CSV cell for an optional string
pub(crate) fn cell(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(crate::export::MISSING)
        .to_string()
}
