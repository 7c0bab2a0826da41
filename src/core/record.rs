//! Record trait defining the core abstraction for every listed resource

use crate::core::field::{FieldKind, FieldValue};
use chrono::{DateTime, Utc};

/// Logical name of the price field, usable in sort specs
pub const PRICE_FIELD: &str = "price";

/// Logical name of the creation timestamp field, usable in sort specs
pub const CREATED_AT_FIELD: &str = "created_at";

/// Logical name of the record identifier field
pub const ID_FIELD: &str = "id";

/// Base trait for every record shown in a list view.
///
/// A record has:
/// - id: stable identifier assigned by the backend
/// - created_at: creation timestamp, when the backend sent a parsable one
/// - price: monetary value, absent for resources that are not priced
/// - related ids: identifiers of nested entities (the user who placed an
///   order, the product a card was made from)
/// - dynamic field access used by search, exact-match filters and sorting
pub trait Record: Clone + Send + Sync + 'static {
    /// The plural resource name (e.g., "orders", "customers")
    fn resource_name() -> &'static str;

    // === Core Record Fields ===

    /// Get the unique identifier for this record
    fn id(&self) -> &str;

    /// Get the creation timestamp
    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// Get the price. Absent prices count as 0 in filters and stats.
    fn price(&self) -> Option<f64> {
        None
    }

    /// Get the id of a related entity (e.g. "user", "product")
    fn related_id(&self, _relation: &str) -> Option<&str> {
        None
    }

    /// Relations whose distinct ids are counted in derived stats
    fn relations() -> &'static [&'static str] {
        &[]
    }

    // === Search & Sort Metadata ===

    /// Fields matched by the free-text search
    fn searchable_fields() -> &'static [&'static str];

    /// Get the value of a logical field by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// How a field compares when sorting
    ///
    /// Override for record types that expose extra numeric or date fields.
    fn field_kind(field: &str) -> FieldKind {
        match field {
            PRICE_FIELD => FieldKind::Number,
            CREATED_AT_FIELD => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }

    // === Utility Methods ===

    /// Price with the absent value replaced by 0
    fn price_or_zero(&self) -> f64 {
        self.price().unwrap_or(0.0)
    }

    /// Shared lookup for the fields every record has
    ///
    /// Implementations call this from `field_value` as their fallback arm.
    fn common_field(&self, field: &str) -> Option<FieldValue> {
        match field {
            ID_FIELD => Some(FieldValue::String(self.id().to_string())),
            PRICE_FIELD => self.price().map(FieldValue::Number),
            CREATED_AT_FIELD => self.created_at().map(FieldValue::DateTime),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A small record type shared by the engine, stats and view tests

    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone, PartialEq)]
    pub struct TestRecord {
        pub id: String,
        pub name: Option<String>,
        pub email: Option<String>,
        pub user_id: Option<String>,
        pub price: Option<f64>,
        pub created_at: Option<DateTime<Utc>>,
    }

    impl TestRecord {
        pub fn new(id: &str) -> Self {
            Self {
                id: id.to_string(),
                name: None,
                email: None,
                user_id: None,
                price: None,
                created_at: None,
            }
        }

        pub fn named(mut self, name: &str, email: &str) -> Self {
            self.name = Some(name.to_string());
            self.email = Some(email.to_string());
            self
        }

        pub fn priced(mut self, price: f64) -> Self {
            self.price = Some(price);
            self
        }

        pub fn by_user(mut self, user_id: &str) -> Self {
            self.user_id = Some(user_id.to_string());
            self
        }

        pub fn created(mut self, rfc3339: &str) -> Self {
            self.created_at = Some(
                DateTime::parse_from_rfc3339(rfc3339)
                    .expect("valid timestamp")
                    .with_timezone(&Utc),
            );
            self
        }

        pub fn created_ymd(mut self, y: i32, m: u32, d: u32) -> Self {
            self.created_at = Some(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap());
            self
        }
    }

    impl Record for TestRecord {
        fn resource_name() -> &'static str {
            "tests"
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn created_at(&self) -> Option<DateTime<Utc>> {
            self.created_at
        }

        fn price(&self) -> Option<f64> {
            self.price
        }

        fn related_id(&self, relation: &str) -> Option<&str> {
            match relation {
                "user" => self.user_id.as_deref(),
                _ => None,
            }
        }

        fn relations() -> &'static [&'static str] {
            &["user"]
        }

        fn searchable_fields() -> &'static [&'static str] {
            &["name", "email", "id"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "name" | "user" => self.name.clone().map(FieldValue::String),
                "email" => self.email.clone().map(FieldValue::String),
                _ => self.common_field(field),
            }
        }
    }
}
