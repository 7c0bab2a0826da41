//! Registered customers

use crate::core::field::FieldValue;
use crate::core::record::Record;
use crate::export::{CsvExport, date_cell};
use crate::resources::{cell, text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient_text")]
    pub mobile: Option<String>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A saved delivery address of a customer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub addressline1: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_text")]
    pub pincode: Option<String>,
}

impl Address {
    /// `line, city, state - pincode`, skipping the parts that are missing
    pub fn one_line(&self) -> String {
        let head: Vec<&str> = [&self.addressline1, &self.city, &self.state]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();
        let head = head.join(", ");
        match self.pincode.as_deref() {
            Some(pin) if !pin.is_empty() && !head.is_empty() => format!("{head} - {pin}"),
            Some(pin) if !pin.is_empty() => pin.to_string(),
            _ => head,
        }
    }
}

impl Record for Customer {
    fn resource_name() -> &'static str {
        "customers"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["name", "email", "mobile", "location"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" => text(self.name.as_deref()),
            "email" => text(self.email.as_deref()),
            "mobile" => text(self.mobile.as_deref()),
            "location" => text(self.location.as_deref()),
            _ => self.common_field(field),
        }
    }
}

impl CsvExport for Customer {
    fn csv_headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Email", "Mobile", "Location", "Joined"]
    }

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            cell(self.name.as_deref()),
            cell(self.email.as_deref()),
            cell(self.mobile.as_deref()),
            cell(self.location.as_deref()),
            date_cell(self.created_at),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::apply_filters;
    use crate::core::query::FilterCriteria;
    use crate::core::stats::compute_stats;
    use serde_json::json;

    fn customers() -> Vec<Customer> {
        serde_json::from_value(json!([
            {"_id": "u1", "name": "Alice", "email": "alice@example.com", "mobile": "9876500001", "location": "Pune"},
            {"_id": "u2", "name": "Bob", "email": "bob@example.com", "mobile": 9876500002_u64, "location": "Delhi"},
            {"_id": "u3", "name": "Carol", "email": "carol@sample.org", "location": "Alibag"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_search_all_fields() {
        let found = apply_filters(customers(), &FilterCriteria::default().with_search("ali"));
        let ids: Vec<_> = found.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u3"]);
    }

    #[test]
    fn test_search_single_field() {
        let criteria = FilterCriteria::default()
            .with_search("ali")
            .with_search_field("name");
        let found = apply_filters(customers(), &criteria);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "u1");
    }

    #[test]
    fn test_numeric_mobile_is_searchable() {
        let customers = customers();
        assert_eq!(customers[1].mobile.as_deref(), Some("9876500002"));

        let criteria = FilterCriteria::default()
            .with_search("00002")
            .with_search_field("mobile");
        let found = apply_filters(customers.clone(), &criteria);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "u2");
        assert_eq!(found[0].csv_row()[3], "9876500002");
    }

    #[test]
    fn test_numeric_pincode() {
        let address: Address =
            serde_json::from_value(json!({"city": "Pune", "pincode": 411001})).unwrap();
        assert_eq!(address.one_line(), "Pune - 411001");
    }

    #[test]
    fn test_stats_without_price() {
        let stats = compute_stats(&customers());
        assert_eq!(stats.count, 3);
        assert_eq!(stats.total_value, 0.0);
        assert!(stats.distinct_related.is_empty());
    }

    #[test]
    fn test_address_line() {
        let address: Address = serde_json::from_value(json!({
            "_id": "a1",
            "addressline1": "12 MG Road",
            "city": "Pune",
            "state": "MH",
            "pincode": "411001"
        }))
        .unwrap();
        assert_eq!(address.one_line(), "12 MG Road, Pune, MH - 411001");
        assert_eq!(Address::default().one_line(), "");
    }

    #[test]
    fn test_csv_row() {
        let row = customers()[2].csv_row();
        assert_eq!(row, vec!["u3", "Carol", "carol@sample.org", "N/A", "Alibag", "N/A"]);
    }
}
