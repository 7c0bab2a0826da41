//! Storefront content managed from the console: reviews, banners, FAQs and
//! contact form submissions

use crate::core::field::{FieldKind, FieldValue};
use crate::core::record::Record;
use crate::export::{CsvExport, date_cell, number_cell};
use crate::resources::{cell, text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest star rating a review can carry
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub comment: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Whole stars to display, clamped to `0..=MAX_RATING`
    pub fn stars(&self) -> u8 {
        let rating = self.rating.unwrap_or(0.0).round();
        rating.clamp(0.0, f64::from(MAX_RATING)) as u8
    }
}

/// Mean rating of the reviews that carry one
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    let ratings: Vec<f64> = reviews.iter().filter_map(|r| r.rating).collect();
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

impl Record for Review {
    fn resource_name() -> &'static str {
        "reviews"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["name", "comment"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" => text(self.name.as_deref()),
            "comment" => text(self.comment.as_deref()),
            "rating" => self.rating.map(FieldValue::Number),
            _ => self.common_field(field),
        }
    }

    fn field_kind(field: &str) -> FieldKind {
        match field {
            "rating" => FieldKind::Number,
            "created_at" => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }
}

impl CsvExport for Review {
    fn csv_headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Rating", "Comment", "Created Date"]
    }

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            cell(self.name.as_deref()),
            number_cell(self.rating),
            cell(self.comment.as_deref()),
            date_cell(self.created_at),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub content: Option<String>,
    /// Stored file names, relative to the banner upload directory
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_vec")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Banner {
    /// Public URL of the first image, used as the banner thumbnail
    pub fn cover_url(&self, upload_base: &str) -> Option<String> {
        let first = self.images.first()?;
        Some(format!("{}/{}", upload_base.trim_end_matches('/'), first))
    }
}

impl Record for Banner {
    fn resource_name() -> &'static str {
        "banners"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["title", "name", "content"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "title" => text(self.title.as_deref()),
            "name" => text(self.name.as_deref()),
            "content" => text(self.content.as_deref()),
            _ => self.common_field(field),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub answer: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::core::lenient::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Faq {
    fn resource_name() -> &'static str {
        "faqs"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["question", "answer"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "question" => text(self.question.as_deref()),
            "answer" => text(self.answer.as_deref()),
            _ => self.common_field(field),
        }
    }
}

impl CsvExport for Faq {
    fn csv_headers() -> Vec<&'static str> {
        vec!["ID", "Question", "Answer"]
    }

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            cell(self.question.as_deref()),
            cell(self.answer.as_deref()),
        ]
    }
}

/// A message left through the storefront contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub email: Option<String>,
    /// Phone number as typed by the visitor
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_text")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ContactSubmission {
    /// First `max` characters of the message, with `...` when cut
    pub fn message_preview(&self, max: usize) -> String {
        let message = self.message.as_deref().unwrap_or_default();
        if message.chars().count() > max {
            let cut: String = message.chars().take(max).collect();
            format!("{cut}...")
        } else {
            message.to_string()
        }
    }
}

impl Record for ContactSubmission {
    fn resource_name() -> &'static str {
        "contact_submissions"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["name", "email", "number", "message"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" => text(self.name.as_deref()),
            "email" => text(self.email.as_deref()),
            "number" => text(self.number.as_deref()),
            "message" => text(self.message.as_deref()),
            _ => self.common_field(field),
        }
    }
}

impl CsvExport for ContactSubmission {
    fn csv_headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Email", "Phone", "Message", "Submitted"]
    }

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            cell(self.name.as_deref()),
            cell(self.email.as_deref()),
            cell(self.number.as_deref()),
            cell(self.message.as_deref()),
            date_cell(self.created_at),
        ]
    }
}
