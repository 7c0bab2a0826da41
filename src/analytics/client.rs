//! HTTP client for the analytics backend

use crate::analytics::calendar::{DailyDetails, WeekRange, WeeklyStats};
use crate::config::ConsoleConfig;
use crate::core::error::{ConfigError, FetchError, Result};
use crate::storage::rest::{ensure_envelope, ensure_status, send_json};
use chrono::NaiveDate;
use reqwest::{Method, StatusCode};
use serde_json::Value;

const WEEKLY_PATH: &str = "/api/analytics";
const DAILY_PATH: &str = "/api/date";

#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalyticsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build from the `analytics_base_url` of `config`
    pub fn from_config(config: &ConsoleConfig) -> Result<Self> {
        let base_url = config.analytics_base_url.as_deref().ok_or_else(|| ConfigError::MissingEndpoint {
            collection: "analytics".to_string(),
            operation: "base_url".to_string(),
        })?;
        Ok(Self::new(base_url))
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn weekly_url(&self, week: &WeekRange) -> String {
        format!("{}{}?{}", self.base_url, WEEKLY_PATH, week.query_string())
    }

    pub fn daily_url(&self, day: NaiveDate) -> String {
        format!("{}{}/{}", self.base_url, DAILY_PATH, day.format("%Y-%m-%d"))
    }

    /// Per-day activity of `week`
    pub async fn weekly(&self, week: &WeekRange) -> Result<WeeklyStats> {
        let url = self.weekly_url(week);
        let response = send_json(&self.client, Method::GET, &url, None).await?;
        ensure_status(&Method::GET, &url, &response)?;
        ensure_envelope(&url, &response.body)?;

        let stats = match response.body.get("data") {
            None | Some(Value::Null) => WeeklyStats::default(),
            Some(entries) => WeeklyStats::from_entries(entries)?,
        };

        tracing::debug!(url = %url, days = stats.len(), "Weekly analytics fetched");
        Ok(stats)
    }

    /// Detailed activity of `day`, `None` when the backend has no record of it
    pub async fn daily(&self, day: NaiveDate) -> Result<Option<DailyDetails>> {
        let url = self.daily_url(day);
        let response = send_json(&self.client, Method::GET, &url, None).await?;
        if response.status == StatusCode::NOT_FOUND {
            tracing::debug!(url = %url, "No analytics for day");
            return Ok(None);
        }
        ensure_status(&Method::GET, &url, &response)?;
        ensure_envelope(&url, &response.body)?;

        serde_json::from_value(response.body)
            .map(Some)
            .map_err(|e| {
                FetchError::Decode {
                    url,
                    message: e.to_string(),
                }
                .into()
            })
    }
}
