//! REST implementation of CollectionService backed by `reqwest`
//!
//! The backend wraps payloads in an envelope such as
//! `{ "success": true, "data": [...] }`. The envelope key differs between
//! endpoints and some return the bare list, so both keys are configurable
//! per collection.

use crate::config::{CollectionEndpoints, ConsoleConfig, ID_PLACEHOLDER, UpdateMethod};
use crate::core::error::{ConfigError, FetchError, ListviewError, Result};
use crate::core::record::Record;
use crate::core::service::{CollectionService, Mutation};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// A decoded HTTP response
#[derive(Debug, Clone)]
pub(crate) struct JsonResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Send a request and decode the body as JSON
///
/// Non-success statuses are returned, not raised, so callers can treat 404
/// specially. An empty body decodes to `null`.
pub(crate) async fn send_json(
    client: &reqwest::Client,
    method: Method,
    url: &str,
    body: Option<&Value>,
) -> Result<JsonResponse> {
    tracing::debug!(method = %method, url, "Sending request");

    let mut request = client.request(method.clone(), url);
    if let Some(body) = body {
        request = request.json(body);
    }

    let transport = |e: reqwest::Error| {
        ListviewError::from(FetchError::Transport {
            method: method.to_string(),
            url: url.to_string(),
            message: e.to_string(),
        })
    };

    let response = request.send().await.map_err(transport)?;
    let status = response.status();
    let text = response.text().await.map_err(transport)?;

    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => value,
            Err(_) if !status.is_success() => Value::String(text),
            Err(e) => {
                return Err(FetchError::Decode {
                    url: url.to_string(),
                    message: e.to_string(),
                }
                .into());
            }
        }
    };

    Ok(JsonResponse { status, body })
}

/// Turn a non-success status into a `FetchError::Status`
pub(crate) fn ensure_status(method: &Method, url: &str, response: &JsonResponse) -> Result<()> {
    if response.status.is_success() {
        return Ok(());
    }
    let message = match &response.body {
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
    .unwrap_or_else(|| {
        response
            .status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string()
    });

    Err(FetchError::Status {
        method: method.to_string(),
        url: url.to_string(),
        status: response.status.as_u16(),
        message,
    }
    .into())
}

/// Reject envelopes that carry `success: false`
pub(crate) fn ensure_envelope(url: &str, body: &Value) -> Result<()> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request was not successful")
            .to_string();
        return Err(FetchError::Rejected {
            url: url.to_string(),
            message,
        }
        .into());
    }
    Ok(())
}

fn unwrap_envelope<'a>(body: &'a Value, key: Option<&str>) -> Option<&'a Value> {
    match key {
        Some(key) => body.get(key).filter(|v| !v.is_null()),
        None => (!body.is_null()).then_some(body),
    }
}

/// A remote record collection
#[derive(Debug, Clone)]
pub struct RestCollection<T> {
    client: reqwest::Client,
    base_url: String,
    name: String,
    endpoints: CollectionEndpoints,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record + DeserializeOwned> RestCollection<T> {
    pub fn new(
        base_url: impl Into<String>,
        name: impl Into<String>,
        endpoints: CollectionEndpoints,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            name: name.into(),
            endpoints,
            _marker: PhantomData,
        }
    }

    /// Build the client for a collection declared in `config`
    pub fn from_config(config: &ConsoleConfig, name: &str) -> Result<Self> {
        let endpoints = config.collection(name)?.clone();
        Ok(Self::new(config.api_base_url.clone(), name, endpoints))
    }

    /// Share an existing HTTP client (connection pool, timeouts)
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoints(&self) -> &CollectionEndpoints {
        &self.endpoints
    }

    /// Absolute URL of `path`, with `{id}` substituted
    pub fn url(&self, path: &str, id: Option<&str>) -> String {
        let path = match id {
            Some(id) => path.replace(ID_PLACEHOLDER, id),
            None => path.to_string(),
        };
        if path.starts_with("http://") || path.starts_with("https://") {
            return path;
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn endpoint<'a>(&self, path: &'a Option<String>, operation: &str) -> Result<&'a str> {
        path.as_deref().ok_or_else(|| {
            ConfigError::MissingEndpoint {
                collection: self.name.clone(),
                operation: operation.to_string(),
            }
            .into()
        })
    }

    async fn call(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value> {
        let response = send_json(&self.client, method.clone(), url, body).await?;
        ensure_status(&method, url, &response)?;
        ensure_envelope(url, &response.body)?;
        Ok(response.body)
    }

    fn decode(&self, url: &str, value: Value) -> Result<T> {
        serde_json::from_value(value).map_err(|e| {
            FetchError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn mutation_from(&self, url: &str, body: Value) -> Mutation<T> {
        match unwrap_envelope(&body, self.endpoints.item_key.as_deref()) {
            Some(item @ Value::Object(_)) => match self.decode(url, item.clone()) {
                Ok(record) => Mutation::Record(record),
                Err(e) => {
                    tracing::debug!(url, error = %e, "Mutation response carried no usable record");
                    Mutation::Acknowledged
                }
            },
            _ => Mutation::Acknowledged,
        }
    }

    fn not_found(&self, id: &str) -> ListviewError {
        FetchError::NotFound {
            resource: self.name.clone(),
            id: id.to_string(),
        }
        .into()
    }
}

#[async_trait]
impl<T> CollectionService<T> for RestCollection<T>
where
    T: Record + DeserializeOwned,
{
    async fn list(&self) -> Result<Vec<T>> {
        let url = self.url(&self.endpoints.list, None);
        let body = self.call(Method::GET, &url, None).await?;

        let items = match unwrap_envelope(&body, self.endpoints.list_key.as_deref()) {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items.clone(),
            Some(other) => {
                return Err(FetchError::Decode {
                    url,
                    message: format!("expected a list, got {other}"),
                }
                .into());
            }
        };

        let total = items.len();
        let mut records = Vec::with_capacity(total);
        for item in items {
            match self.decode(&url, item) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(collection = %self.name, error = %e, "Skipping undecodable record"),
            }
        }

        tracing::debug!(
            collection = %self.name,
            received = total,
            decoded = records.len(),
            "Collection fetched"
        );
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        let url = self.url(self.endpoint(&self.endpoints.get, "get")?, Some(id));

        let response = send_json(&self.client, Method::GET, &url, None).await?;
        if response.status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        ensure_status(&Method::GET, &url, &response)?;
        ensure_envelope(&url, &response.body)?;

        match unwrap_envelope(&response.body, self.endpoints.item_key.as_deref()) {
            Some(item) => self.decode(&url, item.clone()).map(Some),
            None => Ok(None),
        }
    }

    async fn create(&self, payload: Value) -> Result<Mutation<T>> {
        let url = self.url(self.endpoint(&self.endpoints.create, "create")?, None);
        let body = self.call(Method::POST, &url, Some(&payload)).await?;
        Ok(self.mutation_from(&url, body))
    }

    async fn update(&self, id: &str, payload: Value) -> Result<Mutation<T>> {
        let url = self.url(self.endpoint(&self.endpoints.update, "update")?, Some(id));
        let method = match self.endpoints.update_method {
            UpdateMethod::Put => Method::PUT,
            UpdateMethod::Patch => Method::PATCH,
        };

        let response = send_json(&self.client, method.clone(), &url, Some(&payload)).await?;
        if response.status == StatusCode::NOT_FOUND {
            return Err(self.not_found(id));
        }
        ensure_status(&method, &url, &response)?;
        ensure_envelope(&url, &response.body)?;
        Ok(self.mutation_from(&url, response.body))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.url(self.endpoint(&self.endpoints.delete, "delete")?, Some(id));

        let response = send_json(&self.client, Method::DELETE, &url, None).await?;
        if response.status == StatusCode::NOT_FOUND {
            return Err(self.not_found(id));
        }
        ensure_status(&Method::DELETE, &url, &response)?;
        ensure_envelope(&url, &response.body)?;
        Ok(())
    }
}
