//! Configuration loading and management

use crate::core::error::{ConfigError, Result};
use crate::core::query::{DEFAULT_PAGE_SIZE, PAGE_SIZES};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placeholder replaced by the record id in endpoint paths
pub const ID_PLACEHOLDER: &str = "{id}";

/// HTTP method used for updates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpdateMethod {
    #[default]
    Put,
    Patch,
}

/// Endpoints of one REST collection
///
/// Paths are relative to `api_base_url` unless they start with `http`.
/// `{id}` is replaced by the record id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEndpoints {
    /// Path returning the whole collection
    pub list: String,

    #[serde(default)]
    pub get: Option<String>,

    #[serde(default)]
    pub create: Option<String>,

    #[serde(default)]
    pub update: Option<String>,

    #[serde(default)]
    pub update_method: UpdateMethod,

    #[serde(default)]
    pub delete: Option<String>,

    /// Envelope key holding the list; `None` when the body is the list itself
    #[serde(default = "default_envelope_key")]
    pub list_key: Option<String>,

    /// Envelope key holding a single record; `None` when the body is the record
    #[serde(default = "default_envelope_key")]
    pub item_key: Option<String>,
}

fn default_envelope_key() -> Option<String> {
    Some("data".to_string())
}

impl CollectionEndpoints {
    /// A collection with only a list endpoint and the default `data` envelope
    pub fn list_only(list: impl Into<String>) -> Self {
        Self {
            list: list.into(),
            get: None,
            create: None,
            update: None,
            update_method: UpdateMethod::Put,
            delete: None,
            list_key: default_envelope_key(),
            item_key: default_envelope_key(),
        }
    }

    pub fn with_get(mut self, path: impl Into<String>) -> Self {
        self.get = Some(path.into());
        self
    }

    pub fn with_create(mut self, path: impl Into<String>) -> Self {
        self.create = Some(path.into());
        self
    }

    pub fn with_update(mut self, path: impl Into<String>, method: UpdateMethod) -> Self {
        self.update = Some(path.into());
        self.update_method = method;
        self
    }

    pub fn with_delete(mut self, path: impl Into<String>) -> Self {
        self.delete = Some(path.into());
        self
    }

    pub fn with_list_key(mut self, key: Option<&str>) -> Self {
        self.list_key = key.map(str::to_string);
        self
    }

    pub fn with_item_key(mut self, key: Option<&str>) -> Self {
        self.item_key = key.map(str::to_string);
        self
    }
}

/// Complete configuration of the console client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the REST backend
    pub api_base_url: String,

    /// Base URL of the analytics backend
    #[serde(default)]
    pub analytics_base_url: Option<String>,

    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    #[serde(default = "default_page_sizes")]
    pub page_sizes: Vec<usize>,

    /// Collections by name (e.g. "orders", "faqs")
    #[serde(default)]
    pub collections: IndexMap<String, CollectionEndpoints>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_page_sizes() -> Vec<usize> {
    PAGE_SIZES.to_vec()
}

impl ConsoleConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no view can work with
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(invalid("api_base_url", "must not be empty"));
        }
        if self.default_page_size == 0 {
            return Err(invalid("default_page_size", "must be at least 1"));
        }
        if self.page_sizes.contains(&0) {
            return Err(invalid("page_sizes", "must not contain 0"));
        }
        for (name, endpoints) in &self.collections {
            if endpoints.list.trim().is_empty() {
                return Err(invalid(
                    &format!("collections.{name}.list"),
                    "must not be empty",
                ));
            }
        }
        Ok(())
    }

    /// Endpoints of a named collection
    pub fn collection(&self, name: &str) -> Result<&CollectionEndpoints> {
        self.collections.get(name).ok_or_else(|| {
            invalid(&format!("collections.{name}"), "collection is not configured")
        })
    }

    /// Configuration matching the production console
    pub fn default_config() -> Self {
        let collections = IndexMap::from([
            (
                "orders".to_string(),
                CollectionEndpoints::list_only("/api/users/getall-orders"),
            ),
            (
                "user_cards".to_string(),
                CollectionEndpoints::list_only("/api/user-cards")
                    .with_get("/api/user/card/{id}")
                    .with_delete("/api/user/card/delete/{id}"),
            ),
            (
                "customers".to_string(),
                CollectionEndpoints::list_only("/api/users/getallusers")
                    .with_get("/api/users/user/{id}")
                    .with_delete("/api/users/deleteuser/{id}")
                    .with_list_key(Some("users"))
                    .with_item_key(Some("user")),
            ),
            (
                "visiting_cards".to_string(),
                CollectionEndpoints::list_only("/api/all")
                    .with_create("/api/create-visitingcard")
                    .with_update("/api/update/{id}", UpdateMethod::Patch)
                    .with_delete("/api/delete/{id}"),
            ),
            (
                "reviews".to_string(),
                CollectionEndpoints::list_only("/api/reviews/allreviews")
                    .with_create("/api/reviews/create-review")
                    .with_update("/api/reviews/updatereview/{id}", UpdateMethod::Put)
                    .with_delete("/api/reviews/deletereview/{id}")
                    .with_list_key(None)
                    .with_item_key(None),
            ),
            (
                "banners".to_string(),
                CollectionEndpoints::list_only("/api/banners/getallbanners")
                    .with_get("/api/banners/banner/{id}")
                    .with_create("/api/banners/create")
                    .with_update("/api/banners/updatebanner/{id}", UpdateMethod::Put)
                    .with_delete("/api/banners/deletebanner/{id}")
                    .with_list_key(Some("banners"))
                    .with_item_key(Some("banner")),
            ),
            (
                "faqs".to_string(),
                CollectionEndpoints::list_only("/api/admin/getallfaqs")
                    .with_create("/api/admin/createfaq")
                    .with_update("/api/admin/updatefaq/{id}", UpdateMethod::Put)
                    .with_delete("/api/admin/deletefaq/{id}"),
            ),
            (
                "contact_submissions".to_string(),
                CollectionEndpoints::list_only("/api/contactus/submissions")
                    .with_delete("/api/contactus/submissions/{id}"),
            ),
        ]);

        Self {
            api_base_url: "http://31.97.206.144:9124".to_string(),
            analytics_base_url: Some("http://194.164.148.237:5002".to_string()),
            default_page_size: DEFAULT_PAGE_SIZE,
            page_sizes: default_page_sizes(),
            collections,
        }
    }
}

fn invalid(field: &str, message: &str) -> crate::core::error::ListviewError {
    ConfigError::Invalid {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}
