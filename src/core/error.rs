//! Typed error handling for listview
//!
//! Errors are grouped by category so callers can react to the failure kind
//! rather than to a message string.
//!
//! # Error Categories
//!
//! - [`FetchError`]: network failures, non-2xx responses, rejected envelopes
//! - [`ParseError`]: malformed encodings found inside otherwise valid payloads
//! - [`ValidationError`]: values rejected at the options boundary
//! - [`ConfigError`]: configuration loading and validation
//! - `Export` and `Internal`: CSV writer failures and poisoned locks
//!
//! # Example
//!
//! ```rust,ignore
//! match controller.refresh().await {
//!     Ok(_) => {}
//!     Err(ListviewError::Fetch(FetchError::Status { status, .. })) if status == 404 => {
//!         println!("collection endpoint is gone");
//!     }
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T, E = ListviewError> = std::result::Result<T, E>;

/// The main error type for listview
#[derive(Debug, Error)]
pub enum ListviewError {
    /// Network or backend failures
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Malformed encodings inside a payload
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Rejected input values
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing an export failed
    #[error("Export failed: {0}")]
    Export(String),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ListviewError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ListviewError::Fetch(e) => e.error_code(),
            ListviewError::Parse(_) => "PARSE_ERROR",
            ListviewError::Validation(_) => "VALIDATION_ERROR",
            ListviewError::Config(_) => "CONFIG_ERROR",
            ListviewError::Export(_) => "EXPORT_ERROR",
            ListviewError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the user can fix this by retrying the same action
    pub fn is_retryable(&self) -> bool {
        matches!(self, ListviewError::Fetch(e) if e.is_retryable())
    }

    /// Create an internal error from any displayable value
    pub fn internal(message: impl std::fmt::Display) -> Self {
        ListviewError::Internal(message.to_string())
    }
}

// =============================================================================
// Fetch Errors
// =============================================================================

/// Errors raised while talking to the backend
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response
    #[error("{method} {url} failed: {message}")]
    Transport {
        method: String,
        url: String,
        message: String,
    },

    /// The backend answered with a non-success status
    #[error("{method} {url} returned status {status}: {message}")]
    Status {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    /// The envelope carried `success: false`
    #[error("{url} rejected the request: {message}")]
    Rejected { url: String, message: String },

    /// The body could not be decoded into the expected shape
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// A mutation targeted a record the backend does not know
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: String, id: String },
}

impl FetchError {
    pub fn error_code(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "FETCH_TRANSPORT",
            FetchError::Status { .. } => "FETCH_STATUS",
            FetchError::Rejected { .. } => "FETCH_REJECTED",
            FetchError::Decode { .. } => "FETCH_DECODE",
            FetchError::NotFound { .. } => "FETCH_NOT_FOUND",
        }
    }

    /// HTTP status, when the backend produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport { .. } => true,
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
            FetchError::Rejected { .. } | FetchError::Decode { .. } => false,
            FetchError::NotFound { .. } => false,
        }
    }
}

// =============================================================================
// Parse Errors
// =============================================================================

/// Errors raised by malformed values nested inside a payload
#[derive(Debug, Error)]
pub enum ParseError {
    /// A JSON-string encoded option list could not be parsed
    #[error("Option field '{field}' is not a valid option list: {message}")]
    OptionField { field: String, message: String },

    /// A value could not be read as a date
    #[error("'{value}' is not a valid date (expected YYYY-MM-DD)")]
    Date { value: String },

    /// A sort expression could not be understood
    #[error("Invalid sort expression '{value}'")]
    Sort { value: String },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Field-level validation failure
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Errors raised when values are rejected at a boundary
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A single field failed validation
    #[error("Validation failed for '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Several fields failed validation
    #[error("Validation failed for {} field(s)", .0.len())]
    FieldErrors(Vec<FieldError>),
}

impl ValidationError {
    /// Collapse a list of field errors into the most specific variant
    pub fn from_errors(mut errors: Vec<FieldError>) -> Self {
        if errors.len() == 1 {
            let FieldError { field, message } = errors.remove(0);
            ValidationError::FieldError { field, message }
        } else {
            ValidationError::FieldErrors(errors)
        }
    }

    /// All field errors carried by this error
    pub fn fields(&self) -> Vec<FieldError> {
        match self {
            ValidationError::FieldError { field, message } => vec![FieldError {
                field: field.clone(),
                message: message.clone(),
            }],
            ValidationError::FieldErrors(errors) => errors.clone(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file '{path}': {message}")]
    Io { path: String, message: String },

    /// The YAML document is malformed
    #[error("Failed to parse config: {0}")]
    Yaml(String),

    /// A value is present but unusable
    #[error("Invalid config value for '{field}': {message}")]
    Invalid { field: String, message: String },

    /// An operation needs an endpoint the collection does not declare
    #[error("Collection '{collection}' has no '{operation}' endpoint")]
    MissingEndpoint {
        collection: String,
        operation: String,
    },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err.to_string())
    }
}
