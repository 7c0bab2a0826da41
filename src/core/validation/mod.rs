//! Validation and filtering system
//!
//! Declarative per-field rules applied to JSON payloads at the boundary
//! where loosely typed backend or form data becomes typed records. Filters
//! normalize a value first, then validators check it.

pub mod config;
pub mod filters;
pub mod validators;

pub use config::ValidationConfig;
