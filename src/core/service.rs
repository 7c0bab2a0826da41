//! Service trait for remote record collections

use crate::core::error::Result;
use crate::core::record::Record;
use async_trait::async_trait;
use serde_json::Value;

/// Result of a create or update call
///
/// Some endpoints echo the stored record back, others only confirm the
/// write. Views re-fetch either way, so both are success.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<T> {
    /// The backend returned the stored record
    Record(T),
    /// The backend confirmed the write without a record
    Acknowledged,
}

impl<T> Mutation<T> {
    pub fn into_record(self) -> Option<T> {
        match self {
            Mutation::Record(record) => Some(record),
            Mutation::Acknowledged => None,
        }
    }
}

/// Service trait for a collection of records of one type
///
/// Implementations talk to a backend (or hold records in memory). The list
/// engine never calls these; the view controller does.
#[async_trait]
pub trait CollectionService<T: Record>: Send + Sync {
    /// Fetch the whole collection
    async fn list(&self) -> Result<Vec<T>>;

    /// Fetch one record, `None` when the backend does not know the id
    async fn get(&self, id: &str) -> Result<Option<T>>;

    /// Create a record from a raw payload
    async fn create(&self, payload: Value) -> Result<Mutation<T>>;

    /// Update a record from a raw (possibly partial) payload
    async fn update(&self, id: &str, payload: Value) -> Result<Mutation<T>>;

    /// Delete a record
    async fn delete(&self, id: &str) -> Result<()>;
}
