//! In-memory implementation of CollectionService for testing and development

use crate::core::error::{FetchError, ListviewError, Result};
use crate::core::record::Record;
use crate::core::service::{CollectionService, Mutation};
use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// JSON key of the record identifier, as the backend sends it
pub const ID_KEY: &str = "_id";

/// JSON key of the creation timestamp, as the backend sends it
pub const CREATED_AT_KEY: &str = "createdAt";

/// In-memory collection
///
/// Behaves like the REST backend: ids and creation timestamps are assigned
/// on create, updates merge the payload's top-level keys into the stored
/// record, and records list in insertion order. Uses RwLock for thread-safe
/// access.
#[derive(Clone)]
pub struct InMemoryCollection<T: Record> {
    records: Arc<RwLock<IndexMap<String, T>>>,
}

impl<T: Record> InMemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Seed the collection with existing records
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let map = records
            .into_iter()
            .map(|r| (r.id().to_string(), r))
            .collect();
        Self {
            records: Arc::new(RwLock::new(map)),
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, IndexMap<String, T>>> {
        self.records
            .read()
            .map_err(|e| ListviewError::internal(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, IndexMap<String, T>>> {
        self.records
            .write()
            .map_err(|e| ListviewError::internal(format!("Failed to acquire write lock: {}", e)))
    }

    fn not_found(id: &str) -> ListviewError {
        FetchError::NotFound {
            resource: T::resource_name().to_string(),
            id: id.to_string(),
        }
        .into()
    }
}

impl<T: Record> Default for InMemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn decode<T: DeserializeOwned>(resource: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        FetchError::Decode {
            url: format!("memory://{resource}"),
            message: e.to_string(),
        }
        .into()
    })
}

fn object(payload: Value) -> Result<serde_json::Map<String, Value>> {
    match payload {
        Value::Object(map) => Ok(map),
        other => Err(FetchError::Rejected {
            url: String::new(),
            message: format!("payload must be a JSON object, got {other}"),
        }
        .into()),
    }
}

#[async_trait]
impl<T> CollectionService<T> for InMemoryCollection<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn create(&self, payload: Value) -> Result<Mutation<T>> {
        let mut fields = object(payload)?;
        fields
            .entry(ID_KEY)
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        fields
            .entry(CREATED_AT_KEY)
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

        let record: T = decode(T::resource_name(), Value::Object(fields))?;

        let mut records = self.write()?;
        if records.contains_key(record.id()) {
            return Err(FetchError::Rejected {
                url: String::new(),
                message: format!("{} '{}' already exists", T::resource_name(), record.id()),
            }
            .into());
        }
        records.insert(record.id().to_string(), record.clone());

        tracing::debug!(resource = T::resource_name(), id = record.id(), "Record created");
        Ok(Mutation::Record(record))
    }

    async fn update(&self, id: &str, payload: Value) -> Result<Mutation<T>> {
        let changes = object(payload)?;

        let mut records = self.write()?;
        let existing = records.get(id).ok_or_else(|| Self::not_found(id))?;

        let mut merged = match serde_json::to_value(existing) {
            Ok(Value::Object(map)) => map,
            Ok(_) => serde_json::Map::new(),
            Err(e) => return Err(ListviewError::internal(e)),
        };
        for (key, value) in changes {
            if key != ID_KEY {
                merged.insert(key, value);
            }
        }

        let record: T = decode(T::resource_name(), Value::Object(merged))?;
        records.insert(id.to_string(), record.clone());

        tracing::debug!(resource = T::resource_name(), id, "Record updated");
        Ok(Mutation::Record(record))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.write()?
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::content::Faq;
    use serde_json::json;

    fn faq(id: &str, question: &str) -> Faq {
        serde_json::from_value(json!({"_id": id, "question": question, "answer": "yes"})).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let service = InMemoryCollection::<Faq>::new();

        let created = service
            .create(json!({"question": "Shipping?", "answer": "3 days"}))
            .await
            .unwrap()
            .into_record()
            .unwrap();

        assert!(Uuid::parse_str(&created.id).is_ok());
        assert_eq!(service.get(&created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let service = InMemoryCollection::with_records(vec![faq("f1", "A?")]);
        let err = service.create(json!({"_id": "f1"})).await.unwrap_err();
        assert_eq!(err.error_code(), "FETCH_REJECTED");
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let service = InMemoryCollection::with_records(vec![faq("b", "B?"), faq("a", "A?")]);
        let ids: Vec<_> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let service = InMemoryCollection::with_records(vec![faq("f1", "Old?")]);

        let updated = service
            .update("f1", json!({"question": "New?", "_id": "ignored"}))
            .await
            .unwrap()
            .into_record()
            .unwrap();

        assert_eq!(updated.id, "f1");
        assert_eq!(updated.question.as_deref(), Some("New?"));
        assert_eq!(updated.answer.as_deref(), Some("yes"));
    }

    #[tokio::test]
    async fn test_missing_record() {
        let service = InMemoryCollection::<Faq>::new();
        assert_eq!(service.get("nope").await.unwrap(), None);

        let err = service.update("nope", json!({})).await.unwrap_err();
        assert_eq!(err.error_code(), "FETCH_NOT_FOUND");

        let err = service.delete("nope").await.unwrap_err();
        assert_eq!(err.error_code(), "FETCH_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete() {
        let service = InMemoryCollection::with_records(vec![faq("f1", "A?"), faq("f2", "B?")]);
        service.delete("f1").await.unwrap();
        assert_eq!(service.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_non_object_payload() {
        let service = InMemoryCollection::<Faq>::new();
        assert!(service.create(json!(["not", "an", "object"])).await.is_err());
    }
}
