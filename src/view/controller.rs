//! Async orchestration of a list view
//!
//! The controller owns the view state behind a lock and drives a
//! [`CollectionService`]. Locks are only taken between awaits, never across
//! one. Mutations do not patch local records; a successful write triggers a
//! full re-fetch.

use crate::core::error::{ListviewError, Result};
use crate::core::record::Record;
use crate::core::service::{CollectionService, Mutation};
use crate::view::state::{FetchOutcome, ListSnapshot, ListViewState, Notice, ViewEvent};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

pub struct ListController<T: Record, S: CollectionService<T>> {
    service: Arc<S>,
    state: Arc<RwLock<ListViewState<T>>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record, S: CollectionService<T>> Clone for ListController<T, S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            state: Arc::clone(&self.state),
            _marker: PhantomData,
        }
    }
}

impl<T: Record, S: CollectionService<T>> ListController<T, S> {
    pub fn new(service: S) -> Self {
        Self::from_arc(Arc::new(service))
    }

    pub fn from_arc(service: Arc<S>) -> Self {
        Self::with_state(service, ListViewState::new())
    }

    /// Start from a preconfigured state (page size, initial sort)
    pub fn with_state(service: Arc<S>, state: ListViewState<T>) -> Self {
        Self {
            service,
            state: Arc::new(RwLock::new(state)),
            _marker: PhantomData,
        }
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Apply a user event to the view state
    pub fn dispatch(&self, event: ViewEvent) -> Result<()> {
        self.write(|state| state.apply(event))
    }

    pub fn snapshot(&self) -> Result<ListSnapshot<T>> {
        self.read(ListViewState::snapshot)
    }

    /// Run a read-only closure against the current state
    pub fn read<R>(&self, f: impl FnOnce(&ListViewState<T>) -> R) -> Result<R> {
        let state = self
            .state
            .read()
            .map_err(|e| ListviewError::internal(format!("Failed to acquire read lock: {}", e)))?;
        Ok(f(&state))
    }

    fn write<R>(&self, f: impl FnOnce(&mut ListViewState<T>) -> R) -> Result<R> {
        let mut state = self
            .state
            .write()
            .map_err(|e| ListviewError::internal(format!("Failed to acquire write lock: {}", e)))?;
        Ok(f(&mut state))
    }

    /// Fetch the full collection and replace the raw records
    ///
    /// A failure keeps the previous records, raises an error notice and is
    /// returned to the caller. A response overtaken by a newer refresh is
    /// dropped and reported as [`FetchOutcome::Stale`].
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let token = self.write(|state| state.begin_fetch())?;
        tracing::debug!(
            resource = T::resource_name(),
            token = token.sequence(),
            "Fetching collection"
        );

        match self.service.list().await {
            Ok(records) => {
                let count = records.len();
                let outcome =
                    self.write(|state| state.complete_fetch(token, Ok::<_, ListviewError>(records)))?;
                if outcome == FetchOutcome::Applied {
                    tracing::info!(resource = T::resource_name(), count, "Collection loaded");
                }
                Ok(outcome)
            }
            Err(e) => {
                let outcome = self.write(|state| state.complete_fetch(token, Err::<Vec<T>, _>(&e)))?;
                if outcome == FetchOutcome::Stale {
                    return Ok(outcome);
                }
                tracing::warn!(
                    resource = T::resource_name(),
                    error = %e,
                    code = e.error_code(),
                    "Failed to fetch collection"
                );
                Err(e)
            }
        }
    }

    /// Fetch one record for a detail view
    ///
    /// The list state is left alone apart from an error notice on failure.
    pub async fn fetch_detail(&self, id: &str) -> Result<Option<T>> {
        match self.service.get(id).await {
            Ok(record) => Ok(record),
            Err(e) => {
                self.write(|state| state.set_notice(Notice::error(format!("Failed to fetch details: {e}"))))?;
                Err(e)
            }
        }
    }

    pub async fn create(&self, payload: Value) -> Result<Mutation<T>> {
        let result = self.service.create(payload).await;
        self.after_mutation(MutationKind::Create, result).await
    }

    pub async fn update(&self, id: &str, payload: Value) -> Result<Mutation<T>> {
        let result = self.service.update(id, payload).await;
        self.after_mutation(MutationKind::Update, result).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = self.service.delete(id).await;
        self.after_mutation(MutationKind::Delete, result).await
    }

    async fn after_mutation<R>(&self, kind: MutationKind, result: Result<R>) -> Result<R> {
        let action = kind.verb();
        match result {
            Ok(value) => {
                tracing::info!(resource = T::resource_name(), action, "Record mutation succeeded");
                self.write(|state| {
                    state.set_notice(Notice::success(format!(
                        "Record {} successfully",
                        kind.past_tense()
                    )))
                })?;
                // The write already happened; a failed re-fetch only shows up in the state
                if let Err(e) = self.refresh().await {
                    tracing::debug!(error = %e, "Re-fetch after mutation failed");
                }
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(
                    resource = T::resource_name(),
                    action,
                    error = %e,
                    "Record mutation failed"
                );
                self.write(|state| {
                    state.set_notice(Notice::error(format!("Failed to {action} record: {e}")))
                })?;
                Err(e)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    fn verb(self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            MutationKind::Create => "created",
            MutationKind::Update => "updated",
            MutationKind::Delete => "deleted",
        }
    }
}
