//! InMemoryResources - Vec-backed resource collection for tests, offline use
//! and the reference backend.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use super::{Resource, ResourceClient, ResourceId};
use crate::error::ClientError;

struct Collection<R> {
    records: Vec<R>,
    next_id: ResourceId,
}

/// In-memory resource collection with server-like semantics.
///
/// Ids are assigned sequentially starting at 1 and `createdAt` is stamped
/// with the current UTC time. Records keep insertion order. Clone-friendly
/// via Arc: clones share storage.
pub struct InMemoryResources<R> {
    collection: Arc<RwLock<Collection<R>>>,
}

impl<R> Clone for InMemoryResources<R> {
    fn clone(&self) -> Self {
        Self {
            collection: Arc::clone(&self.collection),
        }
    }
}

impl<R: Resource> Default for InMemoryResources<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> InMemoryResources<R> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a collection pre-populated with records, kept in the given order.
    ///
    /// The next assigned id continues after the highest seeded id.
    pub fn with_records(records: Vec<R>) -> Self {
        let next_id = records.iter().map(|r| r.id()).max().unwrap_or(0) + 1;
        Self {
            collection: Arc::new(RwLock::new(Collection { records, next_id })),
        }
    }

    fn lock_poisoned() -> ClientError {
        ClientError::Transport(format!("{} storage lock poisoned", R::COLLECTION))
    }

    /// Snapshot of every record in insertion order.
    pub fn all(&self) -> Result<Vec<R>, ClientError> {
        let collection = self.collection.read().map_err(|_| Self::lock_poisoned())?;
        Ok(collection.records.clone())
    }

    /// Look up one record.
    pub fn find(&self, id: ResourceId) -> Result<R, ClientError> {
        let collection = self.collection.read().map_err(|_| Self::lock_poisoned())?;
        collection
            .records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| ClientError::not_found(R::COLLECTION, id))
    }

    /// Validate and store a new record.
    pub fn insert(&self, payload: R::Create) -> Result<R, ClientError> {
        R::validate_create(&payload).map_err(ClientError::Validation)?;

        let mut collection = self.collection.write().map_err(|_| Self::lock_poisoned())?;
        let id = collection.next_id;
        collection.next_id += 1;

        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let record = R::from_payload(id, created_at, payload);
        collection.records.push(record.clone());
        Ok(record)
    }

    /// Merge a partial update into an existing record.
    pub fn patch(&self, id: ResourceId, patch: R::Update) -> Result<R, ClientError> {
        R::validate_update(&patch).map_err(ClientError::Validation)?;
        self.modify(id, |record| record.apply(patch))
    }

    /// Apply `f` to an existing record in place and return the result.
    pub fn modify<F>(&self, id: ResourceId, f: F) -> Result<R, ClientError>
    where
        F: FnOnce(&mut R),
    {
        let mut collection = self.collection.write().map_err(|_| Self::lock_poisoned())?;
        let record = collection
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| ClientError::not_found(R::COLLECTION, id))?;
        f(record);
        Ok(record.clone())
    }

    /// Remove a record.
    pub fn remove(&self, id: ResourceId) -> Result<(), ClientError> {
        let mut collection = self.collection.write().map_err(|_| Self::lock_poisoned())?;
        let index = collection
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| ClientError::not_found(R::COLLECTION, id))?;
        collection.records.remove(index);
        Ok(())
    }
}

#[async_trait]
impl<R: Resource> ResourceClient<R> for InMemoryResources<R> {
    async fn list(&self) -> Result<Vec<R>, ClientError> {
        self.all()
    }

    async fn get(&self, id: ResourceId) -> Result<R, ClientError> {
        self.find(id)
    }

    async fn create(&self, payload: R::Create) -> Result<R, ClientError> {
        self.insert(payload)
    }

    async fn update(&self, id: ResourceId, patch: R::Update) -> Result<R, ClientError> {
        self.patch(id, patch)
    }

    async fn delete(&self, id: ResourceId) -> Result<(), ClientError> {
        self.remove(id)
    }
}
