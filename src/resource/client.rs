//! ResourceClient - CRUD access to one resource collection.

use async_trait::async_trait;

use super::{Resource, ResourceId};
use crate::error::ClientError;

/// Typed CRUD access to one resource collection.
///
/// Implementations hold no state of their own beyond a transport handle:
/// no retry, no caching. Errors are propagated as-is.
#[async_trait]
pub trait ResourceClient<R: Resource>: Send + Sync {
    /// Read the full collection in server order.
    async fn list(&self) -> Result<Vec<R>, ClientError>;

    /// Read one record. Fails with `NotFound` if the id is unknown.
    async fn get(&self, id: ResourceId) -> Result<R, ClientError>;

    /// Create a record. The server assigns the id and creation timestamp.
    async fn create(&self, payload: R::Create) -> Result<R, ClientError>;

    /// Merge the provided fields into an existing record.
    async fn update(&self, id: ResourceId, patch: R::Update) -> Result<R, ClientError>;

    /// Remove a record. Fails with `NotFound` if it is already absent.
    async fn delete(&self, id: ResourceId) -> Result<(), ClientError>;
}

#[async_trait]
impl<R, C> ResourceClient<R> for std::sync::Arc<C>
where
    R: Resource,
    C: ResourceClient<R> + ?Sized,
{
    async fn list(&self) -> Result<Vec<R>, ClientError> {
        (**self).list().await
    }

    async fn get(&self, id: ResourceId) -> Result<R, ClientError> {
        (**self).get(id).await
    }

    async fn create(&self, payload: R::Create) -> Result<R, ClientError> {
        (**self).create(payload).await
    }

    async fn update(&self, id: ResourceId, patch: R::Update) -> Result<R, ClientError> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: ResourceId) -> Result<(), ClientError> {
        (**self).delete(id).await
    }
}
