//! Resources - typed records served by a REST collection.
//!
//! A resource is a flat record with a server-assigned id and creation
//! timestamp. Each kind lives under its own collection path
//! (`/accounts`, `/transactions`) and comes with a create payload and a
//! partial update payload.
//!
//! ## Example
//!
//! ```ignore
//! use capo_dashboard::{Account, CreateAccount, InMemoryResources, ResourceClient};
//!
//! let accounts = InMemoryResources::<Account>::new();
//! let created = accounts.create(CreateAccount::new("Checking").with_balance(100.0)).await?;
//! let all = accounts.list().await?;
//! ```

mod catalog;
mod client;
mod in_memory;
mod queries;

use serde::{de::DeserializeOwned, Serialize};

pub use catalog::{CategoryClient, InMemoryCatalog};
pub use client::ResourceClient;
pub use in_memory::InMemoryResources;
pub use queries::{TransactionQueries, DEFAULT_LIST_LIMIT};

/// Identifier assigned by the server.
pub type ResourceId = i64;

/// Trait for records exposed through a REST collection.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection path segment for this kind (e.g. "accounts").
    const COLLECTION: &'static str;

    /// Payload accepted by `POST /{collection}`.
    type Create: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Partial payload accepted by `PUT /{collection}/{id}`. Absent fields are left untouched.
    type Update: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static;

    /// Returns the server-assigned identifier.
    fn id(&self) -> ResourceId;

    /// Build a record from a create payload plus the server-assigned fields.
    fn from_payload(id: ResourceId, created_at: String, payload: Self::Create) -> Self;

    /// Merge the provided fields of a partial update into this record.
    fn apply(&mut self, patch: Self::Update);

    /// Reject create payloads the backend would refuse.
    fn validate_create(_payload: &Self::Create) -> Result<(), String> {
        Ok(())
    }

    /// Reject partial updates the backend would refuse.
    fn validate_update(_patch: &Self::Update) -> Result<(), String> {
        Ok(())
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} must not be blank", field))
    } else {
        Ok(())
    }
}

pub(crate) fn require_finite(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{} must be a finite number", field))
    }
}
