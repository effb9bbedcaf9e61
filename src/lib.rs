//! Typed REST resource clients and an observable fetch-and-settle store for
//! a personal finance dashboard.
//!
//! - [`ResourceClient`]: CRUD over one collection (`/accounts`,
//!   `/transactions`), implemented over HTTP ([`http::HttpResourceClient`])
//!   and in memory ([`InMemoryResources`]). Transactions add filtered
//!   reads and categorization ([`TransactionQueries`]); categories are
//!   read-only ([`CategoryClient`]).
//! - [`DashboardStore`]: owns the fetched collections and a load status,
//!   runs both list calls concurrently, settles all-or-nothing and exposes
//!   derived views (`total_balance`, `recent_transactions`).
//! - [`StateStore`]: the snapshot container underneath, replaced wholesale
//!   and broadcast over a watch channel.

mod error;
mod model;
mod resource;
mod store;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "server")]
pub mod server;

pub use error::ClientError;
pub use model::{
    Account, Categorization, Category, CreateAccount, CreateTransaction, Subcategory, Transaction,
    UpdateAccount, UpdateTransaction,
};
pub use resource::{
    CategoryClient, InMemoryCatalog, InMemoryResources, Resource, ResourceClient, ResourceId,
    TransactionQueries, DEFAULT_LIST_LIMIT,
};
pub use store::{
    CycleOutcome, DashboardState, DashboardStore, Mount, Snapshot, StateStore, StoreStatus,
    FETCH_FAILED_MESSAGE, RECENT_TRANSACTIONS,
};

// Re-exported so callers can name the subscription receiver type.
pub use tokio::sync::watch;
