//! Dashboard records and their payloads.
//!
//! Field names are camelCase on the wire. Timestamps are kept as the
//! strings the server sent.

mod account;
mod category;
mod transaction;

pub use account::{Account, CreateAccount, UpdateAccount};
pub use category::{Category, Subcategory};
pub use transaction::{Categorization, CreateTransaction, Transaction, UpdateTransaction};
