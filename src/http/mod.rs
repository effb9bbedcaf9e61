//! HTTP transport for resource clients (requires the `http` feature).
//!
//! ## Example
//!
//! ```ignore
//! use capo_dashboard::http::{ClientConfig, HttpApi};
//!
//! let api = HttpApi::new(&ClientConfig::from_env()?)?;
//! let accounts = api.accounts().list().await?;
//! ```

mod catalog;
mod client;
mod config;

pub use catalog::HttpCategoryClient;
pub use client::{HttpApi, HttpResourceClient};
pub use config::{ClientConfig, DEFAULT_API_URL};
