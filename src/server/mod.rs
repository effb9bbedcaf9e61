//! Reference backend - serves the dashboard REST surface from memory.
//!
//! Requires the `server` feature. Uses axum for routing.
//!
//! ## Routes (per collection)
//!
//! - `GET /{collection}`: list records in insertion order.
//! - `GET /{collection}/:id`: one record, or 404.
//! - `POST /{collection}`: create; answers 201 with the created record.
//! - `PUT /{collection}/:id`: partial update.
//! - `DELETE /{collection}/:id`: remove; answers 204.
//!
//! ## Transaction queries
//!
//! - `GET /transactions?limit=N`: at most `N` records, default
//!   [`DEFAULT_LIST_LIMIT`].
//! - `GET /transactions/uncategorized`: records without a category, newest first.
//! - `GET /transactions/search?q=`: description match ignoring case, newest
//!   first. Missing `q` answers 400.
//! - `PATCH /transactions/:id`: set `categoryId`, `subcategoryId` or `notes`.
//!
//! ## Categories (read-only)
//!
//! - `GET /categories`
//! - `GET /categories/subcategories`
//! - `GET /categories/:id/subcategories`
//!
//! Errors answer `{ "error": "<message>" }` with the status from
//! [`ClientError::status_code`].
//!
//! ## Example
//!
//! ```ignore
//! use capo_dashboard::server::{self, Backend};
//!
//! let backend = Backend::new();
//! server::serve(backend, "0.0.0.0:8080").await?;
//! ```

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, MethodRouter};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::error::ClientError;
use crate::model::{Account, Categorization, Transaction};
use crate::resource::{
    InMemoryCatalog, InMemoryResources, Resource, ResourceId, TransactionQueries,
    DEFAULT_LIST_LIMIT,
};

/// In-memory storage for every collection the dashboard reads.
#[derive(Clone, Default)]
pub struct Backend {
    pub accounts: InMemoryResources<Account>,
    pub transactions: InMemoryResources<Transaction>,
    pub categories: InMemoryCatalog,
}

impl Backend {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Build an axum `Router` serving accounts, transactions and categories.
pub fn router(backend: Backend) -> Router {
    resource_routes(backend.accounts)
        .merge(transaction_routes(backend.transactions))
        .merge(category_routes(backend.categories))
}

/// Routes for a single collection.
pub fn resource_routes<R: Resource>(store: InMemoryResources<R>) -> Router {
    Router::new()
        .route(
            &format!("/{}", R::COLLECTION),
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(&format!("/{}/:id", R::COLLECTION), record_methods::<R>())
        .with_state(store)
}

/// Transactions: the collection routes plus limit, filters and categorization.
pub fn transaction_routes(store: InMemoryResources<Transaction>) -> Router {
    Router::new()
        .route(
            "/transactions",
            get(limited_list_handler).post(create_handler::<Transaction>),
        )
        .route("/transactions/uncategorized", get(uncategorized_handler))
        .route("/transactions/search", get(search_handler))
        .route(
            "/transactions/:id",
            record_methods::<Transaction>().patch(categorize_handler),
        )
        .with_state(store)
}

/// Read-only category listings.
pub fn category_routes(catalog: InMemoryCatalog) -> Router {
    Router::new()
        .route("/categories", get(categories_handler))
        .route("/categories/subcategories", get(all_subcategories_handler))
        .route("/categories/:id/subcategories", get(subcategories_handler))
        .with_state(catalog)
}

fn record_methods<R: Resource>() -> MethodRouter<InMemoryResources<R>> {
    get(get_handler::<R>)
        .put(update_handler::<R>)
        .delete(delete_handler::<R>)
}

/// Serve the backend over HTTP at the given address (e.g. `"0.0.0.0:8080"`).
pub async fn serve(backend: Backend, addr: &str) -> Result<(), std::io::Error> {
    let app = router(backend);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

fn error_response(err: ClientError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.message() }))).into_response()
}

fn json_or_error<T: serde::Serialize>(result: Result<T, ClientError>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_handler<R: Resource>(State(store): State<InMemoryResources<R>>) -> Response {
    json_or_error(store.all())
}

async fn get_handler<R: Resource>(
    State(store): State<InMemoryResources<R>>,
    Path(id): Path<ResourceId>,
) -> Response {
    json_or_error(store.find(id))
}

async fn create_handler<R: Resource>(
    State(store): State<InMemoryResources<R>>,
    Json(payload): Json<R::Create>,
) -> Response {
    match store.insert(payload) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_handler<R: Resource>(
    State(store): State<InMemoryResources<R>>,
    Path(id): Path<ResourceId>,
    Json(patch): Json<R::Update>,
) -> Response {
    match store.patch(id, patch) {
        Ok(record) => Json(record).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_handler<R: Resource>(
    State(store): State<InMemoryResources<R>>,
    Path(id): Path<ResourceId>,
) -> Response {
    match store.remove(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
struct LimitParams {
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
}

async fn limited_list_handler(
    State(store): State<InMemoryResources<Transaction>>,
    Query(params): Query<LimitParams>,
) -> Response {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    json_or_error(store.list_limited(limit).await)
}

async fn uncategorized_handler(State(store): State<InMemoryResources<Transaction>>) -> Response {
    json_or_error(store.uncategorized().await)
}

async fn search_handler(
    State(store): State<InMemoryResources<Transaction>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match params.q {
        Some(q) => json_or_error(store.search(&q).await),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "query parameter q is required" })),
        )
            .into_response(),
    }
}

async fn categorize_handler(
    State(store): State<InMemoryResources<Transaction>>,
    Path(id): Path<ResourceId>,
    Json(categorization): Json<Categorization>,
) -> Response {
    json_or_error(store.categorize(id, categorization).await)
}

async fn categories_handler(State(catalog): State<InMemoryCatalog>) -> Response {
    json_or_error(catalog.all_categories())
}

async fn all_subcategories_handler(State(catalog): State<InMemoryCatalog>) -> Response {
    json_or_error(catalog.all_subcategories())
}

async fn subcategories_handler(
    State(catalog): State<InMemoryCatalog>,
    Path(id): Path<ResourceId>,
) -> Response {
    json_or_error(catalog.subcategories_for(id))
}
