//! HttpCategoryClient - read-only category endpoints.

use async_trait::async_trait;

use super::client::{decode, send, Call};
use crate::error::ClientError;
use crate::model::{Category, Subcategory};
use crate::resource::{CategoryClient, ResourceId};

const COLLECTION: &str = "categories";

/// Client for `GET /categories` and its subcategory listings.
#[derive(Clone)]
pub struct HttpCategoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCategoryClient {
    /// Use an existing client. A trailing `/` on `base_url` is dropped.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{}{}", self.base_url, COLLECTION, suffix)
    }
}

#[async_trait]
impl CategoryClient for HttpCategoryClient {
    async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        let request = self.client.get(self.url(""));
        decode(send(COLLECTION, Call::List, request).await?).await
    }

    async fn subcategories(&self) -> Result<Vec<Subcategory>, ClientError> {
        let request = self.client.get(self.url("/subcategories"));
        decode(send(COLLECTION, Call::List, request).await?).await
    }

    async fn subcategories_of(
        &self,
        category_id: ResourceId,
    ) -> Result<Vec<Subcategory>, ClientError> {
        let request = self
            .client
            .get(self.url(&format!("/{}/subcategories", category_id)));
        decode(send(COLLECTION, Call::List, request).await?).await
    }
}
