//! CategoryClient - read-only access to categories and subcategories.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{require_text, ResourceId};
use crate::error::ClientError;
use crate::model::{Category, Subcategory};

/// Read-only category catalog.
#[async_trait]
pub trait CategoryClient: Send + Sync {
    /// Every category in catalog order.
    async fn categories(&self) -> Result<Vec<Category>, ClientError>;

    /// Every subcategory in catalog order.
    async fn subcategories(&self) -> Result<Vec<Subcategory>, ClientError>;

    /// Subcategories of one category. Empty when the category is unknown.
    async fn subcategories_of(
        &self,
        category_id: ResourceId,
    ) -> Result<Vec<Subcategory>, ClientError>;
}

#[derive(Default)]
struct Catalog {
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
}

/// In-memory catalog, seeded through [`add_category`](Self::add_category)
/// and [`add_subcategory`](Self::add_subcategory). Clones share storage.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> ClientError {
        ClientError::Transport("categories storage lock poisoned".into())
    }

    /// Append a category with the next sequential id.
    pub fn add_category(
        &self,
        name: impl Into<String>,
        category_type: impl Into<String>,
    ) -> Result<Category, ClientError> {
        let name = name.into();
        let category_type = category_type.into();
        require_text("name", &name).map_err(ClientError::Validation)?;
        require_text("type", &category_type).map_err(ClientError::Validation)?;

        let mut catalog = self.catalog.write().map_err(|_| Self::lock_poisoned())?;
        let category = Category {
            id: catalog.categories.len() as ResourceId + 1,
            name,
            description: None,
            category_type,
        };
        catalog.categories.push(category.clone());
        Ok(category)
    }

    /// Append a subcategory under an existing category.
    pub fn add_subcategory(
        &self,
        category_id: ResourceId,
        name: impl Into<String>,
    ) -> Result<Subcategory, ClientError> {
        let name = name.into();
        require_text("name", &name).map_err(ClientError::Validation)?;

        let mut catalog = self.catalog.write().map_err(|_| Self::lock_poisoned())?;
        let category_name = catalog
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name.clone())
            .ok_or_else(|| ClientError::not_found("categories", category_id))?;
        let subcategory = Subcategory {
            id: catalog.subcategories.len() as ResourceId + 1,
            name,
            description: None,
            category_id,
            category_name: Some(category_name),
        };
        catalog.subcategories.push(subcategory.clone());
        Ok(subcategory)
    }

    pub fn all_categories(&self) -> Result<Vec<Category>, ClientError> {
        let catalog = self.catalog.read().map_err(|_| Self::lock_poisoned())?;
        Ok(catalog.categories.clone())
    }

    pub fn all_subcategories(&self) -> Result<Vec<Subcategory>, ClientError> {
        let catalog = self.catalog.read().map_err(|_| Self::lock_poisoned())?;
        Ok(catalog.subcategories.clone())
    }

    pub fn subcategories_for(
        &self,
        category_id: ResourceId,
    ) -> Result<Vec<Subcategory>, ClientError> {
        let catalog = self.catalog.read().map_err(|_| Self::lock_poisoned())?;
        Ok(catalog
            .subcategories
            .iter()
            .filter(|s| s.category_id == category_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CategoryClient for InMemoryCatalog {
    async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        self.all_categories()
    }

    async fn subcategories(&self) -> Result<Vec<Subcategory>, ClientError> {
        self.all_subcategories()
    }

    async fn subcategories_of(
        &self,
        category_id: ResourceId,
    ) -> Result<Vec<Subcategory>, ClientError> {
        self.subcategories_for(category_id)
    }
}

#[async_trait]
impl<C> CategoryClient for Arc<C>
where
    C: CategoryClient + ?Sized,
{
    async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        (**self).categories().await
    }

    async fn subcategories(&self) -> Result<Vec<Subcategory>, ClientError> {
        (**self).subcategories().await
    }

    async fn subcategories_of(
        &self,
        category_id: ResourceId,
    ) -> Result<Vec<Subcategory>, ClientError> {
        (**self).subcategories_of(category_id).await
    }
}
