//! TransactionQueries - transaction lookups and categorization beyond CRUD.

use async_trait::async_trait;

use super::{InMemoryResources, ResourceClient, ResourceId};
use crate::error::ClientError;
use crate::model::{Categorization, Transaction};

/// Listing cap the backend applies when `GET /transactions` has no `limit`.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Filtered reads and categorization on the transactions collection.
#[async_trait]
pub trait TransactionQueries: ResourceClient<Transaction> {
    /// At most `limit` transactions in server order.
    async fn list_limited(&self, limit: usize) -> Result<Vec<Transaction>, ClientError>;

    /// Transactions without a category, newest first.
    async fn uncategorized(&self) -> Result<Vec<Transaction>, ClientError>;

    /// Transactions whose description contains `query`, ignoring case, newest first.
    async fn search(&self, query: &str) -> Result<Vec<Transaction>, ClientError>;

    /// Set category, subcategory or notes. Absent fields are left untouched.
    async fn categorize(
        &self,
        id: ResourceId,
        categorization: Categorization,
    ) -> Result<Transaction, ClientError>;
}

#[async_trait]
impl<C> TransactionQueries for std::sync::Arc<C>
where
    C: TransactionQueries + ?Sized,
{
    async fn list_limited(&self, limit: usize) -> Result<Vec<Transaction>, ClientError> {
        (**self).list_limited(limit).await
    }

    async fn uncategorized(&self) -> Result<Vec<Transaction>, ClientError> {
        (**self).uncategorized().await
    }

    async fn search(&self, query: &str) -> Result<Vec<Transaction>, ClientError> {
        (**self).search(query).await
    }

    async fn categorize(
        &self,
        id: ResourceId,
        categorization: Categorization,
    ) -> Result<Transaction, ClientError> {
        (**self).categorize(id, categorization).await
    }
}

// Stable, so equal dates keep server order.
fn newest_first(mut records: Vec<Transaction>) -> Vec<Transaction> {
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

fn only_uncategorized(records: Vec<Transaction>) -> Vec<Transaction> {
    newest_first(records.into_iter().filter(Transaction::is_uncategorized).collect())
}

fn matching(records: Vec<Transaction>, query: &str) -> Vec<Transaction> {
    newest_first(records.into_iter().filter(|tx| tx.matches(query)).collect())
}

#[async_trait]
impl TransactionQueries for InMemoryResources<Transaction> {
    async fn list_limited(&self, limit: usize) -> Result<Vec<Transaction>, ClientError> {
        let mut records = self.all()?;
        records.truncate(limit);
        Ok(records)
    }

    async fn uncategorized(&self) -> Result<Vec<Transaction>, ClientError> {
        Ok(only_uncategorized(self.all()?))
    }

    async fn search(&self, query: &str) -> Result<Vec<Transaction>, ClientError> {
        Ok(matching(self.all()?, query))
    }

    async fn categorize(
        &self,
        id: ResourceId,
        categorization: Categorization,
    ) -> Result<Transaction, ClientError> {
        self.modify(id, |tx| tx.categorize(categorization))
    }
}
