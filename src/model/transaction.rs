use serde::{Deserialize, Serialize};

use crate::resource::{require_finite, require_text, Resource, ResourceId};

/// A transaction as served by `GET /transactions`.
///
/// `account_id` references an [`Account`](super::Account) but is not
/// checked client-side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: ResourceId,
    pub account_id: ResourceId,
    pub transaction_type: String,
    pub amount: f64,
    pub description: String,
    pub date: String,
    pub created_at: String,
    /// `None` while the transaction is uncategorized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn is_uncategorized(&self) -> bool {
        self.category_id.is_none()
    }

    /// Case-insensitive substring match on the description.
    pub fn matches(&self, query: &str) -> bool {
        self.description
            .to_lowercase()
            .contains(&query.trim().to_lowercase())
    }

    /// Merge the provided categorization fields.
    pub fn categorize(&mut self, categorization: Categorization) {
        if let Some(category_id) = categorization.category_id {
            self.category_id = Some(category_id);
        }
        if let Some(subcategory_id) = categorization.subcategory_id {
            self.subcategory_id = Some(subcategory_id);
        }
        if let Some(notes) = categorization.notes {
            self.notes = Some(notes);
        }
    }
}

/// Body of `POST /transactions`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransaction {
    pub account_id: ResourceId,
    pub transaction_type: String,
    pub amount: f64,
    pub description: String,
    pub date: String,
}

/// Body of `PUT /transactions/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Body of `PATCH /transactions/{id}`. Absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Categorization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Categorization {
    pub fn category(category_id: ResourceId) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }

    pub fn with_subcategory(mut self, subcategory_id: ResourceId) -> Self {
        self.subcategory_id = Some(subcategory_id);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

impl Resource for Transaction {
    const COLLECTION: &'static str = "transactions";

    type Create = CreateTransaction;
    type Update = UpdateTransaction;

    fn id(&self) -> ResourceId {
        self.id
    }

    fn from_payload(id: ResourceId, created_at: String, payload: CreateTransaction) -> Self {
        Self {
            id,
            account_id: payload.account_id,
            transaction_type: payload.transaction_type,
            amount: payload.amount,
            description: payload.description,
            date: payload.date,
            created_at,
            category_id: None,
            subcategory_id: None,
            notes: None,
        }
    }

    fn apply(&mut self, patch: UpdateTransaction) {
        if let Some(account_id) = patch.account_id {
            self.account_id = account_id;
        }
        if let Some(transaction_type) = patch.transaction_type {
            self.transaction_type = transaction_type;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }

    fn validate_create(payload: &CreateTransaction) -> Result<(), String> {
        require_text("transactionType", &payload.transaction_type)?;
        require_finite("amount", payload.amount)?;
        require_text("description", &payload.description)?;
        require_text("date", &payload.date)
    }

    fn validate_update(patch: &UpdateTransaction) -> Result<(), String> {
        if let Some(transaction_type) = &patch.transaction_type {
            require_text("transactionType", transaction_type)?;
        }
        if let Some(amount) = patch.amount {
            require_finite("amount", amount)?;
        }
        if let Some(description) = &patch.description {
            require_text("description", description)?;
        }
        if let Some(date) = &patch.date {
            require_text("date", date)?;
        }
        Ok(())
    }
}
