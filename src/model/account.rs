use serde::{Deserialize, Serialize};

use crate::resource::{require_finite, require_text, Resource, ResourceId};

/// A financial account as served by `GET /accounts`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: ResourceId,
    pub name: String,
    pub balance: f64,
    pub created_at: String,
}

/// Body of `POST /accounts`. The server defaults a missing balance to zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccount {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
}

impl CreateAccount {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            balance: None,
        }
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = Some(balance);
        self
    }
}

/// Body of `PUT /accounts/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
}

impl Resource for Account {
    const COLLECTION: &'static str = "accounts";

    type Create = CreateAccount;
    type Update = UpdateAccount;

    fn id(&self) -> ResourceId {
        self.id
    }

    fn from_payload(id: ResourceId, created_at: String, payload: CreateAccount) -> Self {
        Self {
            id,
            name: payload.name,
            balance: payload.balance.unwrap_or(0.0),
            created_at,
        }
    }

    fn apply(&mut self, patch: UpdateAccount) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(balance) = patch.balance {
            self.balance = balance;
        }
    }

    fn validate_create(payload: &CreateAccount) -> Result<(), String> {
        require_text("name", &payload.name)?;
        if let Some(balance) = payload.balance {
            require_finite("balance", balance)?;
        }
        Ok(())
    }

    fn validate_update(patch: &UpdateAccount) -> Result<(), String> {
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }
        if let Some(balance) = patch.balance {
            require_finite("balance", balance)?;
        }
        Ok(())
    }
}
