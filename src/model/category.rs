use serde::{Deserialize, Serialize};

use crate::resource::ResourceId;

/// A spending or income category as served by `GET /categories`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: ResourceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `EXPENSE` or `INCOME`.
    #[serde(rename = "type")]
    pub category_type: String,
}

/// A subcategory, with the owning category's name denormalized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: ResourceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}
