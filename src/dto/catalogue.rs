use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCatalogueItemRequest {
    pub part_id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCatalogueItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<u32>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}
