use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::CartItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub item_name: String,
    pub price: f64,
    /// Defaults to 1.
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartItem>,
    pub total: f64,
}
