use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{DeliveryDetails, Order, OrderStatus};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// When present the configured delivery fee is added.
    #[serde(default)]
    pub delivery: Option<DeliveryDetails>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}
