use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::Customer;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    pub customer_id: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AddPurchaseRequest {
    /// Positive integer; anything else counts as one purchase.
    #[serde(default)]
    #[schema(value_type = Option<u32>)]
    pub count: Option<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerRewards {
    pub customer_id: String,
    pub name: String,
    pub purchases: u32,
    pub redeemed: u32,
    pub balance: u32,
    pub next_threshold: u64,
}

impl From<&Customer> for CustomerRewards {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id.clone(),
            name: customer.name.clone(),
            purchases: customer.purchases,
            redeemed: customer.redeemed,
            balance: customer.balance(),
            next_threshold: customer.next_threshold(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CustomerList {
    #[schema(value_type = Vec<CustomerRewards>)]
    pub items: Vec<CustomerRewards>,
}
