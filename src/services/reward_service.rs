use crate::{
    domain::rewards::{RedeemOutcome, coerce_purchase_count},
    dto::rewards::{AddPurchaseRequest, CreateCustomerRequest, CustomerList, CustomerRewards},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Customer,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_customers(state: &AppState) -> AppResult<ApiResponse<CustomerList>> {
    let customers = state.store.load::<Customer>().await?;
    let items: Vec<CustomerRewards> = customers.iter().map(CustomerRewards::from).collect();
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Rewards", CustomerList { items }, Some(meta)))
}

pub async fn get_customer(
    state: &AppState,
    customer_id: &str,
) -> AppResult<ApiResponse<CustomerRewards>> {
    let customer = state
        .store
        .find::<Customer>(customer_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Customer",
        CustomerRewards::from(&customer),
        None,
    ))
}

pub async fn create_customer(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<CustomerRewards>> {
    ensure_admin(user)?;
    let customer_id = payload.customer_id.trim();
    let name = payload.name.trim();
    if customer_id.is_empty() || name.is_empty() {
        return Err(AppError::bad_request("Customer ID and name are required"));
    }

    let customer = Customer {
        customer_id: customer_id.to_string(),
        name: name.to_string(),
        purchases: 0,
        redeemed: 0,
    };

    let mut customers = state.store.lock::<Customer>().await?;
    if customers.contains(customer_id) {
        return Err(AppError::bad_request(format!(
            "Customer {customer_id} already exists"
        )));
    }
    customers.items.push(customer.clone());
    customers.commit().await?;

    tracing::info!(user_id = user.user_id, customer_id = %customer.customer_id, "customer created");
    Ok(ApiResponse::success(
        "Customer created",
        CustomerRewards::from(&customer),
        Some(Meta::empty()),
    ))
}

pub async fn add_purchase(
    state: &AppState,
    user: &AuthUser,
    customer_id: &str,
    payload: AddPurchaseRequest,
) -> AppResult<ApiResponse<CustomerRewards>> {
    ensure_admin(user)?;
    let count = coerce_purchase_count(payload.count.as_ref());

    let mut customers = state.store.lock::<Customer>().await?;
    let customer = customers.get_mut(customer_id).ok_or(AppError::NotFound)?;
    customer
        .add_purchases(count)
        .map_err(|_| AppError::bad_request("Purchase count is too large"))?;
    let rewards = CustomerRewards::from(&*customer);
    customers.commit().await?;

    tracing::info!(
        user_id = user.user_id,
        customer_id = %customer_id,
        count,
        purchases = rewards.purchases,
        "purchase recorded"
    );
    Ok(ApiResponse::success(
        format!("Added {count} purchase(s)"),
        rewards,
        Some(Meta::empty()),
    ))
}

/// Redeems one unit when available. A zero balance is reported, not rejected.
pub async fn redeem(
    state: &AppState,
    user: &AuthUser,
    customer_id: &str,
) -> AppResult<ApiResponse<CustomerRewards>> {
    ensure_admin(user)?;

    // the balance check and the increment happen under one lock
    let mut customers = state.store.lock::<Customer>().await?;
    let customer = customers.get_mut(customer_id).ok_or(AppError::NotFound)?;
    let outcome = customer.redeem();
    let rewards = CustomerRewards::from(&*customer);

    let message = match outcome {
        RedeemOutcome::Redeemed => {
            customers.commit().await?;
            tracing::info!(user_id = user.user_id, customer_id = %customer_id, "reward redeemed");
            "Reward redeemed"
        }
        RedeemOutcome::NothingToRedeem => "No rewards available to redeem",
    };

    Ok(ApiResponse::success(message, rewards, Some(Meta::empty())))
}

pub async fn delete_customer(
    state: &AppState,
    user: &AuthUser,
    customer_id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    if !state.store.remove::<Customer>(customer_id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(user_id = user.user_id, customer_id = %customer_id, "customer deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
