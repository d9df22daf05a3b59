use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::rewards::{AddPurchaseRequest, CreateCustomerRequest, CustomerList, CustomerRewards},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::reward_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/{customer_id}", get(get_customer).delete(delete_customer))
        .route("/{customer_id}/purchases", post(add_purchase))
        .route("/{customer_id}/redeem", post(redeem))
}

#[utoipa::path(
    get,
    path = "/api/rewards",
    responses(
        (status = 200, description = "Customers with their reward balance", body = ApiResponse<CustomerList>),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "Rewards"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let resp = reward_service::list_customers(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/rewards/{customer_id}",
    params(("customer_id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer rewards", body = ApiResponse<CustomerRewards>),
        (status = 404, description = "Customer not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Rewards"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(customer_id): Path<String>,
) -> AppResult<Json<ApiResponse<CustomerRewards>>> {
    let resp = reward_service::get_customer(&state, &customer_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/rewards",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse<CustomerRewards>),
        (status = 400, description = "Missing fields or duplicate id"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Rewards"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CustomerRewards>>)> {
    let resp = reward_service::create_customer(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/rewards/{customer_id}/purchases",
    params(("customer_id" = String, Path, description = "Customer ID")),
    request_body = AddPurchaseRequest,
    responses(
        (status = 200, description = "Purchases recorded", body = ApiResponse<CustomerRewards>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Customer not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Rewards"
)]
pub async fn add_purchase(
    State(state): State<AppState>,
    user: AuthUser,
    Path(customer_id): Path<String>,
    payload: Option<Json<AddPurchaseRequest>>,
) -> AppResult<Json<ApiResponse<CustomerRewards>>> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let resp = reward_service::add_purchase(&state, &user, &customer_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/rewards/{customer_id}/redeem",
    params(("customer_id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Redeemed, or nothing to redeem", body = ApiResponse<CustomerRewards>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Customer not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Rewards"
)]
pub async fn redeem(
    State(state): State<AppState>,
    user: AuthUser,
    Path(customer_id): Path<String>,
) -> AppResult<Json<ApiResponse<CustomerRewards>>> {
    let resp = reward_service::redeem(&state, &user, &customer_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/rewards/{customer_id}",
    params(("customer_id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Customer not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Rewards"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(customer_id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = reward_service::delete_customer(&state, &user, &customer_id).await?;
    Ok(Json(resp))
}
