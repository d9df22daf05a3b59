use chrono::Utc;

use crate::{
    domain::checkout::build_order,
    dto::orders::{CheckoutRequest, OrderList, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{CartItem, Order},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Turns the cart into a pending order and empties it.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<Order>> {
    // cart before orders, always
    let mut cart = state.store.lock::<CartItem>().await?;
    if cart.items.is_empty() {
        return Ok(ApiResponse::message_only("Cart is empty"));
    }
    let mut orders = state.store.lock::<Order>().await?;

    let delivery = payload.delivery.map(|mut d| {
        d.recipient = d.recipient.trim().to_string();
        d.address = d.address.trim().to_string();
        d.phone = d.phone.trim().to_string();
        d
    });
    if delivery.as_ref().is_some_and(|d| d.address.is_empty()) {
        return Err(AppError::bad_request("Delivery address is required"));
    }

    let lines = std::mem::take(&mut cart.items);
    let order = build_order(
        lines,
        delivery,
        state.config.delivery_fee,
        &orders.items,
        Utc::now(),
    );
    orders.items.push(order.clone());

    // cart first; if the order cannot be written its lines go back into the cart
    cart.save().await?;
    if let Err(err) = orders.commit().await {
        tracing::error!(
            order_id = %order.order_id,
            error = %err,
            "order write failed, restoring cart"
        );
        cart.items = order.items.clone();
        cart.commit().await?;
        return Err(err);
    }
    drop(cart);

    tracing::info!(
        user_id = user.user_id,
        order_id = %order.order_id,
        total = order.total,
        lines = order.items.len(),
        "order placed"
    );
    Ok(ApiResponse::success(
        format!("Order {} placed", order.order_id),
        order,
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(state: &AppState) -> AppResult<ApiResponse<OrderList>> {
    let items = state.store.load::<Order>().await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn get_order(state: &AppState, order_id: &str) -> AppResult<ApiResponse<Order>> {
    let order = state
        .store
        .find::<Order>(order_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Order", order, None))
}

pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    let mut orders = state.store.lock::<Order>().await?;
    let order = orders.get_mut(order_id).ok_or(AppError::NotFound)?;
    order.status = payload.status;
    let order = order.clone();
    orders.commit().await?;

    tracing::info!(user_id = user.user_id, order_id = %order_id, status = ?order.status, "order status updated");
    Ok(ApiResponse::success(
        "Order status updated",
        order,
        Some(Meta::empty()),
    ))
}
