use crate::{
    domain::checkout::subtotal,
    dto::cart::{AddToCartRequest, CartList, UpdateCartItemRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartItem,
    response::{ApiResponse, Meta},
    state::AppState,
};

fn cart_list(items: Vec<CartItem>) -> CartList {
    let total = subtotal(&items);
    CartList { items, total }
}

pub async fn list_cart(state: &AppState) -> AppResult<ApiResponse<CartList>> {
    let items = state.store.load::<CartItem>().await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Cart", cart_list(items), Some(meta)))
}

/// Adds a line, or bumps the quantity when the item is already in the cart.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartList>> {
    let item_name = payload.item_name.trim().to_string();
    if item_name.is_empty() {
        return Err(AppError::bad_request("Item name is required"));
    }
    if !payload.price.is_finite() || payload.price < 0.0 {
        return Err(AppError::bad_request("Price must be a non-negative number"));
    }
    let quantity = payload.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::bad_request("Quantity must be at least 1"));
    }

    let mut cart = state.store.lock::<CartItem>().await?;
    match cart.get_mut(&item_name) {
        Some(line) => line.quantity = line.quantity.saturating_add(quantity),
        None => cart.items.push(CartItem {
            item_name: item_name.clone(),
            price: payload.price,
            quantity,
        }),
    }
    let items = cart.items.clone();
    cart.commit().await?;

    tracing::info!(user_id = user.user_id, item = %item_name, quantity, "added to cart");
    Ok(ApiResponse::success(
        format!("{item_name} added to cart"),
        cart_list(items),
        Some(Meta::empty()),
    ))
}

pub async fn update_quantity(
    state: &AppState,
    user: &AuthUser,
    item_name: &str,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartList>> {
    if payload.quantity < 1 {
        return Err(AppError::bad_request("Quantity must be at least 1"));
    }

    let mut cart = state.store.lock::<CartItem>().await?;
    let line = cart.get_mut(item_name).ok_or(AppError::NotFound)?;
    line.quantity = payload.quantity;
    let items = cart.items.clone();
    cart.commit().await?;

    tracing::info!(user_id = user.user_id, item = %item_name, quantity = payload.quantity, "cart quantity updated");
    Ok(ApiResponse::success(
        "Cart updated",
        cart_list(items),
        Some(Meta::empty()),
    ))
}

pub async fn remove_item(
    state: &AppState,
    user: &AuthUser,
    item_name: &str,
) -> AppResult<ApiResponse<CartList>> {
    let mut cart = state.store.lock::<CartItem>().await?;
    let before = cart.items.len();
    cart.items.retain(|line| line.item_name != item_name);
    if cart.items.len() == before {
        return Err(AppError::NotFound);
    }
    let items = cart.items.clone();
    cart.commit().await?;

    tracing::info!(user_id = user.user_id, item = %item_name, "removed from cart");
    Ok(ApiResponse::success(
        format!("{item_name} removed from cart"),
        cart_list(items),
        Some(Meta::empty()),
    ))
}

pub async fn clear_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    state.store.replace::<CartItem>(Vec::new()).await?;
    tracing::info!(user_id = user.user_id, "cart cleared");
    Ok(ApiResponse::success(
        "Cart cleared",
        cart_list(Vec::new()),
        Some(Meta::empty()),
    ))
}
