use chrono::{DateTime, Utc};

use crate::models::{CartItem, DeliveryDetails, Order, OrderStatus};

pub fn subtotal(cart: &[CartItem]) -> f64 {
    cart.iter().map(CartItem::line_total).sum()
}

/// `ORD-0001` style id from the current order count, skipping ids already taken.
pub fn next_order_id(orders: &[Order]) -> String {
    let mut n = orders.len() + 1;
    loop {
        let candidate = format!("ORD-{n:04}");
        if !orders.iter().any(|order| order.order_id == candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Snapshots the cart into a pending order. The fee applies only with delivery details.
pub fn build_order(
    cart: Vec<CartItem>,
    delivery: Option<DeliveryDetails>,
    delivery_fee: f64,
    existing: &[Order],
    now: DateTime<Utc>,
) -> Order {
    let subtotal = subtotal(&cart);
    let delivery_fee = if delivery.is_some() { delivery_fee } else { 0.0 };
    Order {
        order_id: next_order_id(existing),
        items: cart,
        subtotal,
        delivery_fee,
        total: subtotal + delivery_fee,
        status: OrderStatus::Pending,
        created_at: now,
        delivery,
    }
}
