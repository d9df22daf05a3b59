use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod catalogue;
pub mod doc;
pub mod health;
pub mod jobs;
pub mod orders;
pub mod params;
pub mod rewards;
pub mod support;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/jobs", jobs::router())
        .nest("/rewards", rewards::router())
        .nest("/catalogue", catalogue::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/support", support::router())
}
