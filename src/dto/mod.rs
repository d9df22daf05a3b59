pub mod auth;
pub mod cart;
pub mod catalogue;
pub mod jobs;
pub mod orders;
pub mod rewards;
pub mod support;
