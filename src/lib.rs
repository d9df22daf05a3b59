pub mod config;
pub mod domain;
pub mod dto;
pub mod error;
pub mod face;
pub mod middleware;
pub mod models;
pub mod reference;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
