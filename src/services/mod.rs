pub mod auth_service;
pub mod cart_service;
pub mod catalogue_service;
pub mod job_service;
pub mod order_service;
pub mod reward_service;
pub mod support_service;
