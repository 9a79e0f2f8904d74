pub mod auth_service;
pub mod stock_service;
