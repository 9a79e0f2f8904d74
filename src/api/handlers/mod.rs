pub mod auth;
pub mod categories;
pub mod health;
pub mod products;
pub mod reports;
pub mod stock_movements;
pub mod users;
