pub mod postgres_category_repo;
pub mod postgres_product_repo;
pub mod postgres_stock_movement_repo;
pub mod postgres_user_repo;
pub mod sqlite_category_repo;
pub mod sqlite_product_repo;
pub mod sqlite_stock_movement_repo;
pub mod sqlite_user_repo;
