use crate::domain::models::{
    category::Category, product::Product, stock_movement::StockMovement, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<Product, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, AppError>;
    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, AppError>;
    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>, AppError>;
    async fn list(&self) -> Result<Vec<Product>, AppError>;
    async fn list_paged(&self, page_number: i64, page_size: i64) -> Result<(Vec<Product>, i64), AppError>;
    async fn list_by_category(&self, category_id: &str) -> Result<Vec<Product>, AppError>;
    async fn list_low_stock(&self) -> Result<Vec<Product>, AppError>;
    async fn search(&self, term: &str) -> Result<Vec<Product>, AppError>;
    async fn update(&self, product: &Product) -> Result<Product, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn sku_exists(&self, sku: &str, exclude_id: Option<&str>) -> Result<bool, AppError>;
    async fn barcode_exists(&self, barcode: &str, exclude_id: Option<&str>) -> Result<bool, AppError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &Category) -> Result<Category, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Category>, AppError>;
    async fn list(&self) -> Result<Vec<Category>, AppError>;
    async fn update(&self, category: &Category) -> Result<Category, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn name_exists(&self, name: &str, exclude_id: Option<&str>) -> Result<bool, AppError>;
}

#[async_trait]
pub trait StockMovementRepository: Send + Sync {
    /// Writes the new product quantity and appends the movement row as one
    /// transaction. `expected_quantity` is the value the caller read; the
    /// quantity UPDATE is guarded on it, and a miss aborts with Conflict.
    async fn record(
        &self,
        movement: &StockMovement,
        new_quantity: i64,
        expected_quantity: i64,
    ) -> Result<(), AppError>;
    async fn list(&self) -> Result<Vec<StockMovement>, AppError>;
    async fn list_paged(&self, page_number: i64, page_size: i64) -> Result<(Vec<StockMovement>, i64), AppError>;
    async fn list_by_product(&self, product_id: &str) -> Result<Vec<StockMovement>, AppError>;
    async fn list_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<StockMovement>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn list_paged(&self, page_number: i64, page_size: i64) -> Result<(Vec<User>, i64), AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn set_last_login(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError>;
}
