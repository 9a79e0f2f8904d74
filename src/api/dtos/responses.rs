use crate::domain::models::{
    category::Category,
    product::Product,
    stock_movement::{MovementType, StockMovement},
    user::{Role, User},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub barcode: Option<String>,
    pub price: f64,
    pub cost: f64,
    pub quantity: i64,
    pub minimum_stock_level: i64,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub is_low_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        Self {
            is_low_stock: p.is_low_stock(),
            id: p.id,
            name: p.name,
            description: p.description,
            sku: p.sku,
            barcode: p.barcode,
            price: p.price,
            cost: p.cost,
            quantity: p.quantity,
            minimum_stock_level: p.minimum_stock_level,
            category_id: p.category_id,
            category_name: p.category_name,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub product_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            product_count: c.product_count,
            created_at: c.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementDto {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_sku: String,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<StockMovement> for StockMovementDto {
    fn from(m: StockMovement) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            product_name: m.product_name,
            product_sku: m.product_sku,
            movement_type: m.movement_type,
            quantity: m.quantity,
            reason: m.reason,
            notes: m.notes,
            created_by: m.created_by,
            created_at: m.created_at,
        }
    }
}

/// Password hashes never leave the service; this is the only user shape the
/// API returns.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            is_active: u.is_active,
            last_login_at: u.last_login_at,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total_count: i64, page_number: i64, page_size: i64) -> Self {
        let total_pages = (total_count + page_size - 1) / page_size;
        Self {
            items,
            total_count,
            page_number,
            page_size,
            total_pages,
            has_previous_page: page_number > 1,
            has_next_page: page_number < total_pages,
        }
    }
}
