use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Product {
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
    /// Joined from the categories table on reads; not a column of products.
    #[sqlx(default)]
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewProductParams {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub barcode: Option<String>,
    pub price: f64,
    pub cost: f64,
    pub initial_quantity: i64,
    pub minimum_stock_level: i64,
    pub category_id: Option<String>,
}

impl Product {
    pub fn new(params: NewProductParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            description: params.description,
            sku: params.sku,
            barcode: params.barcode,
            price: params.price,
            cost: params.cost,
            quantity: params.initial_quantity,
            minimum_stock_level: params.minimum_stock_level,
            category_id: params.category_id,
            category_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum_stock_level
    }
}
