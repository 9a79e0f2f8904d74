use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Number of products referencing this category; computed on reads.
    #[sqlx(default)]
    pub product_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            product_count: 0,
            created_at: Utc::now(),
        }
    }
}
