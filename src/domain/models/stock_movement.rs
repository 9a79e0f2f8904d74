use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;

/// Kind of ledger entry. Stored as its canonical string form everywhere:
/// database, JSON and logs.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum MovementType {
    Add,
    Remove,
    Adjustment,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Add => "Add",
            MovementType::Remove => "Remove",
            MovementType::Adjustment => "Adjustment",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for MovementType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Add" => Ok(MovementType::Add),
            "Remove" => Ok(MovementType::Remove),
            "Adjustment" => Ok(MovementType::Adjustment),
            other => Err(format!("unknown movement type: {other}")),
        }
    }
}

/// One atomic change to a product's recorded quantity. Append-only: no code
/// path updates or deletes a movement once written.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct StockMovement {
    pub id: String,
    pub product_id: String,
    #[sqlx(try_from = "String")]
    pub movement_type: MovementType,
    /// Signed delta applied to the product quantity.
    pub quantity: i64,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Joined from the products table on reads.
    #[sqlx(default)]
    pub product_name: String,
    #[sqlx(default)]
    pub product_sku: String,
}

/// Caller-supplied parameters for a single ledger operation.
pub struct StockMovementRequest {
    pub product_id: String,
    pub quantity: i64,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

impl StockMovement {
    pub fn new(
        product_id: String,
        movement_type: MovementType,
        quantity: i64,
        req: &StockMovementRequest,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product_id,
            movement_type,
            quantity,
            reason: req.reason.clone(),
            notes: req.notes.clone(),
            created_by: req.created_by.clone(),
            created_at: Utc::now(),
            product_name: String::new(),
            product_sku: String::new(),
        }
    }
}
