use crate::domain::models::stock_movement::StockMovementRequest;
use crate::domain::models::user::Role;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

// Both original clients speak camelCase JSON, so every wire type pins it.

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ValidateTokenRequest {
    pub token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub barcode: Option<String>,
    pub price: f64,
    pub cost: f64,
    #[serde(default)]
    pub initial_quantity: i64,
    #[serde(default)]
    pub minimum_stock_level: i64,
    pub category_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub barcode: Option<String>,
    pub price: f64,
    pub cost: f64,
    /// Direct override, bypassing the ledger: no movement row is written.
    pub quantity: Option<i64>,
    #[serde(default)]
    pub minimum_stock_level: i64,
    pub category_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Supplied only to rotate the password; absent leaves the hash untouched.
    pub password: Option<String>,
    pub role: Role,
    pub is_active: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementRequestDto {
    pub product_id: String,
    pub quantity: i64,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

impl From<StockMovementRequestDto> for StockMovementRequest {
    fn from(dto: StockMovementRequestDto) -> Self {
        Self {
            product_id: dto.product_id,
            quantity: dto.quantity,
            reason: dto.reason,
            notes: dto.notes,
            created_by: dto.created_by,
        }
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub term: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeParams {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Local calendar dates for the movement report; the handler widens them to
/// a full-day UTC range.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementReportParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    /// Returns the validated (pageNumber, pageSize) pair, or None when the
    /// caller did not ask for pagination. Both parameters must be present
    /// together; a lone one falls back to the unpaginated list.
    pub fn page_args(&self) -> Result<Option<(i64, i64)>, AppError> {
        match (self.page_number, self.page_size) {
            (Some(number), Some(size)) => {
                if number < 1 || size < 1 {
                    return Err(AppError::Validation(
                        "pageNumber and pageSize must be at least 1".to_string(),
                    ));
                }
                Ok(Some((number, size)))
            }
            _ => Ok(None),
        }
    }
}
