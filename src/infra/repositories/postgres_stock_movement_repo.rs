use crate::domain::{models::stock_movement::StockMovement, ports::StockMovementRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const SELECT_MOVEMENT: &str = "SELECT m.id, m.product_id, m.movement_type, m.quantity, m.reason, \
     m.notes, m.created_by, m.created_at, p.name AS product_name, p.sku AS product_sku \
     FROM stock_movements m JOIN products p ON p.id = m.product_id";

pub struct PostgresStockMovementRepo {
    pool: PgPool,
}

impl PostgresStockMovementRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StockMovementRepository for PostgresStockMovementRepo {
    async fn record(
        &self,
        movement: &StockMovement,
        new_quantity: i64,
        expected_quantity: i64,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Guarded on the quantity the caller read; a miss means a concurrent
        // writer got in first and the whole operation aborts.
        let result = sqlx::query(
            "UPDATE products SET quantity = $1, updated_at = $2 WHERE id = $3 AND quantity = $4",
        )
            .bind(new_quantity)
            .bind(movement.created_at)
            .bind(&movement.product_id)
            .bind(expected_quantity)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict("Stock level changed concurrently".to_string()));
        }

        sqlx::query(
            "INSERT INTO stock_movements (id, product_id, movement_type, quantity, reason, notes, created_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
            .bind(&movement.id)
            .bind(&movement.product_id)
            .bind(movement.movement_type.as_str())
            .bind(movement.quantity)
            .bind(&movement.reason)
            .bind(&movement.notes)
            .bind(&movement.created_by)
            .bind(movement.created_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StockMovement>, AppError> {
        sqlx::query_as::<_, StockMovement>(&format!("{SELECT_MOVEMENT} ORDER BY m.created_at DESC"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_paged(&self, page_number: i64, page_size: i64) -> Result<(Vec<StockMovement>, i64), AppError> {
        let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let items = sqlx::query_as::<_, StockMovement>(&format!(
            "{SELECT_MOVEMENT} ORDER BY m.created_at DESC LIMIT $1 OFFSET $2"
        ))
            .bind(page_size)
            .bind((page_number - 1) * page_size)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok((items, total_count))
    }

    async fn list_by_product(&self, product_id: &str) -> Result<Vec<StockMovement>, AppError> {
        sqlx::query_as::<_, StockMovement>(&format!(
            "{SELECT_MOVEMENT} WHERE m.product_id = $1 ORDER BY m.created_at DESC"
        ))
            .bind(product_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StockMovement>, AppError> {
        sqlx::query_as::<_, StockMovement>(&format!(
            "{SELECT_MOVEMENT} WHERE m.created_at >= $1 AND m.created_at <= $2 ORDER BY m.created_at DESC"
        ))
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
