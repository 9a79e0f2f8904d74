use crate::domain::{models::product::Product, ports::ProductRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

const SELECT_PRODUCT: &str = "SELECT p.id, p.name, p.description, p.sku, p.barcode, p.price, p.cost, \
     p.quantity, p.minimum_stock_level, p.category_id, c.name AS category_name, \
     p.created_at, p.updated_at \
     FROM products p LEFT JOIN categories c ON c.id = p.category_id";

pub struct PostgresProductRepo {
    pool: PgPool,
}

impl PostgresProductRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn get(&self, id: &str) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.id = $1"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepo {
    async fn create(&self, product: &Product) -> Result<Product, AppError> {
        sqlx::query(
            "INSERT INTO products (id, name, description, sku, barcode, price, cost, quantity, minimum_stock_level, category_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
            .bind(&product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.sku)
            .bind(&product.barcode)
            .bind(product.price)
            .bind(product.cost)
            .bind(product.quantity)
            .bind(product.minimum_stock_level)
            .bind(&product.category_id)
            .bind(product.created_at)
            .bind(product.updated_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        self.get(&product.id).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.sku = $1"))
            .bind(sku)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.barcode = $1"))
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} ORDER BY p.name ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_paged(&self, page_number: i64, page_size: i64) -> Result<(Vec<Product>, i64), AppError> {
        let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let items = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCT} ORDER BY p.name ASC LIMIT $1 OFFSET $2"
        ))
            .bind(page_size)
            .bind((page_number - 1) * page_size)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok((items, total_count))
    }

    async fn list_by_category(&self, category_id: &str) -> Result<Vec<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCT} WHERE p.category_id = $1 ORDER BY p.name ASC"
        ))
            .bind(category_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_low_stock(&self) -> Result<Vec<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCT} WHERE p.quantity <= p.minimum_stock_level ORDER BY p.name ASC"
        ))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn search(&self, term: &str) -> Result<Vec<Product>, AppError> {
        let pattern = format!("%{}%", term.to_lowercase());
        sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCT} WHERE LOWER(p.name) LIKE $1 OR LOWER(p.sku) LIKE $1 \
             OR LOWER(COALESCE(p.barcode, '')) LIKE $1 OR LOWER(COALESCE(p.description, '')) LIKE $1 \
             ORDER BY p.name ASC"
        ))
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, product: &Product) -> Result<Product, AppError> {
        let result = sqlx::query(
            "UPDATE products SET name = $1, description = $2, sku = $3, barcode = $4, price = $5, cost = $6, \
             quantity = $7, minimum_stock_level = $8, category_id = $9, updated_at = $10 WHERE id = $11",
        )
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.sku)
            .bind(&product.barcode)
            .bind(product.price)
            .bind(product.cost)
            .bind(product.quantity)
            .bind(product.minimum_stock_level)
            .bind(&product.category_id)
            .bind(product.updated_at)
            .bind(&product.id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product not found".into()));
        }

        self.get(&product.id).await
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres product deletion failed: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product not found".into()));
        }
        Ok(())
    }

    async fn sku_exists(&self, sku: &str, exclude_id: Option<&str>) -> Result<bool, AppError> {
        match exclude_id {
            Some(id) => sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM products WHERE sku = $1 AND id != $2)",
            )
                .bind(sku)
                .bind(id)
                .fetch_one(&self.pool)
                .await,
            None => sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE sku = $1)")
                .bind(sku)
                .fetch_one(&self.pool)
                .await,
        }
        .map_err(AppError::Database)
    }

    async fn barcode_exists(&self, barcode: &str, exclude_id: Option<&str>) -> Result<bool, AppError> {
        match exclude_id {
            Some(id) => sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM products WHERE barcode = $1 AND id != $2)",
            )
                .bind(barcode)
                .bind(id)
                .fetch_one(&self.pool)
                .await,
            None => sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE barcode = $1)")
                .bind(barcode)
                .fetch_one(&self.pool)
                .await,
        }
        .map_err(AppError::Database)
    }
}
