use crate::domain::{models::product::Product, ports::ProductRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::error;

// Reads carry the joined category name.
const SELECT_PRODUCT: &str = "SELECT p.id, p.name, p.description, p.sku, p.barcode, p.price, p.cost, \
     p.quantity, p.minimum_stock_level, p.category_id, c.name AS category_name, \
     p.created_at, p.updated_at \
     FROM products p LEFT JOIN categories c ON c.id = p.category_id";

pub struct SqliteProductRepo {
    pool: SqlitePool,
}

impl SqliteProductRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn get(&self, id: &str) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.id = ?"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepo {
    async fn create(&self, product: &Product) -> Result<Product, AppError> {
        sqlx::query(
            "INSERT INTO products (id, name, description, sku, barcode, price, cost, quantity, minimum_stock_level, category_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
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
        sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.sku = ?"))
            .bind(sku)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.barcode = ?"))
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
            "{SELECT_PRODUCT} ORDER BY p.name ASC LIMIT ? OFFSET ?"
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
            "{SELECT_PRODUCT} WHERE p.category_id = ? ORDER BY p.name ASC"
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
            "{SELECT_PRODUCT} WHERE LOWER(p.name) LIKE ? OR LOWER(p.sku) LIKE ? \
             OR LOWER(COALESCE(p.barcode, '')) LIKE ? OR LOWER(COALESCE(p.description, '')) LIKE ? \
             ORDER BY p.name ASC"
        ))
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, product: &Product) -> Result<Product, AppError> {
        let result = sqlx::query(
            "UPDATE products SET name = ?, description = ?, sku = ?, barcode = ?, price = ?, cost = ?, \
             quantity = ?, minimum_stock_level = ?, category_id = ?, updated_at = ? WHERE id = ?",
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
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("SQLite product deletion failed: {:?}", e);
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
                "SELECT EXISTS(SELECT 1 FROM products WHERE sku = ? AND id != ?)",
            )
                .bind(sku)
                .bind(id)
                .fetch_one(&self.pool)
                .await,
            None => sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE sku = ?)")
                .bind(sku)
                .fetch_one(&self.pool)
                .await,
        }
        .map_err(AppError::Database)
    }

    async fn barcode_exists(&self, barcode: &str, exclude_id: Option<&str>) -> Result<bool, AppError> {
        match exclude_id {
            Some(id) => sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM products WHERE barcode = ? AND id != ?)",
            )
                .bind(barcode)
                .bind(id)
                .fetch_one(&self.pool)
                .await,
            None => sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE barcode = ?)")
                .bind(barcode)
                .fetch_one(&self.pool)
                .await,
        }
        .map_err(AppError::Database)
    }
}
