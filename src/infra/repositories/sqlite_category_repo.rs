use crate::domain::{models::category::Category, ports::CategoryRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

const SELECT_CATEGORY: &str = "SELECT c.id, c.name, c.description, \
     (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS product_count, \
     c.created_at \
     FROM categories c";

pub struct SqliteCategoryRepo {
    pool: SqlitePool,
}

impl SqliteCategoryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn get(&self, id: &str) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(&format!("{SELECT_CATEGORY} WHERE c.id = ?"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepo {
    async fn create(&self, category: &Category) -> Result<Category, AppError> {
        sqlx::query("INSERT INTO categories (id, name, description, created_at) VALUES (?, ?, ?, ?)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.description)
            .bind(category.created_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        self.get(&category.id).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>(&format!("{SELECT_CATEGORY} WHERE c.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, Category>(&format!("{SELECT_CATEGORY} ORDER BY c.name ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, category: &Category) -> Result<Category, AppError> {
        let result = sqlx::query("UPDATE categories SET name = ?, description = ? WHERE id = ?")
            .bind(&category.name)
            .bind(&category.description)
            .bind(&category.id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".into()));
        }

        self.get(&category.id).await
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".into()));
        }
        Ok(())
    }

    async fn name_exists(&self, name: &str, exclude_id: Option<&str>) -> Result<bool, AppError> {
        match exclude_id {
            Some(id) => sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE name = ? AND id != ?)",
            )
                .bind(name)
                .bind(id)
                .fetch_one(&self.pool)
                .await,
            None => sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE name = ?)")
                .bind(name)
                .fetch_one(&self.pool)
                .await,
        }
        .map_err(AppError::Database)
    }
}
