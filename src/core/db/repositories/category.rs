//! Category repository for database operations

use sqlx::PgPool;

use crate::core::db::models::Category;

/// Category repository error types
#[derive(Debug, thiserror::Error)]
pub enum CategoryRepositoryError {
    #[error("Category not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Category repository for database operations
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new category
    pub async fn create(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Category, CategoryRepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Find a category by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Category>, CategoryRepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// List all categories ordered by name
    pub async fn list_all(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Update an existing category
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        description: &str,
    ) -> Result<Category, CategoryRepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2, description = $3
            WHERE id = $1
            RETURNING id, name, description
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;

        category.ok_or(CategoryRepositoryError::NotFound)
    }

    /// Delete a category by ID
    pub async fn delete(&self, id: i64) -> Result<(), CategoryRepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CategoryRepositoryError::NotFound);
        }

        Ok(())
    }

    /// Check whether a category exists
    pub async fn exists(&self, id: i64) -> Result<bool, CategoryRepositoryError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::pool::{DbConfig, create_pool};

    #[test]
    fn test_error_display() {
        let err = CategoryRepositoryError::NotFound;
        assert_eq!(format!("{}", err), "Category not found");
    }

    // ========================================================================
    // Integration Tests (require real database)
    // ========================================================================

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_category_crud_cycle() {
        let config = DbConfig::from_env().expect("DATABASE_URL must be set");
        let pool = create_pool(&config).await.expect("Failed to create pool");
        let repo = CategoryRepository::new(pool);

        let created = repo.create("Work", "Work-related tasks").await.unwrap();
        assert!(repo.exists(created.id).await.unwrap());

        let updated = repo
            .update(created.id, "Work+", "Updated description")
            .await
            .unwrap();
        assert_eq!(updated.name, "Work+");

        repo.delete(created.id).await.unwrap();
        assert!(!repo.exists(created.id).await.unwrap());

        let result = repo.delete(created.id).await;
        assert!(matches!(result, Err(CategoryRepositoryError::NotFound)));
    }
}
