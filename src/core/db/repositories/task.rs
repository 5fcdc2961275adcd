//! Task repository for database operations

use sqlx::PgPool;

use crate::core::db::models::{CreateTask, Task, TaskState};

/// Task repository error types
#[derive(Debug, thiserror::Error)]
pub enum TaskRepositoryError {
    #[error("Task not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Task repository for database operations
#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    /// Create a new task repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new task in the Not Started state
    pub async fn create(&self, dto: &CreateTask) -> Result<Task, TaskRepositoryError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, category_id, task_text, end_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, category_id, task_text, state, creation_date, end_date
            "#,
        )
        .bind(dto.user_id)
        .bind(dto.category_id)
        .bind(&dto.task_text)
        .bind(dto.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    /// Find a task by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Task>, TaskRepositoryError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, category_id, task_text, state, creation_date, end_date
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// List a user's tasks with optional category and state filters
    pub async fn list_by_user(
        &self,
        user_id: i64,
        category_id: Option<i64>,
        state: Option<TaskState>,
    ) -> Result<Vec<Task>, TaskRepositoryError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, category_id, task_text, state, creation_date, end_date
            FROM tasks
            WHERE user_id = $1
              AND ($2::BIGINT IS NULL OR category_id = $2)
              AND ($3::SMALLINT IS NULL OR state = $3)
            ORDER BY creation_date DESC
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .bind(state.map(i16::from))
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Update a task's lifecycle state
    pub async fn update_state(
        &self,
        id: i64,
        state: TaskState,
    ) -> Result<Task, TaskRepositoryError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET state = $2
            WHERE id = $1
            RETURNING id, user_id, category_id, task_text, state, creation_date, end_date
            "#,
        )
        .bind(id)
        .bind(i16::from(state))
        .fetch_optional(&self.pool)
        .await?;

        task.ok_or(TaskRepositoryError::NotFound)
    }

    /// Delete a task by ID
    pub async fn delete(&self, id: i64) -> Result<(), TaskRepositoryError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskRepositoryError::NotFound);
        }

        Ok(())
    }
}
