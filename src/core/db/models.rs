//! Database models
//!
//! This module defines the database entity structs that map to PostgreSQL
//! tables, plus the request/response shapes derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// User Model
// ============================================================================

/// User entity representing a registered user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

/// User without sensitive data (for API responses)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub avatar_url: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            avatar_url: user.avatar_url,
        }
    }
}

// ============================================================================
// Category Model
// ============================================================================

/// Category entity for grouping tasks
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
}

// ============================================================================
// Task Model
// ============================================================================

/// Task lifecycle states, stored as SMALLINT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(into = "i16", try_from = "i16")]
#[repr(i16)]
pub enum TaskState {
    NotStarted = 1,
    InProgress = 2,
    Completed = 3,
}

impl TaskState {
    /// Display name for a state
    pub fn name(&self) -> &'static str {
        match self {
            TaskState::NotStarted => "Not Started",
            TaskState::InProgress => "In Progress",
            TaskState::Completed => "Completed",
        }
    }
}

impl From<TaskState> for i16 {
    fn from(state: TaskState) -> Self {
        state as i16
    }
}

impl TryFrom<i16> for TaskState {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TaskState::NotStarted),
            2 => Ok(TaskState::InProgress),
            3 => Ok(TaskState::Completed),
            other => Err(format!("invalid task state: {}", other)),
        }
    }
}

/// Task entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub task_text: String,
    pub state: TaskState,
    pub creation_date: DateTime<Utc>,
    pub end_date: Option<NaiveDate>,
}

/// Task data for creation
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub task_text: String,
    pub end_date: Option<NaiveDate>,
}

/// Task representation for API responses
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub task_text: String,
    pub state: TaskState,
    pub state_name: &'static str,
    pub category_id: Option<i64>,
    pub user_id: i64,
    pub creation_date: DateTime<Utc>,
    pub end_date: Option<NaiveDate>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            task_text: task.task_text,
            state: task.state,
            state_name: task.state.name(),
            category_id: task.category_id,
            user_id: task.user_id,
            creation_date: task.creation_date,
            end_date: task.end_date,
        }
    }
}
