//! Task API endpoints
//!
//! Provides REST API endpoints for task management (auth required):
//! - POST /api/protected/tasks - Create a task with optional category and due date
//! - GET /api/protected/tasks - List the user's tasks with optional filters
//! - PUT /api/protected/tasks/{id}/state - Move a task through its lifecycle
//! - DELETE /api/protected/tasks/{id} - Delete a task
//!
//! Tasks are owner-scoped: a task belonging to another user reads as
//! not-found rather than forbidden.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::auth::guard::{AuthGuard, GuardError};
use crate::core::db::models::{CreateTask, TaskResponse, TaskState};
use crate::core::db::repositories::{
    CategoryRepository, TaskRepository, TaskRepositoryError,
};

/// Maximum task text length
const MAX_TASK_TEXT_LEN: usize = 1000;

/// Task API state containing repositories and the session guard
#[derive(Clone)]
pub struct TaskApiState {
    pub tasks: TaskRepository,
    pub categories: CategoryRepository,
    pub guard: AuthGuard,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

/// Task API error types
#[derive(Debug, thiserror::Error)]
pub enum TaskApiError {
    #[error(transparent)]
    Unauthorized(#[from] GuardError),

    #[error("Task not found")]
    NotFound,

    #[error("Category does not exist")]
    CategoryNotFound,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<TaskRepositoryError> for TaskApiError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound => TaskApiError::NotFound,
            TaskRepositoryError::DatabaseError(e) => TaskApiError::InternalError(e.to_string()),
        }
    }
}

impl From<crate::core::db::repositories::CategoryRepositoryError> for TaskApiError {
    fn from(err: crate::core::db::repositories::CategoryRepositoryError) -> Self {
        TaskApiError::InternalError(err.to_string())
    }
}

impl IntoResponse for TaskApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code) = match self {
            // Delegate to the guard's own unauthorized mapping
            TaskApiError::Unauthorized(guard_err) => return guard_err.into_response(),
            TaskApiError::NotFound => (StatusCode::NOT_FOUND, "TASK_NOT_FOUND"),
            TaskApiError::CategoryNotFound => (StatusCode::BAD_REQUEST, "CATEGORY_NOT_FOUND"),
            TaskApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            TaskApiError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ApiError {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Request for creating a new task
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub task_text: String,
    /// Optional due date, format YYYY-MM-DD
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Request for updating a task's lifecycle state
#[derive(Debug, Deserialize)]
pub struct UpdateTaskStateRequest {
    pub state: i16,
}

/// Query parameters for listing tasks
#[derive(Debug, Deserialize, Default)]
pub struct ListTasksQuery {
    /// Filter by category
    pub category_id: Option<i64>,
    /// Filter by state id
    pub state: Option<i16>,
}

/// Response for task list
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
    pub count: usize,
}

/// Response for delete operation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: i64,
}

/// Validate and normalize task text
fn validate_task_text(text: &str) -> Result<String, TaskApiError> {
    let text = text.trim();

    if text.is_empty() {
        return Err(TaskApiError::BadRequest(
            "Task text cannot be empty".to_string(),
        ));
    }
    if text.len() > MAX_TASK_TEXT_LEN {
        return Err(TaskApiError::BadRequest(
            "Task text too long (max 1000 characters)".to_string(),
        ));
    }

    Ok(text.to_string())
}

/// Parse an optional YYYY-MM-DD due date, rejecting dates in the past
fn parse_end_date(raw: Option<&str>) -> Result<Option<NaiveDate>, TaskApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        TaskApiError::BadRequest("Invalid end date format, use YYYY-MM-DD".to_string())
    })?;

    if date < Utc::now().date_naive() {
        return Err(TaskApiError::BadRequest(
            "End date cannot be in the past".to_string(),
        ));
    }

    Ok(Some(date))
}

/// Parse a state id into a task state
fn parse_state(raw: i16) -> Result<TaskState, TaskApiError> {
    TaskState::try_from(raw).map_err(TaskApiError::BadRequest)
}

// ============================================================================
// Router
// ============================================================================

/// Create the task API router
pub fn task_api_router(state: TaskApiState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/protected/tasks", post(create_task_handler))
        .route("/api/protected/tasks", get(list_tasks_handler))
        .route(
            "/api/protected/tasks/{id}/state",
            put(update_task_state_handler),
        )
        .route("/api/protected/tasks/{id}", delete(delete_task_handler))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/protected/tasks
/// Create a new task for the authenticated user
async fn create_task_handler(
    State(state): State<Arc<TaskApiState>>,
    headers: HeaderMap,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), TaskApiError> {
    let claims = state.guard.authenticate(&headers)?;

    let task_text = validate_task_text(&request.task_text)?;
    let end_date = parse_end_date(request.end_date.as_deref())?;

    if let Some(category_id) = request.category_id {
        if !state.categories.exists(category_id).await? {
            return Err(TaskApiError::CategoryNotFound);
        }
    }

    tracing::info!("Creating task for user {}", claims.uid);

    let task = state
        .tasks
        .create(&CreateTask {
            user_id: claims.uid,
            category_id: request.category_id,
            task_text,
            end_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// GET /api/protected/tasks
/// List the authenticated user's tasks with optional filters
async fn list_tasks_handler(
    State(state): State<Arc<TaskApiState>>,
    headers: HeaderMap,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<TaskListResponse>, TaskApiError> {
    let claims = state.guard.authenticate(&headers)?;

    let state_filter = query.state.map(parse_state).transpose()?;

    tracing::debug!(
        "Listing tasks for user {}, category: {:?}, state: {:?}",
        claims.uid,
        query.category_id,
        state_filter
    );

    let tasks = state
        .tasks
        .list_by_user(claims.uid, query.category_id, state_filter)
        .await?;

    let count = tasks.len();
    let tasks: Vec<TaskResponse> = tasks.into_iter().map(Into::into).collect();

    Ok(Json(TaskListResponse { tasks, count }))
}

/// PUT /api/protected/tasks/{id}/state
/// Move a task to a new lifecycle state
async fn update_task_state_handler(
    State(state): State<Arc<TaskApiState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTaskStateRequest>,
) -> Result<Json<TaskResponse>, TaskApiError> {
    let claims = state.guard.authenticate(&headers)?;

    let new_state = parse_state(request.state)?;

    // Owner check: foreign tasks read as not-found
    let task = state
        .tasks
        .find_by_id(id)
        .await?
        .filter(|t| t.user_id == claims.uid)
        .ok_or(TaskApiError::NotFound)?;

    tracing::info!(
        "Updating task {} state {:?} -> {:?} (user {})",
        task.id,
        task.state,
        new_state,
        claims.uid
    );

    let task = state.tasks.update_state(id, new_state).await?;

    Ok(Json(task.into()))
}

/// DELETE /api/protected/tasks/{id}
/// Delete a task owned by the authenticated user
async fn delete_task_handler(
    State(state): State<Arc<TaskApiState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, TaskApiError> {
    let claims = state.guard.authenticate(&headers)?;

    // Owner check: foreign tasks read as not-found
    state
        .tasks
        .find_by_id(id)
        .await?
        .filter(|t| t.user_id == claims.uid)
        .ok_or(TaskApiError::NotFound)?;

    tracing::info!("Deleting task {} (user {})", id, claims.uid);

    state.tasks.delete(id).await?;

    Ok(Json(DeleteResponse { deleted: true, id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    // ========================================================================
    // Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_task_text_valid() {
        assert_eq!(validate_task_text("write the report").unwrap(), "write the report");
        assert_eq!(validate_task_text("  padded  ").unwrap(), "padded");
    }

    #[test]
    fn test_validate_task_text_empty() {
        assert!(validate_task_text("").is_err());
        assert!(validate_task_text("   ").is_err());
    }

    #[test]
    fn test_validate_task_text_too_long() {
        let long = "x".repeat(1001);
        assert!(validate_task_text(&long).is_err());

        let max = "x".repeat(1000);
        assert!(validate_task_text(&max).is_ok());
    }

    #[test]
    fn test_parse_end_date_none() {
        assert_eq!(parse_end_date(None).unwrap(), None);
        assert_eq!(parse_end_date(Some("")).unwrap(), None);
        assert_eq!(parse_end_date(Some("  ")).unwrap(), None);
    }

    #[test]
    fn test_parse_end_date_valid_future() {
        let tomorrow = Utc::now().date_naive() + Duration::days(1);
        let raw = tomorrow.format("%Y-%m-%d").to_string();

        assert_eq!(parse_end_date(Some(&raw)).unwrap(), Some(tomorrow));
    }

    #[test]
    fn test_parse_end_date_today_allowed() {
        let today = Utc::now().date_naive();
        let raw = today.format("%Y-%m-%d").to_string();

        assert_eq!(parse_end_date(Some(&raw)).unwrap(), Some(today));
    }

    #[test]
    fn test_parse_end_date_past_rejected() {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        let raw = yesterday.format("%Y-%m-%d").to_string();

        assert!(parse_end_date(Some(&raw)).is_err());
    }

    #[test]
    fn test_parse_end_date_bad_format() {
        assert!(parse_end_date(Some("01-01-2030")).is_err());
        assert!(parse_end_date(Some("2030/01/01")).is_err());
        assert!(parse_end_date(Some("soon")).is_err());
    }

    #[test]
    fn test_parse_state() {
        assert_eq!(parse_state(1).unwrap(), TaskState::NotStarted);
        assert_eq!(parse_state(3).unwrap(), TaskState::Completed);
        assert!(parse_state(0).is_err());
        assert!(parse_state(9).is_err());
    }

    // ========================================================================
    // Error Mapping Tests
    // ========================================================================

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            TaskApiError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TaskApiError::CategoryNotFound.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TaskApiError::BadRequest("bad".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TaskApiError::Unauthorized(GuardError::InvalidToken)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
    }

    // ========================================================================
    // DTO Tests
    // ========================================================================

    #[test]
    fn test_create_task_request_minimal() {
        let request: CreateTaskRequest =
            serde_json::from_str(r#"{"task_text":"write the report"}"#).unwrap();

        assert_eq!(request.task_text, "write the report");
        assert_eq!(request.end_date, None);
        assert_eq!(request.category_id, None);
    }

    #[test]
    fn test_create_task_request_full() {
        let request: CreateTaskRequest = serde_json::from_str(
            r#"{"task_text":"write the report","end_date":"2030-06-01","category_id":4}"#,
        )
        .unwrap();

        assert_eq!(request.end_date.as_deref(), Some("2030-06-01"));
        assert_eq!(request.category_id, Some(4));
    }

    #[test]
    fn test_update_state_request_deserialization() {
        let request: UpdateTaskStateRequest = serde_json::from_str(r#"{"state":2}"#).unwrap();
        assert_eq!(request.state, 2);
    }

    #[test]
    fn test_list_tasks_query_defaults() {
        let query = ListTasksQuery::default();
        assert_eq!(query.category_id, None);
        assert_eq!(query.state, None);
    }
}
