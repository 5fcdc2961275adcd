//! Category API endpoints
//!
//! Provides REST API endpoints for category management (auth required):
//! - POST /api/protected/categories - Create a new category
//! - GET /api/protected/categories - List all categories
//! - GET /api/protected/categories/{id} - Get category by ID
//! - PUT /api/protected/categories/{id} - Update category
//! - DELETE /api/protected/categories/{id} - Delete category

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::auth::guard::{AuthGuard, GuardError};
use crate::core::db::models::Category;
use crate::core::db::repositories::{CategoryRepository, CategoryRepositoryError};

/// Maximum category name length
const MAX_NAME_LEN: usize = 100;

/// Maximum category description length
const MAX_DESCRIPTION_LEN: usize = 500;

/// Category API state containing the category repository and session guard
#[derive(Clone)]
pub struct CategoryApiState {
    pub categories: CategoryRepository,
    pub guard: AuthGuard,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

/// Category API error types
#[derive(Debug, thiserror::Error)]
pub enum CategoryApiError {
    #[error(transparent)]
    Unauthorized(#[from] GuardError),

    #[error("Category not found")]
    NotFound,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<CategoryRepositoryError> for CategoryApiError {
    fn from(err: CategoryRepositoryError) -> Self {
        match err {
            CategoryRepositoryError::NotFound => CategoryApiError::NotFound,
            CategoryRepositoryError::DatabaseError(e) => {
                CategoryApiError::InternalError(e.to_string())
            }
        }
    }
}

impl IntoResponse for CategoryApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code) = match self {
            // Delegate to the guard's own unauthorized mapping
            CategoryApiError::Unauthorized(guard_err) => return guard_err.into_response(),
            CategoryApiError::NotFound => (StatusCode::NOT_FOUND, "CATEGORY_NOT_FOUND"),
            CategoryApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            CategoryApiError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
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

/// Request for creating a new category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request for updating a category
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Response for a single category
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
        }
    }
}

/// Response for category list
#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryResponse>,
    pub count: usize,
}

/// Response for delete operation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: i64,
}

/// Validate and normalize a category name/description pair
fn validate_category_input(
    name: &str,
    description: &str,
) -> Result<(String, String), CategoryApiError> {
    let name = name.trim();
    let description = description.trim();

    if name.is_empty() {
        return Err(CategoryApiError::BadRequest(
            "Category name cannot be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CategoryApiError::BadRequest(
            "Category name too long (max 100 characters)".to_string(),
        ));
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(CategoryApiError::BadRequest(
            "Category description too long (max 500 characters)".to_string(),
        ));
    }

    Ok((name.to_string(), description.to_string()))
}

// ============================================================================
// Router
// ============================================================================

/// Create the category API router
pub fn category_api_router(state: CategoryApiState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/protected/categories", post(create_category_handler))
        .route("/api/protected/categories", get(list_categories_handler))
        .route("/api/protected/categories/{id}", get(get_category_handler))
        .route(
            "/api/protected/categories/{id}",
            put(update_category_handler),
        )
        .route(
            "/api/protected/categories/{id}",
            delete(delete_category_handler),
        )
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/protected/categories
/// Create a new category
async fn create_category_handler(
    State(state): State<Arc<CategoryApiState>>,
    headers: HeaderMap,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), CategoryApiError> {
    let claims = state.guard.authenticate(&headers)?;

    let (name, description) = validate_category_input(&request.name, &request.description)?;

    tracing::info!("Creating category '{}' (user {})", name, claims.uid);

    let category = state.categories.create(&name, &description).await?;

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// GET /api/protected/categories
/// List all categories
async fn list_categories_handler(
    State(state): State<Arc<CategoryApiState>>,
    headers: HeaderMap,
) -> Result<Json<CategoryListResponse>, CategoryApiError> {
    state.guard.authenticate(&headers)?;

    let categories = state.categories.list_all().await?;

    let count = categories.len();
    let categories: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();

    Ok(Json(CategoryListResponse { categories, count }))
}

/// GET /api/protected/categories/{id}
/// Get a category by ID
async fn get_category_handler(
    State(state): State<Arc<CategoryApiState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<CategoryResponse>, CategoryApiError> {
    state.guard.authenticate(&headers)?;

    let category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or(CategoryApiError::NotFound)?;

    Ok(Json(category.into()))
}

/// PUT /api/protected/categories/{id}
/// Update a category
async fn update_category_handler(
    State(state): State<Arc<CategoryApiState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, CategoryApiError> {
    let claims = state.guard.authenticate(&headers)?;

    let (name, description) = validate_category_input(&request.name, &request.description)?;

    tracing::info!("Updating category {} (user {})", id, claims.uid);

    let category = state.categories.update(id, &name, &description).await?;

    Ok(Json(category.into()))
}

/// DELETE /api/protected/categories/{id}
/// Delete a category
async fn delete_category_handler(
    State(state): State<Arc<CategoryApiState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, CategoryApiError> {
    let claims = state.guard.authenticate(&headers)?;

    tracing::info!("Deleting category {} (user {})", id, claims.uid);

    state.categories.delete(id).await?;

    Ok(Json(DeleteResponse { deleted: true, id }))
}
