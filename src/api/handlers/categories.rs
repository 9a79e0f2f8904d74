use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::CategoryRequest;
use crate::api::dtos::responses::CategoryDto;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::category::Category;
use crate::domain::models::user::Role;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.category_repo.list().await?;
    let categories: Vec<CategoryDto> = categories.into_iter().map(CategoryDto::from).collect();
    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category = state.category_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound(format!("Category with ID {id} not found")))?;
    Ok(Json(CategoryDto::from(category)))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Moderator)?;

    if state.category_repo.name_exists(&payload.name, None).await? {
        return Err(AppError::Conflict(format!(
            "Category '{}' already exists", payload.name
        )));
    }

    let category = Category::new(payload.name, payload.description);
    let created = state.category_repo.create(&category).await?;
    info!("Category created. id: {}, name: {}", created.id, created.name);

    Ok((StatusCode::CREATED, Json(CategoryDto::from(created))))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<CategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Moderator)?;

    let mut category = state.category_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound(format!("Category with ID {id} not found")))?;

    if state.category_repo.name_exists(&payload.name, Some(&id)).await? {
        return Err(AppError::Conflict(format!(
            "Category '{}' already exists", payload.name
        )));
    }

    category.name = payload.name;
    category.description = payload.description;

    let updated = state.category_repo.update(&category).await?;
    Ok(Json(CategoryDto::from(updated)))
}

/// Deletion is blocked, not cascaded, while products still reference the
/// category.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Moderator)?;

    let category = state.category_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound(format!("Category with ID {id} not found")))?;

    if category.product_count > 0 {
        warn!(
            "Cannot delete category {} ({} associated products)",
            category.name, category.product_count
        );
        return Err(AppError::Conflict(format!(
            "Cannot delete category '{}' because it has associated products",
            category.name
        )));
    }

    state.category_repo.delete(&id).await?;
    info!("Category deleted. id: {}", id);

    Ok(StatusCode::NO_CONTENT)
}
