use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use crate::api::dtos::requests::{CreateUserRequest, PageParams, UpdateUserRequest};
use crate::api::dtos::responses::{PagedResult, UserDto};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::user::{Role, User};
use crate::domain::services::auth_service::AuthService;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(page): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::SuperAdmin)?;

    if let Some((page_number, page_size)) = page.page_args()? {
        let (items, total_count) = state.user_repo.list_paged(page_number, page_size).await?;
        let items: Vec<UserDto> = items.into_iter().map(UserDto::from).collect();
        return Ok(Json(PagedResult::new(items, total_count, page_number, page_size)).into_response());
    }

    let users = state.user_repo.list().await?;
    let users: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();
    Ok(Json(users).into_response())
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::SuperAdmin)?;

    let found = state.user_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound(format!("User with ID {id} not found")))?;
    Ok(Json(UserDto::from(found)))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::SuperAdmin)?;

    if state.user_repo.find_by_username(&payload.username).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Username '{}' already exists", payload.username
        )));
    }

    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Email '{}' already exists", payload.email
        )));
    }

    let password_hash = AuthService::hash_password(&payload.password)?;
    let new_user = User::new(
        payload.username,
        payload.email,
        password_hash,
        payload.role,
        payload.is_active.unwrap_or(true),
    );

    let created = state.user_repo.create(&new_user).await?;
    info!("User created. id: {}, username: {}", created.id, created.username);

    Ok((StatusCode::CREATED, Json(UserDto::from(created))))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::SuperAdmin)?;

    if payload.id != id {
        return Err(AppError::Validation("ID mismatch".to_string()));
    }

    let mut target = state.user_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound(format!("User with ID {id} not found")))?;

    if target.username != payload.username {
        if let Some(existing) = state.user_repo.find_by_username(&payload.username).await? {
            if existing.id != id {
                return Err(AppError::Conflict(format!(
                    "Username '{}' already exists", payload.username
                )));
            }
        }
    }

    if target.email != payload.email {
        if let Some(existing) = state.user_repo.find_by_email(&payload.email).await? {
            if existing.id != id {
                return Err(AppError::Conflict(format!(
                    "Email '{}' already exists", payload.email
                )));
            }
        }
    }

    target.username = payload.username;
    target.email = payload.email;
    target.role = payload.role;
    target.is_active = payload.is_active;

    // Rotate the password only when a new one is supplied.
    if let Some(password) = payload.password.as_deref().filter(|p| !p.is_empty()) {
        target.password_hash = AuthService::hash_password(password)?;
    }

    target.updated_at = Utc::now();

    let updated = state.user_repo.update(&target).await?;
    Ok(Json(UserDto::from(updated)))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::SuperAdmin)?;

    state.user_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound(format!("User with ID {id} not found")))?;

    state.user_repo.delete(&id).await?;
    info!("User deleted. id: {}", id);

    Ok(StatusCode::NO_CONTENT)
}
