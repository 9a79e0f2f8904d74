use axum::{extract::State, response::IntoResponse, Json};
use crate::api::dtos::requests::{LoginRequest, ValidateTokenRequest};
use crate::api::dtos::responses::AuthResponse;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (user, token) = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        user_id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
        token,
    }))
}

/// Plain boolean body; bad tokens are a `false`, never an error.
pub async fn validate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ValidateTokenRequest>,
) -> impl IntoResponse {
    Json(state.auth_service.validate_token(&payload.token))
}
