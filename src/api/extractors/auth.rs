use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use crate::domain::models::auth::CurrentUser;
use crate::domain::models::user::Role;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::Span;

pub struct AuthUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid authorization header".to_string()))?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let claims = app_state.auth_service.decode_token(token)?;

        let user = CurrentUser::from(claims);

        Span::current().record("user_id", user.id.as_str());

        Ok(AuthUser(user))
    }
}

impl AuthUser {
    /// Role gate: the caller's tier must be at least `min`.
    pub fn require(&self, min: Role) -> Result<(), AppError> {
        if self.0.role >= min {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!("Requires {min} role or higher")))
        }
    }
}
