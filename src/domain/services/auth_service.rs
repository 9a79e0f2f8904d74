use std::sync::Arc;
use crate::domain::{
    models::{auth::Claims, user::User},
    ports::UserRepository,
};
use crate::error::AppError;
use crate::config::Config;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use chrono::{Duration, Utc};
use tracing::{info, warn};

/// Tokens are valid for a fixed window; there is no refresh mechanism.
const TOKEN_VALIDITY_HOURS: i64 = 8;

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, config: &Config) -> Self {
        Self {
            user_repo,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// Verifies credentials and issues a signed token. A missing user, an
    /// inactive account and a wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String), AppError> {
        let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

        let user = self.user_repo.find_by_username(username).await?;
        let user = match user {
            Some(u) if u.is_active => u,
            _ => {
                warn!("Failed login attempt - user not found or inactive: {}", username);
                return Err(invalid());
            }
        };

        if !Self::verify_password(password, &user.password_hash) {
            warn!("Failed login attempt - invalid password for user: {}", username);
            return Err(invalid());
        }

        let now = Utc::now();
        self.user_repo.set_last_login(&user.id, now).await?;

        let token = self.issue_token(&user)?;
        info!("User logged in: {} ({})", user.username, user.role);
        Ok((user, token))
    }

    fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(TOKEN_VALIDITY_HOURS)).timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("JWT encoding failed: {}", e);
            AppError::Internal
        })
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
    }

    /// Boolean check used by the validate endpoint: every failure mode is
    /// reported as `false`, never as an error.
    pub fn validate_token(&self, token: &str) -> bool {
        self.decode_token(token).is_ok()
    }

    pub fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|_| AppError::Internal)
    }

    pub fn verify_password(password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
