use inventory_backend::{
    api::router::create_router,
    config::Config,
    domain::models::user::{Role, User},
    domain::services::auth_service::AuthService,
    domain::services::stock_service::StockService,
    infra::repositories::{
        sqlite_category_repo::SqliteCategoryRepo,
        sqlite_product_repo::SqliteProductRepo,
        sqlite_stock_movement_repo::SqliteStockMovementRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret: "test-secret-key-for-integration-tests".to_string(),
            seed_on_startup: false,
        };

        let product_repo = Arc::new(SqliteProductRepo::new(pool.clone()));
        let movement_repo = Arc::new(SqliteStockMovementRepo::new(pool.clone()));
        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            product_repo: product_repo.clone(),
            category_repo: Arc::new(SqliteCategoryRepo::new(pool.clone())),
            movement_repo: movement_repo.clone(),
            user_repo: user_repo.clone(),
            auth_service: Arc::new(AuthService::new(user_repo.clone(), &config)),
            stock_service: Arc::new(StockService::new(movement_repo, product_repo)),
        });

        // One account per role so every gate can be exercised.
        for (username, email, password, role) in [
            ("admin", "admin@test.local", "admin123", Role::SuperAdmin),
            ("moderator", "moderator@test.local", "moderator123", Role::Moderator),
            ("cashier", "cashier@test.local", "cashier123", Role::Cashier),
        ] {
            let hash = AuthService::hash_password(password).unwrap();
            let user = User::new(username.to_string(), email.to_string(), hash, role, true);
            state.user_repo.create(&user).await.unwrap();
        }

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;

        assert!(
            response.status().is_success(),
            "Login failed in test helper: status {}",
            response.status()
        );

        let body = read_body(response).await;
        body["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn read_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
