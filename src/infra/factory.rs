use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::models::{
    category::Category,
    product::{NewProductParams, Product},
    user::{Role, User},
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::stock_service::StockService;
use crate::infra::repositories::{
    postgres_category_repo::PostgresCategoryRepo, postgres_product_repo::PostgresProductRepo,
    postgres_stock_movement_repo::PostgresStockMovementRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_category_repo::SqliteCategoryRepo, sqlite_product_repo::SqliteProductRepo,
    sqlite_stock_movement_repo::SqliteStockMovementRepo, sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let product_repo = Arc::new(PostgresProductRepo::new(pool.clone()));
        let movement_repo = Arc::new(PostgresStockMovementRepo::new(pool.clone()));
        let user_repo = Arc::new(PostgresUserRepo::new(pool.clone()));

        AppState {
            config: config.clone(),
            product_repo: product_repo.clone(),
            category_repo: Arc::new(PostgresCategoryRepo::new(pool.clone())),
            movement_repo: movement_repo.clone(),
            user_repo: user_repo.clone(),
            auth_service: Arc::new(AuthService::new(user_repo, config)),
            stock_service: Arc::new(StockService::new(movement_repo, product_repo)),
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let product_repo = Arc::new(SqliteProductRepo::new(pool.clone()));
        let movement_repo = Arc::new(SqliteStockMovementRepo::new(pool.clone()));
        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));

        AppState {
            config: config.clone(),
            product_repo: product_repo.clone(),
            category_repo: Arc::new(SqliteCategoryRepo::new(pool.clone())),
            movement_repo: movement_repo.clone(),
            user_repo: user_repo.clone(),
            auth_service: Arc::new(AuthService::new(user_repo, config)),
            stock_service: Arc::new(StockService::new(movement_repo, product_repo)),
        }
    };

    if config.seed_on_startup {
        seed_database(&state).await.expect("Failed to seed database");
    }

    state
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}

/// Seeds one user per role plus a small demo catalog, but only into an empty
/// database so restarts never duplicate data.
pub async fn seed_database(state: &AppState) -> Result<(), crate::error::AppError> {
    if !state.user_repo.list().await?.is_empty() {
        return Ok(());
    }

    info!("Seeding database with default users and demo catalog...");

    let defaults = [
        ("admin", "admin@inventory.local", "admin123", Role::SuperAdmin),
        ("moderator", "moderator@inventory.local", "moderator123", Role::Moderator),
        ("cashier", "cashier@inventory.local", "cashier123", Role::Cashier),
    ];

    for (username, email, password, role) in defaults {
        let hash = AuthService::hash_password(password)?;
        let user = User::new(username.to_string(), email.to_string(), hash, role, true);
        state.user_repo.create(&user).await?;
    }

    let electronics = Category::new(
        "Electronics".to_string(),
        Some("Electronic devices and accessories".to_string()),
    );
    let groceries = Category::new("Groceries".to_string(), Some("Food and beverages".to_string()));
    state.category_repo.create(&electronics).await?;
    state.category_repo.create(&groceries).await?;

    let demo_products = [
        ("Wireless Mouse", "ELEC-001", 29.99, 12.50, 50, 10, &electronics),
        ("USB-C Cable", "ELEC-002", 9.99, 2.10, 200, 25, &electronics),
        ("Coffee Beans 1kg", "GROC-001", 18.50, 9.00, 30, 5, &groceries),
    ];

    for (name, sku, price, cost, quantity, min_level, category) in demo_products {
        let product = Product::new(NewProductParams {
            name: name.to_string(),
            description: None,
            sku: sku.to_string(),
            barcode: None,
            price,
            cost,
            initial_quantity: quantity,
            minimum_stock_level: min_level,
            category_id: Some(category.id.clone()),
        });
        state.product_repo.create(&product).await?;
    }

    info!("Database seeded");
    Ok(())
}
