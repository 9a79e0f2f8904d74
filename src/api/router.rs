use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, categories, health, products, reports, stock_movements, users};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/validate", post(auth::validate))

        // Categories
        .route("/api/categories", get(categories::list_categories).post(categories::create_category))
        .route("/api/categories/{id}", get(categories::get_category).put(categories::update_category).delete(categories::delete_category))

        // Products
        .route("/api/products", get(products::list_products).post(products::create_product))
        .route("/api/products/search", get(products::search_products))
        .route("/api/products/low-stock", get(products::list_low_stock_products))
        .route("/api/products/sku/{sku}", get(products::get_product_by_sku))
        .route("/api/products/barcode/{barcode}", get(products::get_product_by_barcode))
        .route("/api/products/category/{category_id}", get(products::list_products_by_category))
        .route("/api/products/{id}", get(products::get_product).put(products::update_product).delete(products::delete_product))

        // Stock ledger
        .route("/api/stock-movements", get(stock_movements::list_movements))
        .route("/api/stock-movements/product/{product_id}", get(stock_movements::list_movements_by_product))
        .route("/api/stock-movements/date-range", get(stock_movements::list_movements_by_date_range))
        .route("/api/stock-movements/add", post(stock_movements::add_stock))
        .route("/api/stock-movements/remove", post(stock_movements::remove_stock))
        .route("/api/stock-movements/adjust", post(stock_movements::adjust_stock))

        // Reports
        .route("/api/reports/stock", get(reports::stock_report))
        .route("/api/reports/low-stock", get(reports::low_stock_report))
        .route("/api/reports/movements", get(reports::movement_history))

        // Users
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/{id}", get(users::get_user).put(users::update_user).delete(users::delete_user))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
