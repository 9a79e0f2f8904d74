use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use crate::api::dtos::requests::{CreateProductRequest, PageParams, SearchParams, UpdateProductRequest};
use crate::api::dtos::responses::{PagedResult, ProductDto};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::product::{NewProductParams, Product};
use crate::domain::models::user::Role;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn list_products(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(page): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    if let Some((page_number, page_size)) = page.page_args()? {
        let (items, total_count) = state.product_repo.list_paged(page_number, page_size).await?;
        let items: Vec<ProductDto> = items.into_iter().map(ProductDto::from).collect();
        return Ok(Json(PagedResult::new(items, total_count, page_number, page_size)).into_response());
    }

    let products = state.product_repo.list().await?;
    let products: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();
    Ok(Json(products).into_response())
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound(format!("Product with ID {id} not found")))?;
    Ok(Json(ProductDto::from(product)))
}

pub async fn get_product_by_sku(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(sku): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_repo.find_by_sku(&sku).await?
        .ok_or_else(|| AppError::NotFound(format!("Product with SKU {sku} not found")))?;
    Ok(Json(ProductDto::from(product)))
}

pub async fn get_product_by_barcode(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(barcode): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_repo.find_by_barcode(&barcode).await?
        .ok_or_else(|| AppError::NotFound(format!("Product with barcode {barcode} not found")))?;
    Ok(Json(ProductDto::from(product)))
}

pub async fn search_products(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let term = params.term.unwrap_or_default();
    if term.trim().is_empty() {
        return Err(AppError::Validation("Search term is required".to_string()));
    }

    let products = state.product_repo.search(&term).await?;
    let products: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();
    Ok(Json(products))
}

pub async fn list_products_by_category(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(category_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let products = state.product_repo.list_by_category(&category_id).await?;
    let products: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();
    Ok(Json(products))
}

pub async fn list_low_stock_products(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let products = state.product_repo.list_low_stock().await?;
    let products: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();
    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Moderator)?;

    if state.product_repo.sku_exists(&payload.sku, None).await? {
        return Err(AppError::Conflict(format!(
            "Product with SKU '{}' already exists", payload.sku
        )));
    }

    if let Some(barcode) = payload.barcode.as_deref().filter(|b| !b.trim().is_empty()) {
        if state.product_repo.barcode_exists(barcode, None).await? {
            return Err(AppError::Conflict(format!(
                "Product with barcode '{barcode}' already exists"
            )));
        }
    }

    let product = Product::new(NewProductParams {
        name: payload.name,
        description: payload.description,
        sku: payload.sku,
        barcode: payload.barcode,
        price: payload.price,
        cost: payload.cost,
        initial_quantity: payload.initial_quantity,
        minimum_stock_level: payload.minimum_stock_level,
        category_id: payload.category_id,
    });

    let created = state.product_repo.create(&product).await?;
    info!("Product created. id: {}, sku: {}", created.id, created.sku);

    Ok((StatusCode::CREATED, Json(ProductDto::from(created))))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Moderator)?;

    if payload.id != id {
        return Err(AppError::Validation("ID mismatch".to_string()));
    }

    let mut product = state.product_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound(format!("Product with ID {id} not found")))?;

    if state.product_repo.sku_exists(&payload.sku, Some(&id)).await? {
        return Err(AppError::Conflict(format!(
            "Product with SKU '{}' already exists", payload.sku
        )));
    }

    if let Some(barcode) = payload.barcode.as_deref().filter(|b| !b.trim().is_empty()) {
        if state.product_repo.barcode_exists(barcode, Some(&id)).await? {
            return Err(AppError::Conflict(format!(
                "Product with barcode '{barcode}' already exists"
            )));
        }
    }

    product.name = payload.name;
    product.description = payload.description;
    product.sku = payload.sku;
    product.barcode = payload.barcode;
    product.price = payload.price;
    product.cost = payload.cost;
    product.minimum_stock_level = payload.minimum_stock_level;
    product.category_id = payload.category_id;

    // Escape hatch: a quantity here writes through without a ledger entry.
    if let Some(quantity) = payload.quantity {
        warn!(
            "Quantity of product {} set directly to {} (no movement recorded)",
            product.id, quantity
        );
        product.quantity = quantity;
    }

    product.updated_at = Utc::now();

    let updated = state.product_repo.update(&product).await?;
    Ok(Json(ProductDto::from(updated)))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Moderator)?;

    state.product_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound(format!("Product with ID {id} not found")))?;

    state.product_repo.delete(&id).await?;
    info!("Product deleted. id: {}", id);

    Ok(StatusCode::NO_CONTENT)
}
