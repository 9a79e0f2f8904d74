use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::{DateRangeParams, PageParams, StockMovementRequestDto};
use crate::api::dtos::responses::{PagedResult, StockMovementDto};
use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn list_movements(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(page): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    if let Some((page_number, page_size)) = page.page_args()? {
        let (items, total_count) = state.stock_service.movements_paged(page_number, page_size).await?;
        let items: Vec<StockMovementDto> = items.into_iter().map(StockMovementDto::from).collect();
        return Ok(Json(PagedResult::new(items, total_count, page_number, page_size)).into_response());
    }

    let movements = state.stock_service.movements().await?;
    let movements: Vec<StockMovementDto> = movements.into_iter().map(StockMovementDto::from).collect();
    Ok(Json(movements).into_response())
}

pub async fn list_movements_by_product(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let movements = state.stock_service.movements_by_product(&product_id).await?;
    let movements: Vec<StockMovementDto> = movements.into_iter().map(StockMovementDto::from).collect();
    Ok(Json(movements))
}

pub async fn list_movements_by_date_range(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(range): Query<DateRangeParams>,
) -> Result<impl IntoResponse, AppError> {
    let movements = state
        .stock_service
        .movements_by_date_range(range.start_date, range.end_date)
        .await?;
    let movements: Vec<StockMovementDto> = movements.into_iter().map(StockMovementDto::from).collect();
    Ok(Json(movements))
}

pub async fn add_stock(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(payload): Json<StockMovementRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let movement = state.stock_service.add_stock(payload.into()).await?;
    Ok(Json(StockMovementDto::from(movement)))
}

pub async fn remove_stock(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(payload): Json<StockMovementRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let movement = state.stock_service.remove_stock(payload.into()).await?;
    Ok(Json(StockMovementDto::from(movement)))
}

pub async fn adjust_stock(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(payload): Json<StockMovementRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let movement = state.stock_service.adjust_stock(payload.into()).await?;
    Ok(Json(StockMovementDto::from(movement)))
}
