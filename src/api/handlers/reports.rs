use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use crate::api::dtos::requests::{MovementReportParams, PageParams};
use crate::api::dtos::responses::{PagedResult, ProductDto, StockMovementDto};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::user::Role;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn stock_report(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(page): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Moderator)?;

    if let Some((page_number, page_size)) = page.page_args()? {
        let (items, total_count) = state.product_repo.list_paged(page_number, page_size).await?;
        let items: Vec<ProductDto> = items.into_iter().map(ProductDto::from).collect();
        return Ok(Json(PagedResult::new(items, total_count, page_number, page_size)).into_response());
    }

    let products = state.product_repo.list().await?;
    let products: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();
    Ok(Json(products).into_response())
}

pub async fn low_stock_report(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(page): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Moderator)?;

    let low_stock = state.product_repo.list_low_stock().await?;

    if let Some((page_number, page_size)) = page.page_args()? {
        let total_count = low_stock.len() as i64;
        let items: Vec<ProductDto> = low_stock
            .into_iter()
            .skip(((page_number - 1) * page_size) as usize)
            .take(page_size as usize)
            .map(ProductDto::from)
            .collect();
        return Ok(Json(PagedResult::new(items, total_count, page_number, page_size)).into_response());
    }

    let products: Vec<ProductDto> = low_stock.into_iter().map(ProductDto::from).collect();
    Ok(Json(products).into_response())
}

pub async fn movement_history(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<MovementReportParams>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Moderator)?;

    let movements = match widen_local_date_range(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
    ) {
        Some((start, end)) => state.stock_service.movements_by_date_range(start, end).await?,
        None => state.stock_service.movements().await?,
    };

    let movements: Vec<StockMovementDto> = movements.into_iter().map(StockMovementDto::from).collect();
    Ok(Json(movements))
}

/// Widens caller-supplied local calendar dates to a full-day UTC range:
/// local start-of-day through one microsecond before the next local
/// start-of-day. Any missing or unparsable bound disables the filter.
fn widen_local_date_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = local_start_of_day(start_date?)?;
    let end = local_start_of_day(end_date?)?;

    let end = end + Duration::days(1) - Duration::microseconds(1);
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

fn local_start_of_day(date: &str) -> Option<DateTime<Local>> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Local.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()
}
