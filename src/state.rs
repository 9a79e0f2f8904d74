use std::sync::Arc;
use crate::domain::ports::{
    CategoryRepository, ProductRepository, StockMovementRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::stock_service::StockService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub product_repo: Arc<dyn ProductRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub movement_repo: Arc<dyn StockMovementRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_service: Arc<AuthService>,
    pub stock_service: Arc<StockService>,
}
