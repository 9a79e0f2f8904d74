use std::sync::Arc;
use crate::domain::{
    models::{
        product::Product,
        stock_movement::{MovementType, StockMovement, StockMovementRequest},
    },
    ports::{ProductRepository, StockMovementRepository},
};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// The stock ledger. Every mutation reads the product, validates, then hands
/// the new quantity and the movement row to the repository, which writes
/// both in one transaction guarded on the quantity it read.
pub struct StockService {
    movement_repo: Arc<dyn StockMovementRepository>,
    product_repo: Arc<dyn ProductRepository>,
}

impl StockService {
    pub fn new(
        movement_repo: Arc<dyn StockMovementRepository>,
        product_repo: Arc<dyn ProductRepository>,
    ) -> Self {
        Self { movement_repo, product_repo }
    }

    pub async fn add_stock(&self, req: StockMovementRequest) -> Result<StockMovement, AppError> {
        info!("Adding stock. product_id: {}, quantity: {}", req.product_id, req.quantity);

        if req.quantity <= 0 {
            warn!("Invalid quantity for stock addition: {}", req.quantity);
            return Err(AppError::Validation("Quantity must be greater than zero".to_string()));
        }

        let product = self.get_product(&req.product_id).await?;

        let movement = StockMovement::new(product.id.clone(), MovementType::Add, req.quantity, &req);
        self.apply(&product, product.quantity + req.quantity, movement).await
    }

    pub async fn remove_stock(&self, req: StockMovementRequest) -> Result<StockMovement, AppError> {
        info!("Removing stock. product_id: {}, quantity: {}", req.product_id, req.quantity);

        if req.quantity <= 0 {
            warn!("Invalid quantity for stock removal: {}", req.quantity);
            return Err(AppError::Validation("Quantity must be greater than zero".to_string()));
        }

        let product = self.get_product(&req.product_id).await?;

        if product.quantity < req.quantity {
            warn!(
                "Insufficient stock for removal. product_id: {}, available: {}, requested: {}",
                product.id, product.quantity, req.quantity
            );
            return Err(AppError::Conflict(format!(
                "Insufficient stock. Available: {}, Requested: {}",
                product.quantity, req.quantity
            )));
        }

        let movement = StockMovement::new(product.id.clone(), MovementType::Remove, -req.quantity, &req);
        self.apply(&product, product.quantity - req.quantity, movement).await
    }

    /// Sets the quantity to the absolute value in the request and records the
    /// difference as the movement delta, which may be zero or negative.
    pub async fn adjust_stock(&self, req: StockMovementRequest) -> Result<StockMovement, AppError> {
        if req.quantity < 0 {
            return Err(AppError::Validation(
                "Quantity cannot be negative for adjustment. Use absolute value".to_string(),
            ));
        }

        let product = self.get_product(&req.product_id).await?;

        let delta = req.quantity - product.quantity;
        let movement = StockMovement::new(product.id.clone(), MovementType::Adjustment, delta, &req);
        self.apply(&product, req.quantity, movement).await
    }

    pub async fn movements(&self) -> Result<Vec<StockMovement>, AppError> {
        self.movement_repo.list().await
    }

    pub async fn movements_paged(
        &self,
        page_number: i64,
        page_size: i64,
    ) -> Result<(Vec<StockMovement>, i64), AppError> {
        self.movement_repo.list_paged(page_number, page_size).await
    }

    pub async fn movements_by_product(&self, product_id: &str) -> Result<Vec<StockMovement>, AppError> {
        self.movement_repo.list_by_product(product_id).await
    }

    pub async fn movements_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StockMovement>, AppError> {
        self.movement_repo.list_by_date_range(start, end).await
    }

    async fn get_product(&self, product_id: &str) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product with ID {product_id} not found")))
    }

    async fn apply(
        &self,
        product: &Product,
        new_quantity: i64,
        mut movement: StockMovement,
    ) -> Result<StockMovement, AppError> {
        self.movement_repo
            .record(&movement, new_quantity, product.quantity)
            .await?;

        info!(
            "Stock {} recorded. product_id: {}, delta: {}, new quantity: {}",
            movement.movement_type, product.id, movement.quantity, new_quantity
        );

        movement.product_name = product.name.clone();
        movement.product_sku = product.sku.clone();
        Ok(movement)
    }
}
