use crate::cart::CartStore;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::store::CheckoutStore;
use sqlx::PgPool;
use std::sync::Arc;
use trellis::FlowRegistry;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub flows: Arc<FlowRegistry<AppError>>,
    pub carts: CartStore,
    pub checkout_store: Arc<dyn CheckoutStore>,
    pub config: Arc<AppConfig>,
}
