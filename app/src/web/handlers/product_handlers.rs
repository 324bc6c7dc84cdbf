use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::store::catalog;

#[instrument(name = "handler::list_products", skip(state))]
pub async fn list_products_handler(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let products =
        catalog::list_products(&state.db_pool, state.config.catalog_page_limit).await?;
    info!("Fetched {} products for listing.", products.len());

    Ok(HttpResponse::Ok().json(json!({
        "message": "Products fetched successfully.",
        "products": products,
    })))
}
