use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::cart::CartItem;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::handlers::auth::CartSession;

#[derive(Deserialize, Debug)]
pub struct AddItemPayload {
    pub product_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub unit_price_cents: i64,
    #[serde(default)]
    pub farm: Option<String>,
    pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct UpdateQuantityPayload {
    pub quantity: i32,
}

fn cart_body(state: &AppState, session: CartSession) -> serde_json::Value {
    state.carts.with_cart(session.key, |cart| {
        json!({
            "items": cart.snapshot(),
            "total_cents": cart.total_cents(),
        })
    })
}

#[instrument(name = "handler::get_cart", skip(state, session))]
pub async fn get_cart_handler(
    state: web::Data<AppState>,
    session: CartSession,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(cart_body(&state, session)))
}

#[instrument(
    name = "handler::add_cart_item",
    skip(state, session, payload),
    fields(product_id = %payload.product_id, quantity = payload.quantity)
)]
pub async fn add_item_handler(
    state: web::Data<AppState>,
    session: CartSession,
    payload: web::Json<AddItemPayload>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    if payload.quantity < 1 {
        return Err(AppError::Validation(
            "Quantity must be a positive number.".to_string(),
        ));
    }
    if payload.unit_price_cents < 0 {
        return Err(AppError::Validation(
            "Unit price cannot be negative.".to_string(),
        ));
    }

    let item = CartItem {
        product_id: payload.product_id,
        name: payload.name,
        image: payload.image.unwrap_or_default(),
        unit_price_cents: payload.unit_price_cents,
        farm: payload.farm.unwrap_or_else(|| "Farm".to_string()),
        quantity: payload.quantity,
    };
    state.carts.update(session.key, |cart| cart.add_item(item));
    info!("Item merged into cart.");

    Ok(HttpResponse::Ok().json(cart_body(&state, session)))
}

#[instrument(
    name = "handler::update_cart_item",
    skip(state, session, path, payload),
    fields(product_id = %path.as_ref())
)]
pub async fn update_quantity_handler(
    state: web::Data<AppState>,
    session: CartSession,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateQuantityPayload>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    // The cart itself applies the quantity verbatim; the minimum-1 clamp is
    // this caller's job, matching the quantity steppers on the cart screen.
    let quantity = payload.quantity.max(1);
    state
        .carts
        .update(session.key, |cart| cart.update_quantity(product_id, quantity));

    Ok(HttpResponse::Ok().json(cart_body(&state, session)))
}

#[instrument(
    name = "handler::remove_cart_item",
    skip(state, session, path),
    fields(product_id = %path.as_ref())
)]
pub async fn remove_item_handler(
    state: web::Data<AppState>,
    session: CartSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    state
        .carts
        .update(session.key, |cart| cart.remove_item(product_id));

    Ok(HttpResponse::Ok().json(cart_body(&state, session)))
}

#[instrument(name = "handler::clear_cart", skip(state, session))]
pub async fn clear_cart_handler(
    state: web::Data<AppState>,
    session: CartSession,
) -> Result<HttpResponse, AppError> {
    state.carts.clear(session.key);
    Ok(HttpResponse::Ok().json(json!({ "items": [], "total_cents": 0 })))
}
