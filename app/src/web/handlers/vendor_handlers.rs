use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::VendorRegistration;
use crate::state::AppState;
use crate::store::vendors;
use crate::web::handlers::auth::AuthenticatedUser;

#[instrument(
    name = "handler::register_vendor",
    skip(state, auth_user, payload),
    fields(profile_id = %auth_user.profile_id)
)]
pub async fn register_vendor_handler(
    state: web::Data<AppState>,
    auth_user: AuthenticatedUser,
    payload: web::Json<VendorRegistration>,
) -> Result<HttpResponse, AppError> {
    let registration = payload.into_inner();
    if registration.farm_name.trim().is_empty() {
        return Err(AppError::Validation("Farm name is required.".to_string()));
    }

    let vendor =
        vendors::register_vendor(&state.db_pool, auth_user.profile_id, &registration).await?;
    info!(vendor_id = %vendor.id, "Vendor registration completed.");
    Ok(HttpResponse::Created().json(json!({ "vendor": vendor })))
}

#[instrument(
    name = "handler::get_my_vendor",
    skip(state, auth_user),
    fields(profile_id = %auth_user.profile_id)
)]
pub async fn get_my_vendor_handler(
    state: web::Data<AppState>,
    auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let vendor = vendors::fetch_vendor_for_profile(&state.db_pool, auth_user.profile_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "vendor": vendor })))
}
