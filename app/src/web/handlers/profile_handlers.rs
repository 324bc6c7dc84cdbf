use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::{PrivacySettings, ProfileUpdate};
use crate::state::AppState;
use crate::store::profiles;
use crate::web::handlers::auth::AuthenticatedUser;

#[instrument(
    name = "handler::get_profile",
    skip(state, auth_user),
    fields(profile_id = %auth_user.profile_id)
)]
pub async fn get_profile_handler(
    state: web::Data<AppState>,
    auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    // First authenticated contact bootstraps the profile row; failures there
    // are background noise, not request failures.
    profiles::ensure_profile_exists(
        &state.db_pool,
        auth_user.profile_id,
        auth_user.display_name(),
        auth_user.avatar_url.as_deref(),
    )
    .await;

    let profile = profiles::fetch_profile(&state.db_pool, auth_user.profile_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "profile": profile })))
}

#[instrument(
    name = "handler::update_profile",
    skip(state, auth_user, payload),
    fields(profile_id = %auth_user.profile_id)
)]
pub async fn update_profile_handler(
    state: web::Data<AppState>,
    auth_user: AuthenticatedUser,
    payload: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, AppError> {
    let profile =
        profiles::update_profile(&state.db_pool, auth_user.profile_id, &payload).await?;
    info!("Profile updated.");
    Ok(HttpResponse::Ok().json(json!({ "profile": profile })))
}

#[instrument(
    name = "handler::update_privacy",
    skip(state, auth_user, payload),
    fields(profile_id = %auth_user.profile_id)
)]
pub async fn update_privacy_handler(
    state: web::Data<AppState>,
    auth_user: AuthenticatedUser,
    payload: web::Json<PrivacySettings>,
) -> Result<HttpResponse, AppError> {
    let profile =
        profiles::update_privacy_settings(&state.db_pool, auth_user.profile_id, *payload).await?;
    info!("Privacy settings updated.");
    Ok(HttpResponse::Ok().json(json!({ "profile": profile })))
}
