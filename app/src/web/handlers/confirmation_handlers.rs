use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::cart::{CartItem, OrderSummary, SessionKey};
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::handlers::auth::AuthenticatedUser;

#[derive(Deserialize, Debug, Default)]
pub struct ConfirmationRequestPayload {
    /// The summary handed over by checkout. When absent the view degrades to
    /// the current — possibly already empty — cart.
    #[serde(default)]
    pub summary: Option<OrderSummary>,
}

/// Prefers the detached summary passed from checkout; without one, falls
/// back to synthesizing a summary from the live cart contents.
pub fn confirmation_view(
    summary: Option<OrderSummary>,
    fallback_items: &[CartItem],
) -> OrderSummary {
    summary.unwrap_or_else(|| OrderSummary::from_items(fallback_items))
}

#[instrument(
    name = "handler::order_confirmation",
    skip(state, auth_user, payload),
    fields(profile_id = %auth_user.profile_id)
)]
pub async fn confirmation_view_handler(
    state: web::Data<AppState>,
    auth_user: AuthenticatedUser,
    payload: web::Json<ConfirmationRequestPayload>,
) -> Result<HttpResponse, AppError> {
    let session = SessionKey(auth_user.profile_id);
    let fallback_items = state.carts.snapshot(session);
    let view = confirmation_view(payload.into_inner().summary, &fallback_items);

    // Clear any cart residue once the confirmation renders, in case the
    // checkout hand-off skipped it.
    if !fallback_items.is_empty() {
        state.carts.clear(session);
        info!("Residual cart contents cleared at confirmation.");
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Order confirmed.",
        "summary": view,
    })))
}
