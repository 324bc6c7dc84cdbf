use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::cart::SessionKey;
use crate::errors::AppError;
use crate::flows::contexts::PlaceOrderCtx;
use crate::models::AddressInput;
use crate::state::AppState;
use crate::web::handlers::auth::AuthenticatedUser;
use trellis::{FlowContext, FlowOutcome};

#[derive(Deserialize, Debug)]
pub struct CheckoutRequestPayload {
    pub address: AddressInput,
}

#[instrument(
    name = "handler::place_order",
    skip(state, auth_user, payload),
    fields(profile_id = %auth_user.profile_id)
)]
pub async fn place_order_handler(
    state: web::Data<AppState>,
    auth_user: AuthenticatedUser,
    payload: web::Json<CheckoutRequestPayload>,
) -> Result<HttpResponse, AppError> {
    info!("Checkout initiation attempt.");

    // An authenticated user's cart lives under their profile id.
    let session = SessionKey(auth_user.profile_id);
    let items = state.carts.snapshot(session);

    let ctx = FlowContext::new(PlaceOrderCtx::new(
        state.checkout_store.clone(),
        state.carts.clone(),
        session,
        Some(auth_user.profile_id),
        payload.into_inner().address,
        items,
        state.config.currency_code.clone(),
        state.config.default_country.clone(),
    ));

    match state.flows.run(ctx.clone()).await {
        Ok(FlowOutcome::Completed) => {
            let guard = ctx.read();
            let order_id = guard.order_id.ok_or_else(|| {
                warn!("Checkout flow completed but no order id was recorded.");
                AppError::Internal(
                    "Checkout completed, but order details are unavailable.".to_string(),
                )
            })?;
            let summary = guard.summary.clone().ok_or_else(|| {
                AppError::Internal(
                    "Checkout completed, but the order summary is unavailable.".to_string(),
                )
            })?;

            info!(%order_id, "Checkout succeeded.");
            Ok(HttpResponse::Ok().json(json!({
                "message": "Order placed successfully.",
                "orderId": order_id,
                "summary": summary,
            })))
        }
        Ok(FlowOutcome::Halted) => {
            // No stage in this flow halts gracefully; treat it as a fault.
            warn!("Checkout flow halted unexpectedly.");
            Err(AppError::Internal("Checkout was halted.".to_string()))
        }
        Err(app_err) => {
            warn!(error = %app_err, "Checkout flow failed.");
            Err(app_err)
        }
    }
}
