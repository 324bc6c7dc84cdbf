//! The order-placement flow: converts a completed checkout form plus the
//! current cart into durable store rows, leaving the cart empty and the
//! caller with an order id and a detached summary.
//!
//! One flow run per checkout attempt. The three writes are not wrapped in a
//! store transaction; instead each write stage carries a compensation that
//! repairs the partial state it would otherwise orphan.

use crate::cart::OrderSummary;
use crate::errors::AppError;
use crate::flows::contexts::PlaceOrderCtx;
use crate::store::OrderLine;
use std::sync::Arc;
use tracing::{info, warn};
use trellis::{Flow, FlowContext, FlowRegistry, StageControl};

pub fn register_checkout_flow(registry: &Arc<FlowRegistry<AppError>>) {
    let mut flow = Flow::<PlaceOrderCtx, AppError>::new(&[
        ("validate_checkout_input", false, None),
        ("persist_shipping_address", false, None),
        ("persist_order_record", false, None),
        ("persist_order_items", false, None),
        ("finalize_checkout", false, None),
    ]);

    // Stage 1: reject bad input before anything touches the store.
    flow.on_stage("validate_checkout_input", |ctx: FlowContext<PlaceOrderCtx>| {
        Box::pin(async move {
            let guard = ctx.read();

            if guard.profile_id.is_none() {
                warn!("Checkout attempted without an authenticated profile.");
                return Err(AppError::Auth(
                    "You must be signed in to place an order.".to_string(),
                ));
            }
            if guard.items.is_empty() {
                return Err(AppError::Validation(
                    "Cannot place an order with an empty cart.".to_string(),
                ));
            }
            for item in &guard.items {
                if item.quantity < 1 {
                    return Err(AppError::Validation(format!(
                        "Invalid quantity {} for product {}.",
                        item.quantity, item.product_id
                    )));
                }
                if item.unit_price_cents < 0 {
                    return Err(AppError::Validation(format!(
                        "Invalid unit price for product {}.",
                        item.product_id
                    )));
                }
            }

            let required = [
                ("full name", &guard.address.full_name),
                ("street", &guard.address.street),
                ("city", &guard.address.city),
                ("state", &guard.address.state),
                ("zip", &guard.address.zip),
                ("phone", &guard.address.phone),
            ];
            for (field, value) in required {
                if value.trim().is_empty() {
                    return Err(AppError::Validation(format!(
                        "Missing required address field: {}.",
                        field
                    )));
                }
            }

            info!(line_count = guard.items.len(), "Checkout input validated.");
            Ok::<_, AppError>(StageControl::Continue)
        })
    });

    // Stage 2: persist the shipping address and record its assigned id.
    flow.on_stage("persist_shipping_address", |ctx: FlowContext<PlaceOrderCtx>| {
        Box::pin(async move {
            let (store, profile_id, address, default_country) = {
                let guard = ctx.read();
                let Some(profile_id) = guard.profile_id else {
                    return Err(AppError::Internal(
                        "Checkout context lost its profile id.".to_string(),
                    ));
                };
                (
                    guard.store.clone(),
                    profile_id,
                    guard.address.clone(),
                    guard.default_country.clone(),
                )
            };

            let persisted = store
                .insert_address(profile_id, &address, &default_country)
                .await?;
            ctx.write().address_id = Some(persisted.id);
            Ok(StageControl::Continue)
        })
    });

    // Stage 3: persist the order row referencing the address.
    flow.on_stage("persist_order_record", |ctx: FlowContext<PlaceOrderCtx>| {
        Box::pin(async move {
            let (store, profile_id, currency, address_id) = {
                let guard = ctx.read();
                let (Some(profile_id), Some(address_id)) = (guard.profile_id, guard.address_id)
                else {
                    return Err(AppError::Internal(
                        "Order stage reached without profile or address id.".to_string(),
                    ));
                };
                (
                    guard.store.clone(),
                    profile_id,
                    guard.currency.clone(),
                    address_id,
                )
            };

            let order = store.insert_order(profile_id, &currency, address_id).await?;
            ctx.write().order_id = Some(order.id);
            Ok(StageControl::Continue)
        })
    });

    // A failed order insert leaves an address row with nothing referencing
    // it; remove it.
    flow.compensate("persist_order_record", |ctx: FlowContext<PlaceOrderCtx>| {
        Box::pin(async move {
            let (store, address_id) = {
                let guard = ctx.read();
                (guard.store.clone(), guard.address_id)
            };
            let Some(address_id) = address_id else { return Ok(()) };
            warn!(%address_id, "Order insert failed; deleting orphaned shipping address.");
            store.delete_address(address_id).await
        })
    });

    // Stage 4: persist one line item per cart entry in a single batch.
    flow.on_stage("persist_order_items", |ctx: FlowContext<PlaceOrderCtx>| {
        Box::pin(async move {
            let (store, order_id, lines) = {
                let guard = ctx.read();
                let Some(order_id) = guard.order_id else {
                    return Err(AppError::Internal(
                        "Items stage reached without an order id.".to_string(),
                    ));
                };
                let lines: Vec<OrderLine> = guard
                    .items
                    .iter()
                    .map(|item| OrderLine {
                        product_id: item.product_id,
                        quantity: item.quantity,
                        unit_price_cents: item.unit_price_cents,
                    })
                    .collect();
                (guard.store.clone(), order_id, lines)
            };

            let persisted = store.insert_order_items(order_id, &lines).await?;
            ctx.write().persisted_items = Some(persisted);
            Ok(StageControl::Continue)
        })
    });

    // A failed items insert leaves an order with no lines; mark it rather
    // than leaving it silently incomplete.
    flow.compensate("persist_order_items", |ctx: FlowContext<PlaceOrderCtx>| {
        Box::pin(async move {
            let (store, order_id) = {
                let guard = ctx.read();
                (guard.store.clone(), guard.order_id)
            };
            let Some(order_id) = order_id else { return Ok(()) };
            warn!(%order_id, "Items insert failed; marking order as failed.");
            store.mark_order_failed(order_id).await
        })
    });

    // Stage 5: only reached when every write succeeded — snapshot the
    // summary for the confirmation view, then empty the live cart.
    flow.on_stage("finalize_checkout", |ctx: FlowContext<PlaceOrderCtx>| {
        Box::pin(async move {
            let (carts, session, summary, order_id) = {
                let guard = ctx.read();
                (
                    guard.carts.clone(),
                    guard.session,
                    OrderSummary::from_items(&guard.items),
                    guard.order_id,
                )
            };
            carts.clear(session);
            ctx.write().summary = Some(summary);
            info!(?order_id, "Checkout completed; cart cleared.");
            Ok::<_, AppError>(StageControl::Continue)
        })
    });

    registry.register_flow(flow);
    info!("Checkout flow registered.");
}
