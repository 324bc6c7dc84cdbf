//! Defines and registers the trellis flows used by the marketplace.

use crate::errors::AppError;
use std::sync::Arc;
use trellis::FlowRegistry;

pub mod checkout_flow;
pub mod contexts;

/// Registers every flow with the provided registry. Called once at startup.
pub fn register_all_flows(registry: &Arc<FlowRegistry<AppError>>) {
    tracing::info!("Registering flows...");
    checkout_flow::register_checkout_flow(registry);
    tracing::info!("All application flows registered.");
}
