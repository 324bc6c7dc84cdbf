//! Context data structs carried through trellis flows. Handlers receive
//! these wrapped in `trellis::FlowContext`.

use crate::cart::{CartItem, CartStore, OrderSummary, SessionKey};
use crate::models::{AddressInput, OrderItem};
use crate::store::CheckoutStore;
use std::sync::Arc;
use uuid::Uuid;

/// Underlying data for one checkout attempt.
///
/// Owned by a single flow run: the item list is a snapshot taken at
/// submission, and the live cart is only touched again in the final stage
/// once every write has succeeded.
#[derive(Clone)]
pub struct PlaceOrderCtx {
    pub store: Arc<dyn CheckoutStore>,
    pub carts: CartStore,
    pub session: SessionKey,

    /// The authenticated profile, if any; validated by the first stage.
    pub profile_id: Option<Uuid>,
    pub address: AddressInput,
    pub items: Vec<CartItem>,

    pub currency: String,
    pub default_country: String,

    // Populated as the flow progresses.
    pub address_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub persisted_items: Option<Vec<OrderItem>>,
    pub summary: Option<OrderSummary>,
}

impl PlaceOrderCtx {
    pub fn new(
        store: Arc<dyn CheckoutStore>,
        carts: CartStore,
        session: SessionKey,
        profile_id: Option<Uuid>,
        address: AddressInput,
        items: Vec<CartItem>,
        currency: String,
        default_country: String,
    ) -> Self {
        Self {
            store,
            carts,
            session,
            profile_id,
            address,
            items,
            currency,
            default_country,
            address_id: None,
            order_id: None,
            persisted_items: None,
            summary: None,
        }
    }
}
