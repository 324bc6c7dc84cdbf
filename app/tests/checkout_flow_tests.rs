//! Order-placement flow behavior, exercised against an in-memory recording
//! store: write counts, write ordering, compensation, and cart lifecycle.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

use farmstand::cart::{CartItem, CartStore, SessionKey};
use farmstand::config::CartRetention;
use farmstand::errors::AppError;
use farmstand::flows::contexts::PlaceOrderCtx;
use farmstand::flows::register_all_flows;
use farmstand::models::{Address, AddressInput, Order, OrderItem, OrderStatus};
use farmstand::store::{CheckoutStore, OrderLine};
use trellis::{FlowContext, FlowOutcome, FlowRegistry};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    InsertAddress,
    InsertOrder { shipping_address_id: Uuid },
    InsertItems { order_id: Uuid, line_count: usize },
    DeleteAddress(Uuid),
    MarkOrderFailed(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailOn {
    Address,
    Order,
    Items,
}

struct RecordingStore {
    ops: Mutex<Vec<Op>>,
    fail_on: Option<FailOn>,
    address_id: Uuid,
    order_id: Uuid,
}

impl RecordingStore {
    fn new(fail_on: Option<FailOn>) -> Arc<Self> {
        Arc::new(Self {
            ops: Mutex::new(Vec::new()),
            fail_on,
            address_id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
        })
    }

    fn ops(&self) -> Vec<Op> {
        self.ops.lock().clone()
    }
}

#[async_trait]
impl CheckoutStore for RecordingStore {
    async fn insert_address(
        &self,
        profile_id: Uuid,
        input: &AddressInput,
        default_country: &str,
    ) -> Result<Address, AppError> {
        if self.fail_on == Some(FailOn::Address) {
            return Err(AppError::StoreWrite("injected address failure".to_string()));
        }
        self.ops.lock().push(Op::InsertAddress);
        Ok(Address {
            id: self.address_id,
            profile_id,
            label: "Shipping".to_string(),
            full_name: input.full_name.clone(),
            phone: input.phone.clone(),
            street: input.street.clone(),
            apartment: input.apartment.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            zip: input.zip.clone(),
            country: input.country.clone().unwrap_or_else(|| default_country.to_string()),
            is_default: false,
        })
    }

    async fn insert_order(
        &self,
        profile_id: Uuid,
        currency: &str,
        shipping_address_id: Uuid,
    ) -> Result<Order, AppError> {
        if self.fail_on == Some(FailOn::Order) {
            return Err(AppError::StoreWrite("injected order failure".to_string()));
        }
        self.ops.lock().push(Op::InsertOrder { shipping_address_id });
        Ok(Order {
            id: self.order_id,
            profile_id,
            status: OrderStatus::Pending,
            currency: currency.to_string(),
            shipping_address_id: Some(shipping_address_id),
            created_at: chrono::Utc::now(),
        })
    }

    async fn insert_order_items(
        &self,
        order_id: Uuid,
        lines: &[OrderLine],
    ) -> Result<Vec<OrderItem>, AppError> {
        if self.fail_on == Some(FailOn::Items) {
            return Err(AppError::StoreWrite("injected items failure".to_string()));
        }
        self.ops.lock().push(Op::InsertItems {
            order_id,
            line_count: lines.len(),
        });
        // Mirrors the store contract: the total is derived at write time.
        Ok(lines
            .iter()
            .map(|line| OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                total_price_cents: i64::from(line.quantity) * line.unit_price_cents,
            })
            .collect())
    }

    async fn delete_address(&self, address_id: Uuid) -> Result<(), AppError> {
        self.ops.lock().push(Op::DeleteAddress(address_id));
        Ok(())
    }

    async fn mark_order_failed(&self, order_id: Uuid) -> Result<(), AppError> {
        self.ops.lock().push(Op::MarkOrderFailed(order_id));
        Ok(())
    }
}

fn registry() -> Arc<FlowRegistry<AppError>> {
    let registry = Arc::new(FlowRegistry::<AppError>::new());
    register_all_flows(&registry);
    registry
}

fn address() -> AddressInput {
    AddressInput {
        full_name: "Jordan Fields".to_string(),
        phone: "555-0100".to_string(),
        street: "12 Orchard Lane".to_string(),
        apartment: None,
        city: "Greenville".to_string(),
        state: "CA".to_string(),
        zip: "90210".to_string(),
        country: None,
    }
}

fn cart_item(price_cents: i64, quantity: i32) -> CartItem {
    CartItem {
        product_id: Uuid::new_v4(),
        name: "Heirloom Tomatoes".to_string(),
        image: "tomatoes.jpg".to_string(),
        unit_price_cents: price_cents,
        farm: "Sunrise Farm".to_string(),
        quantity,
    }
}

struct Harness {
    store: Arc<RecordingStore>,
    carts: CartStore,
    session: SessionKey,
    ctx: FlowContext<PlaceOrderCtx>,
}

fn harness(fail_on: Option<FailOn>, items: Vec<CartItem>, profile_id: Option<Uuid>) -> Harness {
    let store = RecordingStore::new(fail_on);
    let carts = CartStore::new(CartRetention::Volatile);
    let session = SessionKey(profile_id.unwrap_or_else(Uuid::new_v4));
    for item in &items {
        carts.update(session, |cart| cart.add_item(item.clone()));
    }
    let ctx = FlowContext::new(PlaceOrderCtx::new(
        store.clone(),
        carts.clone(),
        session,
        profile_id,
        address(),
        items,
        "USD".to_string(),
        "US".to_string(),
    ));
    Harness {
        store,
        carts,
        session,
        ctx,
    }
}

#[tokio::test]
async fn successful_checkout_writes_in_order_and_clears_the_cart() {
    let h = harness(
        None,
        vec![cart_item(1000, 2), cart_item(500, 1)],
        Some(Uuid::new_v4()),
    );

    let outcome = registry().run(h.ctx.clone()).await.unwrap();
    assert_eq!(outcome, FlowOutcome::Completed);

    assert_eq!(
        h.store.ops(),
        vec![
            Op::InsertAddress,
            Op::InsertOrder {
                shipping_address_id: h.store.address_id
            },
            Op::InsertItems {
                order_id: h.store.order_id,
                line_count: 2
            },
        ]
    );

    let guard = h.ctx.read();
    assert_eq!(guard.order_id, Some(h.store.order_id));
    let summary = guard.summary.as_ref().expect("summary snapshot");
    assert_eq!(summary.total_cents, 2500);
    assert_eq!(summary.items.len(), 2);

    // Line totals come back computed at write time.
    let persisted = guard.persisted_items.as_ref().expect("persisted line items");
    assert_eq!(persisted.len(), 2);
    for item in persisted {
        assert_eq!(
            item.total_price_cents,
            i64::from(item.quantity) * item.unit_price_cents
        );
    }

    assert!(h.carts.is_empty(h.session));
}

#[tokio::test]
async fn empty_cart_fails_validation_with_zero_store_writes() {
    let h = harness(None, vec![], Some(Uuid::new_v4()));

    let result = registry().run(h.ctx.clone()).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(h.store.ops().is_empty());
}

#[tokio::test]
async fn missing_profile_fails_authentication_with_zero_store_writes() {
    let h = harness(None, vec![cart_item(1000, 1)], None);

    let result = registry().run(h.ctx.clone()).await;
    assert!(matches!(result, Err(AppError::Auth(_))));
    assert!(h.store.ops().is_empty());
}

#[tokio::test]
async fn invalid_quantity_fails_validation_with_zero_store_writes() {
    let h = harness(None, vec![cart_item(1000, 0)], Some(Uuid::new_v4()));

    let result = registry().run(h.ctx.clone()).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(h.store.ops().is_empty());
}

#[tokio::test]
async fn negative_unit_price_fails_validation_with_zero_store_writes() {
    let h = harness(None, vec![cart_item(-5, 1)], Some(Uuid::new_v4()));

    let result = registry().run(h.ctx.clone()).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(h.store.ops().is_empty());
}

#[tokio::test]
async fn blank_required_address_field_fails_validation() {
    let h = harness(None, vec![cart_item(1000, 1)], Some(Uuid::new_v4()));
    h.ctx.write().address.zip = "  ".to_string();

    let result = registry().run(h.ctx.clone()).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(h.store.ops().is_empty());
}

#[tokio::test]
async fn address_failure_aborts_before_any_order_write() {
    let h = harness(
        Some(FailOn::Address),
        vec![cart_item(1000, 1)],
        Some(Uuid::new_v4()),
    );

    let result = registry().run(h.ctx.clone()).await;
    assert!(matches!(result, Err(AppError::StoreWrite(_))));
    assert!(h.store.ops().is_empty());
    assert!(!h.carts.is_empty(h.session));
}

#[tokio::test]
async fn order_failure_deletes_the_orphaned_address_and_keeps_the_cart() {
    let h = harness(
        Some(FailOn::Order),
        vec![cart_item(1000, 1)],
        Some(Uuid::new_v4()),
    );

    let result = registry().run(h.ctx.clone()).await;
    assert!(matches!(result, Err(AppError::StoreWrite(_))));

    assert_eq!(
        h.store.ops(),
        vec![Op::InsertAddress, Op::DeleteAddress(h.store.address_id)]
    );
    // The cart is only cleared on full success.
    assert!(!h.carts.is_empty(h.session));
    assert!(h.ctx.read().summary.is_none());
}

#[tokio::test]
async fn items_failure_marks_the_order_failed_and_keeps_the_cart() {
    let h = harness(
        Some(FailOn::Items),
        vec![cart_item(1000, 2), cart_item(250, 4)],
        Some(Uuid::new_v4()),
    );

    let result = registry().run(h.ctx.clone()).await;
    assert!(matches!(result, Err(AppError::StoreWrite(_))));

    assert_eq!(
        h.store.ops(),
        vec![
            Op::InsertAddress,
            Op::InsertOrder {
                shipping_address_id: h.store.address_id
            },
            Op::MarkOrderFailed(h.store.order_id),
        ]
    );
    assert!(!h.carts.is_empty(h.session));
    assert!(h.ctx.read().summary.is_none());
}
