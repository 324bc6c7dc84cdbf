//! Session-owned cart state.
//!
//! Carts live in process memory, one per session key, held behind the shared
//! [`CartStore`]. Nothing here touches the remote store: cart contents only
//! become durable when the order-placement flow persists them.

use crate::config::CartRetention;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Key under which a session's cart is stored: the authenticated profile id
/// when one is present, otherwise the anonymous session id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey(pub Uuid);

/// One selected product with its cached display fields.
///
/// The unit price is the price the client saw when the item was added; the
/// order flow validates it is non-negative but does not re-price it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: Uuid,
    pub name: String,
    pub image: String,
    pub unit_price_cents: i64,
    pub farm: String,
    pub quantity: i32,
}

/// The pre-purchase collection of selected products and quantities.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: HashMap<Uuid, CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges by product id: adding an already-present product accumulates
    /// its quantity and refreshes the cached display fields.
    pub fn add_item(&mut self, item: CartItem) {
        match self.items.get_mut(&item.product_id) {
            Some(existing) => {
                let merged_quantity = existing.quantity + item.quantity;
                *existing = CartItem {
                    quantity: merged_quantity,
                    ..item
                };
            }
            None => {
                self.items.insert(item.product_id, item);
            }
        }
    }

    /// Deletes the entry entirely; removing is never "set quantity to 0".
    pub fn remove_item(&mut self, product_id: Uuid) {
        self.items.remove(&product_id);
    }

    /// Sets the quantity of an existing entry verbatim. A removed or
    /// never-added product id is a no-op — updates never resurrect entries.
    /// Clamping to a minimum of 1 is the caller's responsibility.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: i32) {
        if let Some(existing) = self.items.get_mut(&product_id) {
            existing.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always recomputed as the sum of `unit_price * quantity` over the
    /// surviving entries — never cached, never stale.
    pub fn total_cents(&self) -> i64 {
        self.items
            .values()
            .map(|item| item.unit_price_cents * i64::from(item.quantity))
            .sum()
    }

    /// Detached copy of the current lines, ordered by product name for a
    /// stable display.
    pub fn snapshot(&self) -> Vec<CartItem> {
        let mut items: Vec<CartItem> = self.items.values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }
}

/// Detached summary snapshot handed from checkout to the confirmation view,
/// so order contents can render after the live cart has been emptied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderSummary {
    pub items: Vec<SummaryItem>,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryItem {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub price_cents: i64,
    pub quantity: i32,
    pub farm: String,
}

impl OrderSummary {
    pub fn from_items(items: &[CartItem]) -> Self {
        let total_cents = items
            .iter()
            .map(|i| i.unit_price_cents * i64::from(i.quantity))
            .sum();
        OrderSummary {
            items: items
                .iter()
                .map(|i| SummaryItem {
                    id: i.product_id,
                    name: i.name.clone(),
                    image: i.image.clone(),
                    price_cents: i.unit_price_cents,
                    quantity: i.quantity,
                    farm: i.farm.clone(),
                })
                .collect(),
            total_cents,
        }
    }
}

/// Shared in-process registry of carts, one per active session.
///
/// Lock guards are short-lived and never held across `.await`; all cart
/// mutation happens through closures under the lock.
#[derive(Clone)]
pub struct CartStore {
    carts: Arc<RwLock<HashMap<SessionKey, Cart>>>,
    retention: CartRetention,
}

impl CartStore {
    pub fn new(retention: CartRetention) -> Self {
        Self {
            carts: Arc::new(RwLock::new(HashMap::new())),
            retention,
        }
    }

    /// Reads through the session's cart; absent sessions read as empty.
    pub fn with_cart<R>(&self, key: SessionKey, f: impl FnOnce(&Cart) -> R) -> R {
        let guard = self.carts.read();
        match guard.get(&key) {
            Some(cart) => f(cart),
            None => f(&Cart::new()),
        }
    }

    /// Mutates the session's cart, creating it on first use.
    pub fn update<R>(&self, key: SessionKey, f: impl FnOnce(&mut Cart) -> R) -> R {
        let mut guard = self.carts.write();
        f(guard.entry(key).or_default())
    }

    pub fn snapshot(&self, key: SessionKey) -> Vec<CartItem> {
        self.with_cart(key, |cart| cart.snapshot())
    }

    pub fn is_empty(&self, key: SessionKey) -> bool {
        self.with_cart(key, |cart| cart.is_empty())
    }

    /// Empties the session's cart, honoring the configured retention policy.
    pub fn clear(&self, key: SessionKey) {
        let mut guard = self.carts.write();
        match self.retention {
            CartRetention::Volatile => {
                guard.remove(&key);
            }
            CartRetention::Sticky => {
                if let Some(cart) = guard.get_mut(&key) {
                    cart.clear();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: Uuid, name: &str, price_cents: i64, quantity: i32) -> CartItem {
        CartItem {
            product_id: id,
            name: name.to_string(),
            image: String::new(),
            unit_price_cents: price_cents,
            farm: "Farm".to_string(),
            quantity,
        }
    }

    #[test]
    fn total_is_recomputed_over_surviving_entries() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add_item(item(a, "Apples", 1000, 2));
        cart.add_item(item(b, "Beets", 500, 1));
        assert_eq!(cart.total_cents(), 2500);

        cart.update_quantity(a, 3);
        assert_eq!(cart.total_cents(), 3500);

        cart.remove_item(b);
        assert_eq!(cart.total_cents(), 3000);

        cart.clear();
        assert_eq!(cart.total_cents(), 0);
    }

    #[test]
    fn add_item_merges_by_product_id() {
        let a = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add_item(item(a, "Apples", 1000, 2));
        cart.add_item(item(a, "Apples", 1000, 1));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.snapshot()[0].quantity, 3);
    }

    #[test]
    fn update_after_remove_does_not_resurrect_entry() {
        let a = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add_item(item(a, "Apples", 1000, 2));
        cart.remove_item(a);
        cart.update_quantity(a, 5);
        assert!(cart.is_empty());
        assert_eq!(cart.total_cents(), 0);
    }

    #[test]
    fn summary_snapshot_is_detached_from_the_cart() {
        let a = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add_item(item(a, "Apples", 1000, 2));
        let summary = OrderSummary::from_items(&cart.snapshot());
        cart.clear();

        assert_eq!(summary.total_cents, 2000);
        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.items[0].quantity, 2);
        assert_eq!(cart.total_cents(), 0);
    }

    #[test]
    fn volatile_retention_drops_the_cart_entry() {
        let key = SessionKey(Uuid::new_v4());
        let store = CartStore::new(CartRetention::Volatile);
        store.update(key, |cart| cart.add_item(item(Uuid::new_v4(), "Apples", 1000, 1)));
        store.clear(key);
        assert!(store.carts.read().get(&key).is_none());
    }

    #[test]
    fn sticky_retention_keeps_an_empty_cart() {
        let key = SessionKey(Uuid::new_v4());
        let store = CartStore::new(CartRetention::Sticky);
        store.update(key, |cart| cart.add_item(item(Uuid::new_v4(), "Apples", 1000, 1)));
        store.clear(key);
        assert!(store.carts.read().get(&key).is_some_and(|c| c.is_empty()));
    }
}
