use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One row per distinct cart line. `total_price_cents` is computed at write
/// time (`quantity * unit_price_cents`), never re-derived later.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub total_price_cents: i64,
}
