use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

/// Orders are created `pending`; `failed` is only written by the
/// items-insert compensation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Failed,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub status: OrderStatus,
    pub currency: String,
    pub shipping_address_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
