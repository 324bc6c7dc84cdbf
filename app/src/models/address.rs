use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Address {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub label: String,
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub is_default: bool,
}

/// Shipping address as submitted by the checkout form. One row is created
/// per checkout attempt; rows are immutable once persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressInput {
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// Defaults from configuration when absent.
    pub country: Option<String>,
}
