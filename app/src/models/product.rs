use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Raw catalog row: an active product joined to its vendor and category.
/// Relations are nullable; the projection into [`DisplayProduct`] supplies
/// the defaults.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub price_cents: Option<i64>,
    pub stock: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub farm_name: Option<String>,
    pub vendor_location: Option<String>,
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductImageRow {
    pub product_id: Uuid,
    pub url: String,
    pub position: Option<i32>,
}

/// Display-ready product representation served to listing screens.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DisplayProduct {
    pub id: Uuid,
    pub image: String,
    pub name: String,
    pub price_cents: i64,
    pub farm: String,
    pub location: String,
    /// Human-readable recency label: "Today" / "Yesterday" / "N days ago".
    pub harvested_at: String,
    pub quantity: i32,
    pub category: String,
}
