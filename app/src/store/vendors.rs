//! Vendor rows: registration and the vendor profile screen's read.

use crate::errors::{AppError, Result};
use crate::models::{Vendor, VendorRegistration};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub async fn register_vendor(
    pool: &PgPool,
    profile_id: Uuid,
    registration: &VendorRegistration,
) -> Result<Vendor> {
    let vendor: Vendor = sqlx::query_as(
        r#"
        INSERT INTO vendors (profile_id, farm_name, location)
        VALUES ($1, $2, $3)
        RETURNING id, profile_id, farm_name, location
        "#,
    )
    .bind(profile_id)
    .bind(&registration.farm_name)
    .bind(&registration.location)
    .fetch_one(pool)
    .await?;

    info!(%profile_id, vendor_id = %vendor.id, "Vendor registered.");
    Ok(vendor)
}

pub async fn fetch_vendor_for_profile(pool: &PgPool, profile_id: Uuid) -> Result<Vendor> {
    sqlx::query_as::<_, Vendor>(
        "SELECT id, profile_id, farm_name, location FROM vendors WHERE profile_id = $1",
    )
    .bind(profile_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("No vendor profile for this account.".to_string()))
}
