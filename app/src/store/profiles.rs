//! Profile rows: bootstrap-on-first-contact plus the profile and privacy
//! settings screens' reads and writes.

use crate::errors::{AppError, Result};
use crate::models::{PrivacySettings, Profile, ProfileUpdate};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

const PROFILE_COLUMNS: &str = "id, full_name, avatar_url, phone, location, role, \
                               show_email, show_phone, show_location, created_at";

/// Makes sure a profile row exists for a freshly authenticated subject.
///
/// Failures here are logged and swallowed: this is background
/// reconciliation, never surfaced to the user.
pub async fn ensure_profile_exists(
    pool: &PgPool,
    profile_id: Uuid,
    full_name: Option<&str>,
    avatar_url: Option<&str>,
) {
    if let Err(err) = try_ensure_profile(pool, profile_id, full_name, avatar_url).await {
        warn!(%profile_id, error = %err, "Profile bootstrap failed; continuing without it.");
    }
}

async fn try_ensure_profile(
    pool: &PgPool,
    profile_id: Uuid,
    full_name: Option<&str>,
    avatar_url: Option<&str>,
) -> Result<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1)")
        .bind(profile_id)
        .fetch_one(pool)
        .await?;
    if exists {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO profiles (id, full_name, avatar_url, role)
        VALUES ($1, $2, $3, 'user')
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(profile_id)
    .bind(full_name)
    .bind(avatar_url)
    .execute(pool)
    .await?;

    info!(%profile_id, "Profile row created for new user.");
    Ok(())
}

pub async fn fetch_profile(pool: &PgPool, profile_id: Uuid) -> Result<Profile> {
    let query = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
    sqlx::query_as::<_, Profile>(&query)
        .bind(profile_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found.", profile_id)))
}

/// Applies the provided fields; absent fields keep their current values.
pub async fn update_profile(
    pool: &PgPool,
    profile_id: Uuid,
    update: &ProfileUpdate,
) -> Result<Profile> {
    let query = format!(
        r#"
        UPDATE profiles
        SET full_name = COALESCE($2, full_name),
            avatar_url = COALESCE($3, avatar_url),
            phone = COALESCE($4, phone),
            location = COALESCE($5, location)
        WHERE id = $1
        RETURNING {}
        "#,
        PROFILE_COLUMNS
    );
    sqlx::query_as::<_, Profile>(&query)
        .bind(profile_id)
        .bind(&update.full_name)
        .bind(&update.avatar_url)
        .bind(&update.phone)
        .bind(&update.location)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found.", profile_id)))
}

pub async fn update_privacy_settings(
    pool: &PgPool,
    profile_id: Uuid,
    settings: PrivacySettings,
) -> Result<Profile> {
    let query = format!(
        r#"
        UPDATE profiles
        SET show_email = $2, show_phone = $3, show_location = $4
        WHERE id = $1
        RETURNING {}
        "#,
        PROFILE_COLUMNS
    );
    sqlx::query_as::<_, Profile>(&query)
        .bind(profile_id)
        .bind(settings.show_email)
        .bind(settings.show_phone)
        .bind(settings.show_location)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found.", profile_id)))
}
