use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub role: String,
    pub show_email: bool,
    pub show_phone: bool,
    pub show_location: bool,
    pub created_at: DateTime<Utc>,
}

/// Editable profile fields; absent fields are left untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// The three visibility toggles from the privacy settings screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PrivacySettings {
    pub show_email: bool,
    pub show_phone: bool,
    pub show_location: bool,
}
