use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Vendor {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub farm_name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VendorRegistration {
    pub farm_name: String,
    pub location: Option<String>,
}
