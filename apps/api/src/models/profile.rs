use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A legal professional's stored profile. `hourly_rate` is optional; pricing
/// falls back to the market default when it is absent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileRow {
    pub user_id: String,
    pub display_name: Option<String>,
    pub hourly_rate: Option<f64>,
    pub updated_at: DateTime<Utc>,
}
