//! Rate lookup: the user's hourly rate, or the market default.
//!
//! A missing, non-positive or unreadable rate is never an error here; it only
//! switches the result to the policy default.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::pricing::{HourlyRate, RateSource};

/// Read access to stored user profiles.
///
/// Carried in `AppState` as `Arc<dyn ProfileStore>`.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn hourly_rate(&self, user_id: &str) -> anyhow::Result<Option<f64>>;
}

/// PostgreSQL-backed profile store (`user_profiles` table).
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn hourly_rate(&self, user_id: &str) -> anyhow::Result<Option<f64>> {
        let rate: Option<Option<f64>> =
            sqlx::query_scalar("SELECT hourly_rate FROM user_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(rate.flatten())
    }
}

pub async fn lookup_rate(store: &dyn ProfileStore, user_id: &str, default_rate: f64) -> HourlyRate {
    let fallback = HourlyRate {
        amount: default_rate,
        source: RateSource::Default,
    };

    match store.hourly_rate(user_id).await {
        Ok(Some(rate)) if rate.is_finite() && rate > 0.0 => {
            debug!("Using profile hourly rate {rate} for user {user_id}");
            HourlyRate {
                amount: rate,
                source: RateSource::Profile,
            }
        }
        Ok(Some(rate)) => {
            warn!("Ignoring non-positive hourly rate {rate} for user {user_id}");
            fallback
        }
        Ok(None) => fallback,
        Err(e) => {
            warn!("Profile lookup failed for user {user_id}: {e}; using default rate");
            fallback
        }
    }
}
