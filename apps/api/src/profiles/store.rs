use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::models::profile::UserProfileRow;

/// Creates the PostgreSQL pool backing the profile store.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .context("Failed to connect to the profile database")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

pub async fn get_profile(pool: &PgPool, user_id: &str) -> sqlx::Result<Option<UserProfileRow>> {
    let row = sqlx::query_as::<_, UserProfileRow>(
        "SELECT user_id, display_name, hourly_rate, updated_at FROM user_profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Creates the profile if needed and sets its hourly rate.
pub async fn upsert_hourly_rate(
    pool: &PgPool,
    user_id: &str,
    rate: f64,
) -> sqlx::Result<UserProfileRow> {
    let row = sqlx::query_as::<_, UserProfileRow>(
        r#"
        INSERT INTO user_profiles (user_id, hourly_rate, updated_at)
        VALUES ($1, $2, now())
        ON CONFLICT (user_id)
        DO UPDATE SET hourly_rate = EXCLUDED.hourly_rate, updated_at = now()
        RETURNING user_id, display_name, hourly_rate, updated_at
        "#,
    )
    .bind(user_id)
    .bind(rate)
    .fetch_one(pool)
    .await?;

    info!("Hourly rate for user {user_id} set to {rate}");
    Ok(row)
}

/// Only finite, strictly positive rates may be stored.
pub fn validate_rate(rate: f64) -> Result<f64, String> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("hourlyRate must be a positive number, got {rate}"))
    }
}
