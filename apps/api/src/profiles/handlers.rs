use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::profile::UserProfileRow;
use crate::profiles::store::{get_profile, upsert_hourly_rate, validate_rate};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyRateUpdate {
    pub hourly_rate: f64,
}

/// GET /api/v1/profiles/:user_id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfileRow>, AppError> {
    let profile = get_profile(&state.db, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {user_id} not found")))?;
    Ok(Json(profile))
}

/// PUT /api/v1/profiles/:user_id/hourly-rate
pub async fn handle_set_hourly_rate(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<HourlyRateUpdate>,
) -> Result<Json<UserProfileRow>, AppError> {
    let rate = validate_rate(req.hourly_rate).map_err(AppError::Validation)?;
    let profile = upsert_hourly_rate(&state.db, &user_id, rate).await?;
    Ok(Json(profile))
}
