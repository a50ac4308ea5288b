//! Axum route handlers for the Pricing API.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::pricing::catalog::FlatFeeEntry;
use crate::pricing::suggest::{suggest_pricing, PricingDeps, SuggestRequest};
use crate::pricing::PricingSuggestion;
use crate::state::AppState;

/// POST /api/v1/pricing/suggest
///
/// Suggests a pricing model and price range for a legal service.
/// Missing required fields → 400 before any LLM or profile call.
pub async fn handle_suggest(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<PricingSuggestion>, AppError> {
    let deps = PricingDeps {
        llm: state.llm.as_ref(),
        profiles: state.profiles.as_ref(),
        policy: state.policy.as_ref(),
        llm_timeout: state.config.llm_timeout,
    };

    let suggestion = suggest_pricing(request, &deps).await?;
    Ok(Json(suggestion))
}

/// GET /api/v1/pricing/catalog
///
/// Returns the flat-fee reference table in table order.
pub async fn handle_catalog(State(state): State<AppState>) -> Json<Vec<FlatFeeEntry>> {
    Json(state.policy.flat_fee_catalog.clone())
}
