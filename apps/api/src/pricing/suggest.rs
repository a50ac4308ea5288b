//! Pricing suggestion: orchestrates the full pipeline for one request.
//!
//! Flow: validate request → (select_model ∥ estimate_complexity ∥ lookup_rate) → calculate.
//!
//! Validation happens before any collaborator is touched. The three lookups never
//! fail; only validation and the calculator's input checks can fail a request.

use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::TextCompleter;
use crate::pricing::calculator::calculate;
use crate::pricing::complexity::estimate_complexity;
use crate::pricing::model_selector::select_model;
use crate::pricing::policy::PricingPolicy;
use crate::pricing::rate_lookup::{lookup_rate, ProfileStore};
use crate::pricing::{PricingSuggestion, ServiceDescriptor};

/// Request body for a pricing suggestion. Every field is optional on the wire so
/// that missing ones can be reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub service_name: Option<String>,
    pub description: Option<String>,
    pub details: Option<String>,
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    pub user_id: Option<String>,
}

/// Collaborators the pipeline needs, borrowed from `AppState`.
pub struct PricingDeps<'a> {
    pub llm: &'a dyn TextCompleter,
    pub profiles: &'a dyn ProfileStore,
    pub policy: &'a PricingPolicy,
    pub llm_timeout: Duration,
}

impl SuggestRequest {
    /// Splits the request into the service descriptor and user id, or lists
    /// every required field that is absent or blank.
    pub fn validate(self) -> Result<(ServiceDescriptor, String), AppError> {
        let mut missing = Vec::new();
        let mut take = |value: Option<String>, field: &str| match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                missing.push(field.to_string());
                String::new()
            }
        };

        let name = take(self.service_name, "serviceName");
        let description = take(self.description, "description");
        let details = take(self.details, "details");
        let user_id = take(self.user_id, "userId");

        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        let service = ServiceDescriptor {
            name: name.trim().to_string(),
            description,
            details,
            estimated_time: self.estimated_time.filter(|t| !t.trim().is_empty()),
            inclusions: self.inclusions,
        };
        Ok((service, user_id.trim().to_string()))
    }
}

pub async fn suggest_pricing(
    request: SuggestRequest,
    deps: &PricingDeps<'_>,
) -> Result<PricingSuggestion, AppError> {
    let (service, user_id) = request.validate()?;
    info!("Pricing '{}' for user {user_id}", service.name);

    let (selection, complexity, rate) = tokio::join!(
        select_model(&service, deps.policy, deps.llm, deps.llm_timeout),
        estimate_complexity(&service, deps.policy, deps.llm, deps.llm_timeout),
        lookup_rate(deps.profiles, &user_id, deps.policy.default_hourly_rate),
    );

    let suggestion = calculate(&selection, &complexity, &rate, &service, deps.policy)?;
    info!(
        "Suggested {:?} {}–{} for '{}' (confidence {})",
        suggestion.model,
        suggestion.suggested_range.minimum,
        suggestion.suggested_range.maximum,
        service.name,
        suggestion.confidence
    );

    Ok(suggestion)
}
