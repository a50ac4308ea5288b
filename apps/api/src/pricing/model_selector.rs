//! Model selector: decides whether a service is billed flat-fee, hourly or mixed.
//!
//! Order of resolution:
//! 1. service name names a flat-fee reference entry in full → FlatFee (no LLM call)
//! 2. LLM classification with a strict `{"modeloCobro": ...}` contract
//! 3. keyword best guess when the classifier fails, times out or answers garbage

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{complete_json, LlmError, TextCompleter};
use crate::pricing::catalog::{closest_match, mentions};
use crate::pricing::policy::PricingPolicy;
use crate::pricing::prompts::{fill_template, MODEL_CLASSIFICATION_PROMPT};
use crate::pricing::{ModelSelection, ModelSource, PricingModel, ServiceDescriptor};

#[derive(Debug, Deserialize)]
struct ModelAnswer {
    #[serde(rename = "modeloCobro")]
    model: PricingModel,
}

pub async fn select_model(
    service: &ServiceDescriptor,
    policy: &PricingPolicy,
    llm: &dyn TextCompleter,
    timeout: Duration,
) -> ModelSelection {
    // A partial overlap ("contrato" alone) is only a category hint for the
    // calculator; it must not decide the model.
    let found = closest_match(
        &policy.flat_fee_catalog,
        &service.name,
        policy.catalog_min_overlap,
    )
    .filter(|m| m.exact || m.covers_name);
    if let Some(found) = found {
        debug!("'{}' matched catalog entry '{}'", service.name, found.entry.name);
        return ModelSelection {
            model: PricingModel::FlatFee,
            source: ModelSource::Catalog {
                entry: found.entry.name.clone(),
                exact: found.exact,
            },
        };
    }

    match classify(service, llm, timeout).await {
        Ok(model) => ModelSelection {
            model,
            source: ModelSource::Classifier,
        },
        Err(e) => {
            let model = heuristic_model(service, policy);
            warn!(
                "Model classification failed for '{}': {e}; using keyword guess {:?}",
                service.name, model
            );
            ModelSelection {
                model,
                source: ModelSource::Heuristic,
            }
        }
    }
}

async fn classify(
    service: &ServiceDescriptor,
    llm: &dyn TextCompleter,
    timeout: Duration,
) -> Result<PricingModel, LlmError> {
    let prompt = fill_template(
        MODEL_CLASSIFICATION_PROMPT,
        &[
            ("service_name", service.name.as_str()),
            ("description", service.description.as_str()),
        ],
    );
    let answer: ModelAnswer = complete_json(llm, &prompt, JSON_ONLY_SYSTEM, timeout).await?;
    Ok(answer.model)
}

/// Keyword best guess over name and description.
///
/// Flat-fee terms only → FlatFee, hourly terms only → Hourly,
/// both → Mixed, neither → Hourly.
pub fn heuristic_model(service: &ServiceDescriptor, policy: &PricingPolicy) -> PricingModel {
    let text = format!("{} {}", service.name, service.description);
    let flat = policy.flat_fee_terms.iter().any(|t| mentions(&text, t));
    let hourly = policy.hourly_terms.iter().any(|t| mentions(&text, t));

    match (flat, hourly) {
        (true, true) => PricingModel::Mixed,
        (true, false) => PricingModel::FlatFee,
        _ => PricingModel::Hourly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::test_support::{service, ScriptedCompleter};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_catalog_name_match_skips_llm() {
        let llm = ScriptedCompleter::new(Some(r#"{"modeloCobro": "HOURLY"}"#), None);
        let policy = PricingPolicy::default();
        let selection = select_model(
            &service("Registro de Marca", "Registro ante el IMPI", ""),
            &policy,
            &llm,
            TIMEOUT,
        )
        .await;

        assert_eq!(selection.model, PricingModel::FlatFee);
        assert_eq!(
            selection.source,
            ModelSource::Catalog {
                entry: "Registro de Marca".to_string(),
                exact: true,
            }
        );
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_full_name_inside_longer_title_skips_llm() {
        let llm = ScriptedCompleter::new(Some(r#"{"modeloCobro": "HOURLY"}"#), None);
        let selection = select_model(
            &service("Registro de marca ante el IMPI", "Solicitud y seguimiento", ""),
            &PricingPolicy::default(),
            &llm,
            TIMEOUT,
        )
        .await;

        assert_eq!(
            selection.source,
            ModelSource::Catalog {
                entry: "Registro de Marca".to_string(),
                exact: false,
            }
        );
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_partial_name_overlap_still_asks_classifier() {
        let llm = ScriptedCompleter::new(Some(r#"{"modeloCobro": "HOURLY"}"#), None);
        let selection = select_model(
            &service("Revisión de contrato laboral", "Litigio laboral", ""),
            &PricingPolicy::default(),
            &llm,
            TIMEOUT,
        )
        .await;

        assert_eq!(selection.model, PricingModel::Hourly);
        assert_eq!(selection.source, ModelSource::Classifier);
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_classifier_answer_used_when_no_catalog_match() {
        let llm = ScriptedCompleter::new(Some(r#"{"modeloCobro": "MIXTO"}"#), None);
        let selection = select_model(
            &service("Juicio mercantil", "Cobro de pagarés", ""),
            &PricingPolicy::default(),
            &llm,
            TIMEOUT,
        )
        .await;

        assert_eq!(selection.model, PricingModel::Mixed);
        assert_eq!(selection.source, ModelSource::Classifier);
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_answer_falls_back_to_keywords() {
        let llm = ScriptedCompleter::new(Some("Yo sugeriría cobrar por hora."), None);
        let selection = select_model(
            &service("Juicio mercantil", "Litigio por cobro de pagarés", ""),
            &PricingPolicy::default(),
            &llm,
            TIMEOUT,
        )
        .await;

        assert_eq!(selection.model, PricingModel::Hourly);
        assert_eq!(selection.source, ModelSource::Heuristic);
    }

    #[tokio::test]
    async fn test_out_of_contract_value_falls_back() {
        let llm = ScriptedCompleter::new(Some(r#"{"modeloCobro": "SUSCRIPCION"}"#), None);
        let selection = select_model(
            &service("Escritura de donación", "Trámite notarial", ""),
            &PricingPolicy::default(),
            &llm,
            TIMEOUT,
        )
        .await;

        assert_eq!(selection.source, ModelSource::Heuristic);
        assert_eq!(selection.model, PricingModel::FlatFee);
    }

    #[tokio::test]
    async fn test_offline_classifier_is_deterministic() {
        let policy = PricingPolicy::default();
        let svc = service(
            "Paquete de asesoría corporativa",
            "Contrato base más asesoría mensual",
            "",
        );
        let first = select_model(&svc, &policy, &ScriptedCompleter::offline(), TIMEOUT).await;
        let second = select_model(&svc, &policy, &ScriptedCompleter::offline(), TIMEOUT).await;
        assert_eq!(first, second);
        assert_eq!(first.model, PricingModel::Mixed);
    }

    #[test]
    fn test_heuristic_defaults_to_hourly() {
        let model = heuristic_model(
            &service("Opinión legal", "Análisis de un caso", ""),
            &PricingPolicy::default(),
        );
        assert_eq!(model, PricingModel::Hourly);
    }
}
