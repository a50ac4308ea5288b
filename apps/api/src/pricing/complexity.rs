//! Complexity estimator: service descriptor → tier + hour range.
//!
//! The tier comes from the LLM estimate when it answers within contract, otherwise
//! from a heuristic score over the descriptor. With no usable signal at all the tier
//! degrades to Medium. Hours always come from the policy's tier table.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{complete_json, LlmError, TextCompleter};
use crate::pricing::catalog::{mentions, normalize};
use crate::pricing::policy::PricingPolicy;
use crate::pricing::prompts::{fill_template, COMPLEXITY_ESTIMATION_PROMPT};
use crate::pricing::{ComplexityAssessment, ComplexitySource, ComplexityTier, ServiceDescriptor};

#[derive(Debug, Deserialize)]
struct ComplexityAnswer {
    #[serde(rename = "complejidad")]
    tier: ComplexityTier,
}

pub async fn estimate_complexity(
    service: &ServiceDescriptor,
    policy: &PricingPolicy,
    llm: &dyn TextCompleter,
    timeout: Duration,
) -> ComplexityAssessment {
    let (tier, source) = match estimate_with_llm(service, llm, timeout).await {
        Ok(tier) => (tier, ComplexitySource::Classifier),
        Err(e) => {
            let fallback = match heuristic_tier(service, policy) {
                Some(tier) => (tier, ComplexitySource::Heuristic),
                None => (ComplexityTier::Medium, ComplexitySource::Default),
            };
            warn!(
                "Complexity estimation failed for '{}': {e}; using {:?} ({:?})",
                service.name, fallback.0, fallback.1
            );
            fallback
        }
    };

    ComplexityAssessment {
        tier,
        hour_range: policy.tier_hours.for_tier(tier),
        source,
    }
}

async fn estimate_with_llm(
    service: &ServiceDescriptor,
    llm: &dyn TextCompleter,
    timeout: Duration,
) -> Result<ComplexityTier, LlmError> {
    let inclusions = if service.inclusions.is_empty() {
        "(sin detalle)".to_string()
    } else {
        service
            .inclusions
            .iter()
            .map(|i| format!("- {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let prompt = fill_template(
        COMPLEXITY_ESTIMATION_PROMPT,
        &[
            ("service_name", service.name.as_str()),
            ("description", service.description.as_str()),
            ("details", service.details.as_str()),
            (
                "estimated_time",
                service.estimated_time.as_deref().unwrap_or("no indicado"),
            ),
            ("inclusions", inclusions.as_str()),
        ],
    );

    let answer: ComplexityAnswer = complete_json(llm, &prompt, JSON_ONLY_SYSTEM, timeout).await?;
    Ok(answer.tier)
}

/// Scores the descriptor's structural and lexical signals.
/// Returns `None` when the descriptor carries no signal at all.
pub fn heuristic_tier(service: &ServiceDescriptor, policy: &PricingPolicy) -> Option<ComplexityTier> {
    let rules = &policy.complexity;
    let mut score = 0_i32;
    let mut has_signal = false;

    let details_len = service.details.trim().chars().count();
    if details_len > 0 {
        has_signal = true;
        if details_len >= rules.long_details_chars {
            score += 2;
        } else if details_len >= rules.medium_details_chars {
            score += 1;
        }
    }

    let inclusions = service
        .inclusions
        .iter()
        .filter(|i| !i.trim().is_empty())
        .count();
    if inclusions > 0 {
        has_signal = true;
        if inclusions >= rules.many_inclusions {
            score += 2;
        } else if inclusions >= rules.some_inclusions {
            score += 1;
        }
    }

    let text = format!(
        "{} {} {} {}",
        service.name,
        service.description,
        service.details,
        service.inclusions.join(" ")
    );
    let complex_hits = rules
        .complexity_terms
        .iter()
        .filter(|t| mentions(&text, t))
        .count();
    if complex_hits > 0 {
        has_signal = true;
        score += complex_hits.min(2) as i32;
    }
    if rules.simplicity_terms.iter().any(|t| mentions(&text, t)) {
        has_signal = true;
        score -= 1;
    }

    if let Some(hours) = service.estimated_time.as_deref().and_then(parse_estimated_hours) {
        has_signal = true;
        if hours >= policy.tier_hours.high.minimum {
            score += 2;
        } else if hours >= policy.tier_hours.medium.minimum {
            score += 1;
        } else {
            score -= 1;
        }
    }

    if !has_signal {
        return None;
    }

    debug!("Heuristic complexity score for '{}': {score}", service.name);
    let tier = if score <= rules.low_max_score {
        ComplexityTier::Low
    } else if score >= rules.high_min_score {
        ComplexityTier::High
    } else {
        ComplexityTier::Medium
    };
    Some(tier)
}

/// Reads a free-text duration such as "10 horas", "3 días" or "1.000 horas" as hours.
///
/// Units are whole words; the first one mentioned applies to the largest number.
/// Text without a known unit yields `None`.
pub fn parse_estimated_hours(text: &str) -> Option<f64> {
    let text = normalize(text);

    // (is_number, text) runs: "10hrs" → ["10", "hrs"], "1.000,5" stays whole.
    let mut segments: Vec<(bool, String)> = Vec::new();
    let mut open = false;
    for c in text.chars() {
        let in_number = open && segments.last().is_some_and(|(number, _)| *number);
        let kind = if c.is_ascii_digit() || (in_number && (c == '.' || c == ',')) {
            Some(true)
        } else if c.is_alphabetic() {
            Some(false)
        } else {
            None
        };
        let extends_run = open && segments.last().is_some_and(|(last, _)| Some(*last) == kind);
        match kind {
            Some(_) if extends_run => {
                if let Some((_, run)) = segments.last_mut() {
                    run.push(c);
                }
            }
            Some(k) => segments.push((k, c.to_string())),
            None => {}
        }
        open = kind.is_some();
    }

    let hours_per_unit = segments
        .iter()
        .filter(|(number, _)| !number)
        .find_map(|(_, word)| unit_hours(word))?;

    segments
        .iter()
        .filter(|(number, _)| *number)
        .filter_map(|(_, raw)| parse_amount(raw))
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(None, |largest: Option<f64>, v| Some(largest.map_or(v, |l| l.max(v))))
        .map(|v| v * hours_per_unit)
}

fn unit_hours(word: &str) -> Option<f64> {
    match word {
        "mes" | "meses" => Some(160.0),
        "semana" | "semanas" => Some(40.0),
        "dia" | "dias" => Some(8.0),
        "hora" | "horas" | "hr" | "hrs" | "h" => Some(1.0),
        _ => None,
    }
}

/// Spanish number formatting: "." groups thousands, "," marks decimals.
/// A lone "." not followed by exactly three digits is read as a decimal point.
fn parse_amount(raw: &str) -> Option<f64> {
    let raw = raw.trim_end_matches(|c| c == '.' || c == ',');
    let (integer, fraction) = match raw.split_once(',') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (raw, None),
    };

    let mut groups = integer.split('.');
    let head = groups.next()?;
    let rest: Vec<&str> = groups.collect();
    let integer = if rest.iter().all(|g| g.len() == 3) {
        format!("{head}{}", rest.concat())
    } else if fraction.is_none() && rest.len() == 1 {
        format!("{head}.{}", rest[0])
    } else {
        return None;
    };

    match fraction {
        Some(fraction) => format!("{integer}.{fraction}").parse().ok(),
        None => integer.parse().ok(),
    }
}
