// Pricing suggestions for legal services.
// Pipeline: model_selector + complexity + rate_lookup (concurrent) → calculator.
// All LLM calls go through llm_client, never the API directly.

use serde::{Deserialize, Serialize};

pub mod calculator;
pub mod catalog;
pub mod complexity;
pub mod handlers;
pub mod model_selector;
pub mod policy;
pub mod prompts;
pub mod rate_lookup;
pub mod suggest;

#[cfg(test)]
pub mod test_support;

// ────────────────────────────────────────────────────────────────────────────
// Shared data models
// ────────────────────────────────────────────────────────────────────────────

/// How a service is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingModel {
    #[serde(rename = "FLAT_FEE")]
    FlatFee,
    #[serde(rename = "HOURLY")]
    Hourly,
    #[serde(rename = "MIXTO")]
    Mixed,
}

impl PricingModel {
    /// Spanish label used in rationale text.
    pub fn label(&self) -> &'static str {
        match self {
            PricingModel::FlatFee => "tarifa fija",
            PricingModel::Hourly => "por hora",
            PricingModel::Mixed => "mixto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplexityTier {
    #[serde(rename = "bajo")]
    Low,
    #[serde(rename = "medio")]
    Medium,
    #[serde(rename = "alto")]
    High,
}

impl ComplexityTier {
    pub fn label(&self) -> &'static str {
        match self {
            ComplexityTier::Low => "baja",
            ComplexityTier::Medium => "media",
            ComplexityTier::High => "alta",
        }
    }
}

/// Estimated hours. Valid ranges satisfy `0 < minimum <= maximum`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourRange {
    #[serde(rename = "minimo")]
    pub minimum: f64,
    #[serde(rename = "maximo")]
    pub maximum: f64,
}

impl HourRange {
    pub fn new(minimum: f64, maximum: f64) -> Self {
        Self { minimum, maximum }
    }

    pub fn is_valid(&self) -> bool {
        self.minimum.is_finite()
            && self.maximum.is_finite()
            && self.minimum > 0.0
            && self.minimum <= self.maximum
    }
}

/// Monetary range. Always `minimum <= average <= maximum`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(rename = "minimo")]
    pub minimum: f64,
    #[serde(rename = "promedio")]
    pub average: f64,
    #[serde(rename = "maximo")]
    pub maximum: f64,
}

impl PriceRange {
    /// Builds a range from two endpoints in any order; average is the midpoint.
    pub fn from_endpoints(a: f64, b: f64) -> Self {
        let (minimum, maximum) = if a <= b { (a, b) } else { (b, a) };
        let minimum = round_money(minimum);
        let maximum = round_money(maximum);
        Self {
            minimum,
            average: round_money((minimum + maximum) / 2.0),
            maximum,
        }
    }
}

/// Rounds a monetary amount to cents.
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The service being quoted. Immutable per request.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
    pub name: String,
    pub description: String,
    pub details: String,
    pub estimated_time: Option<String>,
    pub inclusions: Vec<String>,
}

/// Where the pricing model decision came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    /// The service name matched this reference-table entry, in full or exactly.
    Catalog { entry: String, exact: bool },
    Classifier,
    /// Classifier unavailable; keyword best guess.
    Heuristic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSelection {
    pub model: PricingModel,
    pub source: ModelSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexitySource {
    Classifier,
    Heuristic,
    /// No usable signal; degraded to Medium.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexityAssessment {
    pub tier: ComplexityTier,
    pub hour_range: HourRange,
    pub source: ComplexitySource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Profile,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyRate {
    pub amount: f64,
    pub source: RateSource,
}

/// Final pricing suggestion returned to the client. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingSuggestion {
    #[serde(rename = "modeloCobro")]
    pub model: PricingModel,
    #[serde(rename = "rangoSugerido")]
    pub suggested_range: PriceRange,
    #[serde(rename = "complejidad")]
    pub complexity: ComplexityTier,
    #[serde(rename = "horasEstimadas")]
    pub hour_range: HourRange,
    #[serde(rename = "tarifaHorariaUsada")]
    pub hourly_rate_used: f64,
    #[serde(rename = "justificacion")]
    pub rationale: String,
    #[serde(rename = "factoresAnalizados")]
    pub factors: Vec<String>,
    #[serde(rename = "confianza")]
    pub confidence: f64,
}
