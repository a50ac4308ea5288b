//! Pricing policy: every tunable table the pricing pipeline reads.
//!
//! Loaded once at startup (JSON file or built-in defaults), validated, and then
//! shared read-only. Nothing in `pricing` keeps module-level mutable tables.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::pricing::catalog::FlatFeeEntry;
use crate::pricing::{ComplexityTier, HourRange};

/// Hour ranges per complexity tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierHours {
    pub low: HourRange,
    pub medium: HourRange,
    pub high: HourRange,
}

impl TierHours {
    pub fn for_tier(&self, tier: ComplexityTier) -> HourRange {
        match tier {
            ComplexityTier::Low => self.low,
            ComplexityTier::Medium => self.medium,
            ComplexityTier::High => self.high,
        }
    }
}

/// Thresholds and term lists for the heuristic complexity score.
///
/// Each signal adds points; the sum maps to a tier:
/// `score <= low_max_score` → Low, `score >= high_min_score` → High, else Medium.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityThresholds {
    pub medium_details_chars: usize,
    pub long_details_chars: usize,
    pub some_inclusions: usize,
    pub many_inclusions: usize,
    pub complexity_terms: Vec<String>,
    pub simplicity_terms: Vec<String>,
    pub low_max_score: i32,
    pub high_min_score: i32,
}

/// Confidence = `base + step * certain_inputs`, clamped to [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub base: f64,
    pub step: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Market hourly rate used when a profile has none.
    pub default_hourly_rate: f64,
    /// Reference flat-fee table, oldest entry first.
    pub flat_fee_catalog: Vec<FlatFeeEntry>,
    /// Minimum share of an entry's keywords a service must mention to match it.
    pub catalog_min_overlap: f64,
    pub flat_fee_terms: Vec<String>,
    pub hourly_terms: Vec<String>,
    pub tier_hours: TierHours,
    pub complexity: ComplexityThresholds,
    pub confidence: ConfidenceWeights,
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn entry(name: &str, keywords: &[&str], minimum: f64, maximum: f64) -> FlatFeeEntry {
    FlatFeeEntry {
        name: name.to_string(),
        keywords: terms(keywords),
        minimum,
        maximum,
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            default_hourly_rate: 1500.0,
            flat_fee_catalog: vec![
                entry("Constitución de Sociedad Anónima", &["accionistas"], 15000.0, 25000.0),
                entry(
                    "Constitución de Sociedad de Responsabilidad Limitada",
                    &["socios"],
                    12000.0,
                    20000.0,
                ),
                entry("Registro de Marca", &["impi", "propiedad industrial"], 8000.0, 15000.0),
                entry("Contrato de Arrendamiento", &["renta", "inmueble"], 3000.0, 6000.0),
                entry("Contrato de Compraventa", &[], 4000.0, 8000.0),
                entry("Testamento", &["sucesión"], 3000.0, 7000.0),
                entry("Poder Notarial", &["apoderado"], 2000.0, 5000.0),
                entry("Divorcio Voluntario", &["mutuo consentimiento"], 15000.0, 30000.0),
                entry("Acta de Asamblea", &["protocolización"], 5000.0, 10000.0),
            ],
            catalog_min_overlap: 0.5,
            flat_fee_terms: terms(&[
                "constitución",
                "registro",
                "contrato",
                "testamento",
                "poder",
                "acta",
                "trámite",
                "escritura",
                "paquete",
            ]),
            hourly_terms: terms(&[
                "litigio",
                "juicio",
                "demanda",
                "asesoría",
                "consultoría",
                "representación",
                "negociación",
                "arbitraje",
                "auditoría",
                "iguala",
            ]),
            tier_hours: TierHours {
                low: HourRange::new(2.0, 5.0),
                medium: HourRange::new(5.0, 15.0),
                high: HourRange::new(15.0, 40.0),
            },
            complexity: ComplexityThresholds {
                medium_details_chars: 200,
                long_details_chars: 600,
                some_inclusions: 3,
                many_inclusions: 6,
                complexity_terms: terms(&[
                    "litigio",
                    "amparo",
                    "apelación",
                    "internacional",
                    "fusión",
                    "adquisición",
                    "due diligence",
                    "arbitraje",
                    "urgente",
                    "múltiples",
                    "controversia",
                ]),
                simplicity_terms: terms(&["simple", "sencillo", "básico", "estándar", "formato"]),
                low_max_score: 0,
                high_min_score: 3,
            },
            confidence: ConfidenceWeights {
                base: 0.25,
                step: 0.25,
            },
        }
    }
}

impl PricingPolicy {
    /// Loads the policy from a JSON file when a path is given, otherwise the defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let policy = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read pricing policy '{path}'"))?;
                let policy: PricingPolicy = serde_json::from_str(&raw)
                    .with_context(|| format!("Pricing policy '{path}' is not valid JSON"))?;
                info!("Pricing policy loaded from {path}");
                policy
            }
            None => {
                info!("Using built-in pricing policy");
                PricingPolicy::default()
            }
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Rejects tables that would let the calculator break its range invariants.
    pub fn validate(&self) -> Result<()> {
        if !(self.default_hourly_rate.is_finite() && self.default_hourly_rate > 0.0) {
            bail!("default_hourly_rate must be a positive number");
        }
        for (tier, hours) in [
            ("low", self.tier_hours.low),
            ("medium", self.tier_hours.medium),
            ("high", self.tier_hours.high),
        ] {
            if !hours.is_valid() {
                bail!("tier_hours.{tier} must satisfy 0 < minimo <= maximo");
            }
        }
        for entry in &self.flat_fee_catalog {
            let ordered = entry.minimum > 0.0 && entry.minimum <= entry.maximum;
            if !(entry.minimum.is_finite() && entry.maximum.is_finite() && ordered) {
                bail!("catalog entry '{}' must satisfy 0 < minimo <= maximo", entry.name);
            }
        }
        if !(0.0..=1.0).contains(&self.catalog_min_overlap) {
            bail!("catalog_min_overlap must be within [0, 1]");
        }
        let weights = &self.confidence;
        if !(0.0..=1.0).contains(&weights.base) {
            bail!("confidence.base must be within [0, 1]");
        }
        // Fallbacks must never raise confidence.
        if !(weights.step.is_finite() && weights.step >= 0.0) {
            bail!("confidence.step must be a non-negative number");
        }
        if self.complexity.low_max_score >= self.complexity.high_min_score {
            bail!("complexity.low_max_score must be below complexity.high_min_score");
        }
        Ok(())
    }
}
