//! Range calculator: pure function from the three pipeline inputs to a suggestion.
//!
//! Formulas:
//! - Hourly:  [hours.min * rate, hours.max * rate], average = midpoint
//! - FlatFee: closest reference entry verbatim; LookupMiss → Hourly formula
//! - Mixed:   endpoint-wise mean of the Hourly and FlatFee ranges, average
//!            recomputed as the midpoint of the blended endpoints (not the mean
//!            of the two averages); LookupMiss → Hourly range
//!
//! Confidence = base + step × (inputs resolved with high certainty), clamped to [0, 1].
//! Factors list only decisions actually taken, in pipeline order.

use crate::errors::AppError;
use crate::pricing::catalog::{closest_match, CatalogMatch};
use crate::pricing::policy::PricingPolicy;
use crate::pricing::{
    ComplexityAssessment, ComplexitySource, HourlyRate, ModelSelection, ModelSource,
    PriceRange, PricingModel, PricingSuggestion, RateSource, ServiceDescriptor,
};

pub fn calculate(
    selection: &ModelSelection,
    complexity: &ComplexityAssessment,
    rate: &HourlyRate,
    service: &ServiceDescriptor,
    policy: &PricingPolicy,
) -> Result<PricingSuggestion, AppError> {
    validate_inputs(complexity, rate)?;

    let mut factors = Vec::new();
    factors.push(match &selection.source {
        ModelSource::Catalog { entry, .. } => format!(
            "modelo {} por coincidencia con el catálogo de referencia ({entry})",
            selection.model.label()
        ),
        ModelSource::Classifier => format!(
            "modelo {} sugerido por clasificación automática",
            selection.model.label()
        ),
        ModelSource::Heuristic => format!(
            "clasificación automática no disponible; modelo {} por palabras clave",
            selection.model.label()
        ),
    });

    let hourly = hourly_range(complexity, rate);
    let mut lookup_miss = false;
    let mut uses_hours = true;

    let suggested_range = match selection.model {
        PricingModel::Hourly => hourly,
        PricingModel::FlatFee => match reference_entry(service, policy) {
            Some(found) => {
                uses_hours = false;
                factors.push(format!("tarifa fija de referencia: {}", found.entry.name));
                PriceRange::from_endpoints(found.entry.minimum, found.entry.maximum)
            }
            None => {
                lookup_miss = true;
                factors.push(
                    "sin coincidencia en el catálogo de tarifas fijas; se usó el cálculo por hora"
                        .to_string(),
                );
                hourly
            }
        },
        PricingModel::Mixed => match reference_entry(service, policy) {
            Some(found) => {
                factors.push(format!(
                    "combinación de cálculo por hora y tarifa fija de referencia: {}",
                    found.entry.name
                ));
                blend(&hourly, found.entry.minimum, found.entry.maximum)
            }
            None => {
                lookup_miss = true;
                factors.push(
                    "sin coincidencia en el catálogo de tarifas fijas; solo se usó el cálculo por hora"
                        .to_string(),
                );
                hourly
            }
        },
    };

    ensure_finite(&suggested_range)?;

    if uses_hours {
        factors.push(match complexity.source {
            ComplexitySource::Classifier => format!("complejidad {}", complexity.tier.label()),
            ComplexitySource::Heuristic => format!(
                "complejidad {} estimada por heurística (estimación automática no disponible)",
                complexity.tier.label()
            ),
            ComplexitySource::Default => format!(
                "complejidad {} por defecto (información insuficiente)",
                complexity.tier.label()
            ),
        });
        factors.push(format!(
            "horas estimadas: {}–{}",
            format_number(complexity.hour_range.minimum),
            format_number(complexity.hour_range.maximum)
        ));
        factors.push(match rate.source {
            RateSource::Profile => format!("tarifa horaria del perfil: {}", format_number(rate.amount)),
            RateSource::Default => {
                format!("tarifa por defecto usada: {}", format_number(rate.amount))
            }
        });
    }

    let model_certain = match &selection.source {
        ModelSource::Catalog { exact, .. } => *exact,
        ModelSource::Classifier => !lookup_miss,
        ModelSource::Heuristic => false,
    };
    let certain = [
        model_certain,
        complexity.source == ComplexitySource::Classifier,
        rate.source == RateSource::Profile,
    ]
    .iter()
    .filter(|c| **c)
    .count();
    let confidence = policy.confidence.base + policy.confidence.step * certain as f64;
    let confidence = ((confidence * 100.0).round() / 100.0).clamp(0.0, 1.0);

    let rationale = format!(
        "Se sugiere un cobro {} de {} a {} (promedio {}). Factores: {}.",
        selection.model.label(),
        format_number(suggested_range.minimum),
        format_number(suggested_range.maximum),
        format_number(suggested_range.average),
        factors.join("; ")
    );

    Ok(PricingSuggestion {
        model: selection.model,
        suggested_range,
        complexity: complexity.tier,
        hour_range: complexity.hour_range,
        hourly_rate_used: rate.amount,
        rationale,
        factors,
        confidence,
    })
}

fn validate_inputs(complexity: &ComplexityAssessment, rate: &HourlyRate) -> Result<(), AppError> {
    if !(rate.amount.is_finite() && rate.amount > 0.0) {
        return Err(AppError::InvalidInput(format!(
            "hourly rate must be a positive number, got {}",
            rate.amount
        )));
    }
    if !complexity.hour_range.is_valid() {
        return Err(AppError::InvalidInput(format!(
            "hour range must satisfy 0 < minimo <= maximo, got {}–{}",
            complexity.hour_range.minimum, complexity.hour_range.maximum
        )));
    }
    Ok(())
}

/// Finite inputs can still overflow once multiplied; never serialize `inf` as a price.
fn ensure_finite(range: &PriceRange) -> Result<(), AppError> {
    if [range.minimum, range.average, range.maximum]
        .iter()
        .all(|v| v.is_finite())
    {
        Ok(())
    } else {
        Err(AppError::InvalidInput(
            "suggested range overflowed; hourly rate or hours are too large".to_string(),
        ))
    }
}

fn hourly_range(complexity: &ComplexityAssessment, rate: &HourlyRate) -> PriceRange {
    PriceRange::from_endpoints(
        complexity.hour_range.minimum * rate.amount,
        complexity.hour_range.maximum * rate.amount,
    )
}

/// Service name first, then name plus description as a category hint.
fn reference_entry<'a>(
    service: &ServiceDescriptor,
    policy: &'a PricingPolicy,
) -> Option<CatalogMatch<'a>> {
    closest_match(
        &policy.flat_fee_catalog,
        &service.name,
        policy.catalog_min_overlap,
    )
    .or_else(|| {
        closest_match(
            &policy.flat_fee_catalog,
            &format!("{} {}", service.name, service.description),
            policy.catalog_min_overlap,
        )
    })
}

fn blend(hourly: &PriceRange, flat_min: f64, flat_max: f64) -> PriceRange {
    PriceRange::from_endpoints(
        (hourly.minimum + flat_min) / 2.0,
        (hourly.maximum + flat_max) / 2.0,
    )
}

/// "7500" for whole amounts, "7500.50" otherwise.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
