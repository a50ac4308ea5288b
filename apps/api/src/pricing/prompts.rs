// LLM prompt templates for the pricing pipeline.
// System prompt comes from llm_client::prompts::JSON_ONLY_SYSTEM.

/// Fills `{name}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so user text containing
/// "{details}" stays literal. Braces that name no placeholder are kept.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = values.iter().find(|(key, _)| {
            tail[1..]
                .strip_prefix(key)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Pricing-model classification prompt.
/// Replace: {service_name}, {description}
pub const MODEL_CLASSIFICATION_PROMPT: &str = r#"Clasifica el modelo de cobro más adecuado para el siguiente servicio legal.

SERVICIO: {service_name}
DESCRIPCIÓN: {description}

Responde con un objeto JSON con este esquema EXACTO (sin campos adicionales):
{"modeloCobro": "FLAT_FEE"}

Valores permitidos para "modeloCobro" (elige exactamente uno):
- "FLAT_FEE": trámite acotado y repetible con un precio de mercado conocido
- "HOURLY": trabajo abierto cuya duración depende del caso (litigio, asesoría continua)
- "MIXTO": una parte acotada más trabajo variable adicional"#;

/// Complexity estimation prompt.
/// Replace: {service_name}, {description}, {details}, {estimated_time}, {inclusions}
pub const COMPLEXITY_ESTIMATION_PROMPT: &str = r#"Estima la complejidad del siguiente servicio legal.

SERVICIO: {service_name}
DESCRIPCIÓN: {description}
DETALLES: {details}
TIEMPO ESTIMADO POR EL ABOGADO: {estimated_time}
INCLUYE:
{inclusions}

Responde con un objeto JSON con este esquema EXACTO (sin campos adicionales):
{"complejidad": "medio"}

Valores permitidos para "complejidad" (elige exactamente uno): "bajo", "medio", "alto"."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_keeps_json_braces() {
        let prompt = fill_template(
            MODEL_CLASSIFICATION_PROMPT,
            &[("service_name", "Testamento"), ("description", "Testamento público")],
        );
        assert!(prompt.contains("SERVICIO: Testamento\n"));
        assert!(prompt.contains(r#"{"modeloCobro": "FLAT_FEE"}"#));
        assert!(!prompt.contains("{service_name}"));
    }

    #[test]
    fn test_fill_template_does_not_expand_user_text() {
        let prompt = fill_template(
            "{description} / {details}",
            &[("description", "ver {details}"), ("details", "SECRETO")],
        );
        assert_eq!(prompt, "ver {details} / SECRETO");
    }

    #[test]
    fn test_fill_template_unknown_and_unclosed_braces() {
        assert_eq!(fill_template("{otro} {a", &[("a", "x")]), "{otro} {a");
    }
}
