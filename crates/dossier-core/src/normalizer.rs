//! Dossier Normalizer: model content string in, CanonicalDossier out. Total by construction.

use crate::dossier::CanonicalDossier;
use serde_json::{Map, Value};

/// Tag written into every normalized record.
pub const SOURCE_TAG: &str = "chatgpt-only";

/// Parses `raw` as JSON and flattens it. Unparseable input is logged and treated as `{}`.
pub fn normalize(raw: &str) -> CanonicalDossier {
    let parsed = match serde_json::from_str::<Value>(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, raw = %raw, "model content is not JSON; normalizing as empty object");
            Value::Object(Map::new())
        }
    };
    flatten(&parsed)
}

/// Flattens an already parsed reply.
pub fn flatten(parsed: &Value) -> CanonicalDossier {
    CanonicalDossier::from_nested(parsed, SOURCE_TAG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FIELDS;
    use serde_json::json;

    fn assert_complete(dossier: &CanonicalDossier) {
        let value = serde_json::to_value(dossier).unwrap();
        let obj = value.as_object().unwrap();
        for f in FIELDS {
            let v = obj.get(f.key).unwrap_or_else(|| panic!("missing {}", f.key));
            assert!(v.is_null() || v.is_string(), "{} = {}", f.key, v);
        }
        assert_eq!(obj["source"], json!(SOURCE_TAG));
    }

    #[test]
    fn partial_reply_fills_the_rest_with_null() {
        let dossier = normalize(r#"{"companyProfile":{"companyName":"Acme"}}"#);
        assert_complete(&dossier);
        assert_eq!(dossier.text("companyName"), Some("Acme"));
        let populated = dossier.iter().filter(|(_, v)| !v.is_null()).count();
        assert_eq!(populated, 1);
        assert_eq!(dossier.source(), Some("chatgpt-only"));
    }

    #[test]
    fn any_input_yields_the_full_shape() {
        for raw in ["", "I cannot determine this.", "{", "[]", "null", "42", "{}"] {
            let dossier = normalize(raw);
            assert_complete(&dossier);
            assert!(dossier.is_blank(), "input {:?}", raw);
        }
    }

    #[test]
    fn values_pass_through_without_trimming() {
        let dossier = normalize(
            r#"{"fundingAndEcosystem":{"fundingStage":"  Series A ","investors":""},
                "securityAndCompliance":{"complianceCertifications":"SOC 2, ISO 27001"}}"#,
        );
        assert_eq!(dossier.text("fundingStage"), Some("  Series A "));
        assert_eq!(dossier.text("investors"), Some(""));
        assert_eq!(dossier.text("complianceCertifications"), Some("SOC 2, ISO 27001"));
    }

    #[test]
    fn full_reply_maps_every_section() {
        let mut nested = Map::new();
        for f in FIELDS {
            let section = nested
                .entry(f.section)
                .or_insert_with(|| Value::Object(Map::new()));
            section
                .as_object_mut()
                .unwrap()
                .insert(f.key.to_string(), json!(format!("v-{}", f.key)));
        }
        let dossier = flatten(&Value::Object(nested));
        for (key, value) in dossier.iter() {
            assert_eq!(value, &json!(format!("v-{}", key)));
        }
    }
}
