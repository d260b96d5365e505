//! CanonicalDossier: the flat, fixed-shape record the relay returns and the popup renders.

use crate::schema::{self, FIELDS, SOURCE_KEY};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Flat dossier. Holds one value per entry of [`schema::FIELDS`] plus the `source` tag.
/// Values are normally strings or `null`, but whatever the model sent is kept untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalDossier {
    values: Vec<Value>,
    source: Option<String>,
}

impl CanonicalDossier {
    /// Flattens a parsed model reply. Never fails; absent paths become `null`.
    pub fn from_nested(root: &Value, source: &str) -> Self {
        Self {
            values: FIELDS.iter().map(|path| schema::lookup(root, path)).collect(),
            source: Some(source.to_string()),
        }
    }

    /// A record with every field `null` and no source.
    pub fn empty() -> Self {
        Self {
            values: vec![Value::Null; FIELDS.len()],
            source: None,
        }
    }

    /// Value of a flat key. `None` only for keys outside the schema.
    pub fn get(&self, key: &str) -> Option<&Value> {
        schema::index_of(key).map(|i| &self.values[i])
    }

    /// String value of a flat key, if it holds one.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Replaces a schema field. Returns `false` for keys outside the schema.
    pub fn set(&mut self, key: &str, value: Value) -> bool {
        match schema::index_of(key) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Schema fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        FIELDS.iter().map(|f| f.key).zip(self.values.iter())
    }

    /// True when no schema field carries a value.
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(Value::is_null)
    }
}

impl Serialize for CanonicalDossier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELDS.len() + 1))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(SOURCE_KEY, &self.source)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for CanonicalDossier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut flat = Map::<String, Value>::deserialize(deserializer)?;
        let values = FIELDS
            .iter()
            .map(|f| flat.remove(f.key).unwrap_or(Value::Null))
            .collect();
        let source = match flat.remove(SOURCE_KEY) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        Ok(Self { values, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_every_key_in_canonical_order() {
        let dossier = CanonicalDossier::from_nested(&json!({}), "chatgpt-only");
        let text = serde_json::to_string(&dossier).unwrap();
        let first = text.find("\"companyName\"").unwrap();
        let funding = text.find("\"fundingStage\"").unwrap();
        let tech = text.find("\"coreTechnology\"").unwrap();
        let source = text.find("\"source\"").unwrap();
        assert!(first < funding && funding < tech && tech < source);

        let back: Value = serde_json::from_str(&text).unwrap();
        let obj = back.as_object().unwrap();
        assert_eq!(obj.len(), 20);
        assert_eq!(obj["source"], json!("chatgpt-only"));
    }

    #[test]
    fn get_and_set_stay_inside_the_schema() {
        let mut dossier = CanonicalDossier::empty();
        assert!(dossier.set("hqLocation", json!("Berlin")));
        assert!(!dossier.set("ceoName", json!("x")));
        assert_eq!(dossier.text("hqLocation"), Some("Berlin"));
        assert_eq!(dossier.get("ceoName"), None);
        assert!(!dossier.is_blank());
    }

    #[test]
    fn deserialize_tolerates_missing_keys_and_ignores_extras() {
        let dossier: CanonicalDossier =
            serde_json::from_value(json!({"companyName": "Acme", "extra": 1})).unwrap();
        assert_eq!(dossier.text("companyName"), Some("Acme"));
        assert_eq!(dossier.get("fundingStage"), Some(&Value::Null));
        assert_eq!(dossier.source(), None);
    }
}
