//! Nested dossier schema and its flat projection.
//!
//! The model answers with seven sections of named fields. Every field has exactly one flat key
//! in [`CanonicalDossier`](crate::CanonicalDossier); the flat key is the nested field name.
//! Both the prompt and the normalizer read this table, so the schema the model is asked for and
//! the schema that is flattened cannot drift apart.

use serde_json::Value;

/// Sections in the order the prompt presents them.
pub const SECTIONS: &[&str] = &[
    "companyProfile",
    "technologyPOV",
    "founderPOV",
    "tractionAndCredibility",
    "fundingAndEcosystem",
    "commercialReadiness",
    "securityAndCompliance",
];

/// One flat field and the nested path it is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath {
    pub key: &'static str,
    pub section: &'static str,
}

const fn field(section: &'static str, key: &'static str) -> FieldPath {
    FieldPath { key, section }
}

/// Flat fields in canonical (serialized) order.
pub const FIELDS: &[FieldPath] = &[
    // Company profile
    field("companyProfile", "companyName"),
    field("companyProfile", "foundedYear"),
    field("companyProfile", "hqLocation"),
    // Funding & ecosystem
    field("fundingAndEcosystem", "fundingStage"),
    field("fundingAndEcosystem", "fundingAmount"),
    field("fundingAndEcosystem", "investors"),
    field("fundingAndEcosystem", "acceleratorsOrPrograms"),
    // Technology
    field("technologyPOV", "coreTechnology"),
    field("technologyPOV", "technicalDifferentiation"),
    field("technologyPOV", "patentsOrProprietaryIP"),
    // Founders
    field("founderPOV", "founderBackground"),
    field("founderPOV", "priorDomainExperience"),
    field("founderPOV", "previousExitsOrNotableCompanies"),
    // Traction & credibility
    field("tractionAndCredibility", "currentEnterpriseClients"),
    field("tractionAndCredibility", "industryPartnerships"),
    // Commercial readiness
    field("commercialReadiness", "commercializationStage"),
    field("commercialReadiness", "enterpriseAvailability"),
    // Security & compliance
    field("securityAndCompliance", "securityProtocols"),
    field("securityAndCompliance", "complianceCertifications"),
];

/// Metadata key appended after the schema fields.
pub const SOURCE_KEY: &str = "source";

/// Fields of one section, in table order.
pub fn section_fields(section: &str) -> impl Iterator<Item = &'static FieldPath> + '_ {
    FIELDS.iter().filter(move |f| f.section == section)
}

/// Position of a flat key in [`FIELDS`].
pub fn index_of(key: &str) -> Option<usize> {
    FIELDS.iter().position(|f| f.key == key)
}

/// Total lookup: a missing section, a section that is not an object, or a missing field all
/// resolve to `null`. Present values are returned as-is.
pub fn lookup(root: &Value, path: &FieldPath) -> Value {
    root.get(path.section)
        .and_then(|section| section.get(path.key))
        .cloned()
        .unwrap_or(Value::Null)
}
