//! Dossier Renderer: display slots with fallback labels, the funding badge, and JSON export.
//!
//! A value is fallback-equivalent when it is `null`, missing, or a string that is empty after
//! trimming. Non-blank strings are shown verbatim; other JSON values are shown as compact JSON.

use crate::dossier::CanonicalDossier;
use crate::normalizer::SOURCE_TAG;
use crate::schema::SOURCE_KEY;
use serde_json::Value;
use std::fmt;

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN_COMPANY: &str = "(Unknown company)";
pub const PLACEHOLDER_DASH: &str = "—";

/// One display slot: which record key feeds it, its caption, and its default label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub key: &'static str,
    pub caption: &'static str,
    pub fallback: &'static str,
}

const fn slot(key: &'static str, caption: &'static str) -> Slot {
    Slot {
        key,
        caption,
        fallback: NOT_AVAILABLE,
    }
}

/// Slots in popup order.
pub const SLOTS: &[Slot] = &[
    Slot {
        key: "companyName",
        caption: "Company",
        fallback: UNKNOWN_COMPANY,
    },
    slot("foundedYear", "Founded"),
    slot("hqLocation", "HQ"),
    slot("fundingStage", "Funding stage"),
    slot("fundingAmount", "Funding amount"),
    Slot {
        key: SOURCE_KEY,
        caption: "Source",
        fallback: SOURCE_TAG,
    },
    slot("investors", "Investors"),
    slot("acceleratorsOrPrograms", "Accelerators / programs"),
    slot("coreTechnology", "Core technology"),
    slot("technicalDifferentiation", "Technical differentiation"),
    slot("patentsOrProprietaryIP", "Patents / proprietary IP"),
    slot("founderBackground", "Founder background"),
    slot("priorDomainExperience", "Prior domain experience"),
    slot("previousExitsOrNotableCompanies", "Previous exits / notable companies"),
    slot("currentEnterpriseClients", "Enterprise clients"),
    slot("industryPartnerships", "Industry partnerships"),
    slot("commercializationStage", "Commercialization stage"),
    slot("enterpriseAvailability", "Enterprise availability"),
    slot("securityProtocols", "Security protocols"),
    slot("complianceCertifications", "Compliance certifications"),
];

/// Text for a value, or `fallback` when the value is fallback-equivalent.
pub fn display_or(value: Option<&Value>, fallback: &str) -> String {
    match value {
        None | Some(Value::Null) => fallback.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => fallback.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Muted,
    Stage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingBadge {
    pub text: String,
    pub tone: BadgeTone,
}

/// Funding badge for a stage value. Blank, `"—"` and `"N/A"` collapse to the muted state,
/// as do `false` and numeric zero.
pub fn funding_badge(stage: Option<&Value>) -> FundingBadge {
    let shown = match stage {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(other) => Some(other.to_string()),
    };
    match shown {
        Some(s) if !s.is_empty() && s != PLACEHOLDER_DASH && s != NOT_AVAILABLE => FundingBadge {
            text: format!("Stage: {}", s),
            tone: BadgeTone::Stage,
        },
        _ => FundingBadge {
            text: format!("Stage: {}", PLACEHOLDER_DASH),
            tone: BadgeTone::Muted,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSlot {
    pub slot: Slot,
    pub text: String,
}

/// What the popup shows for one record (or for none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub slots: Vec<RenderedSlot>,
    pub badge: FundingBadge,
}

impl RenderedView {
    pub fn text(&self, key: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|s| s.slot.key == key)
            .map(|s| s.text.as_str())
    }
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = SLOTS.iter().map(|s| s.caption.len()).max().unwrap_or(0);
        writeln!(f, "[{}]", self.badge.text)?;
        for s in &self.slots {
            writeln!(f, "{:<width$}  {}", s.slot.caption, s.text, width = width)?;
        }
        Ok(())
    }
}

/// Projects a record onto the display slots. `None` (before any fetch) renders every default.
pub fn render(dossier: Option<&CanonicalDossier>) -> RenderedView {
    let slots = SLOTS
        .iter()
        .map(|slot| {
            let text = if slot.key == SOURCE_KEY {
                let source = dossier.and_then(|d| d.source()).map(|s| Value::String(s.to_string()));
                display_or(source.as_ref(), slot.fallback)
            } else {
                display_or(dossier.and_then(|d| d.get(slot.key)), slot.fallback)
            };
            RenderedSlot { slot: *slot, text }
        })
        .collect();
    RenderedView {
        slots,
        badge: funding_badge(dossier.and_then(|d| d.get("fundingStage"))),
    }
}

/// Human-readable JSON of the record itself, not of the rendered view.
pub fn export_json(dossier: &CanonicalDossier) -> serde_json::Result<String> {
    serde_json::to_string_pretty(dossier)
}
