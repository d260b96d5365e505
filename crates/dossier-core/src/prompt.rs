//! Dossier Prompt Builder: one deterministic instruction string per domain.

use crate::domain::DomainString;
use crate::schema::{section_fields, SECTIONS};

const PERSONA: &str = "You are an investment-grade technology research assistant evaluating startups and technology companies from the perspective of enterprise buyers, corporate innovation teams, and early-stage investors.

Your objective is to produce a defensible point of view (POV) on the company’s technology, credibility, and readiness for enterprise commercialization — not marketing language.";

/// Closed vocabulary for `commercializationStage`.
pub const COMMERCIALIZATION_STAGES: &[&str] = &[
    "Research / Prototype",
    "Pilot-ready",
    "Revenue-generating",
    "Enterprise-scale",
];

const EVALUATION_GUIDELINES: &[&str] = &[
    "Assess whether the technology is meaningfully differentiated or primarily positioning.",
    "Explicitly identify patents, proprietary algorithms, datasets, trade secrets, or defensible IP if mentioned.",
    "Evaluate founder credibility based on prior experience in the same domain, deep technical expertise, or successful startup exits.",
    "Prioritize enterprise validation: named customers, pilots, Fortune-500 usage, or adoption in regulated industries.",
];

const SECURITY_GUIDELINE: &str = "For software or digital products, assess security maturity (e.g., SOC 2, ISO 27001, HIPAA, GDPR, encryption standards, access controls).";

const SOURCES: &[&str] = &[
    "Company website",
    "Press releases",
    "Crunchbase",
    "PitchBook",
    "Accelerator or investor websites",
];

/// Builds the user prompt for `domain`. Pure: the same domain always yields the same bytes.
pub fn build_prompt(domain: &DomainString) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(PERSONA);
    out.push_str("\n\nFor the company whose website domain is:\n\"");
    out.push_str(domain.as_str());
    out.push_str("\"\n\nReturn ONLY a single valid JSON object with the exact structure below.\n\n");
    out.push_str(&schema_skeleton());

    out.push_str("\n\nPOV AND EVALUATION GUIDELINES:\n");
    for line in EVALUATION_GUIDELINES {
        push_bullet(&mut out, line, 0);
    }
    push_bullet(
        &mut out,
        "Judge commercialization maturity using one of the following if possible:",
        0,
    );
    for stage in COMMERCIALIZATION_STAGES {
        push_bullet(&mut out, stage, 1);
    }
    push_bullet(&mut out, SECURITY_GUIDELINE, 0);

    out.push_str("\nRESEARCH RULES (STRICT):\n");
    push_bullet(&mut out, "Do NOT guess or infer.", 0);
    push_bullet(
        &mut out,
        "If information cannot be verified with reasonable confidence, use null.",
        0,
    );
    push_bullet(&mut out, "Use public and reputable sources only:", 0);
    for source in SOURCES {
        push_bullet(&mut out, source, 1);
    }
    push_bullet(
        &mut out,
        "Do a web query to determine funding stage and funding amount.",
        0,
    );
    push_bullet(
        &mut out,
        "Only use \"Public\" as a fundingStage if the company is actively listed on a stock exchange.",
        0,
    );
    push_bullet(
        &mut out,
        "Do NOT add commentary, explanations, markdown, or extra fields.",
        0,
    );
    push_bullet(&mut out, "Output must be valid JSON and nothing else.", 0);
    out
}

fn push_bullet(out: &mut String, text: &str, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str("- ");
    out.push_str(text);
    out.push('\n');
}

/// The nested schema with every leaf set to `null`, two-space indented.
fn schema_skeleton() -> String {
    let sections: Vec<String> = SECTIONS
        .iter()
        .map(|section| {
            let fields: Vec<String> = section_fields(section)
                .map(|f| format!("    \"{}\": null", f.key))
                .collect();
            format!("  \"{}\": {{\n{}\n  }}", section, fields.join(",\n"))
        })
        .collect();
    format!("{{\n{}\n}}", sections.join(",\n"))
}
