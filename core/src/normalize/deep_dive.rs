//! Deep-dive report assembly.
//!
//! Each topic is taken from an existing narrative section when one exists
//! and otherwise synthesized from the raw fields of the result. Synthesis
//! only restates fields the backend sent.

use srenity_protocol::RcaResult;
use srenity_protocol::TierAnalysis;

use super::Section;
use super::canonical_sections;
use super::inline::strip_inline;
use super::normalize_title;
use super::parse_markdown_sections;

pub const TIER_ANALYSIS: &str = "Tier Analysis";
pub const CROSS_TIER_CORRELATIONS: &str = "Cross-Tier Correlations";
pub const ROOT_CAUSE_ANALYSIS: &str = "Root Cause Analysis";
pub const IMPACT_ASSESSMENT: &str = "Impact Assessment";
pub const REMEDIATION_PLAN: &str = "Remediation Plan";

/// Deep-dive topics in presentation order.
pub const DEEP_DIVE_TOPICS: [&str; 5] = [
    TIER_ANALYSIS,
    CROSS_TIER_CORRELATIONS,
    ROOT_CAUSE_ANALYSIS,
    IMPACT_ASSESSMENT,
    REMEDIATION_PLAN,
];

const NO_CORRELATIONS: &str = "No cross-tier correlations were identified.";

/// Builds the extended report. Topics with nothing to show are omitted.
pub fn deep_dive_sections(rca: &RcaResult) -> Vec<Section> {
    let narrative = rca
        .full_summary
        .as_deref()
        .map(parse_markdown_sections)
        .unwrap_or_default();
    let resolved = canonical_sections(rca);

    DEEP_DIVE_TOPICS
        .iter()
        .filter_map(|topic| {
            let wanted = normalize_title(topic);
            let existing = [&narrative, &resolved].into_iter().find_map(|sections| {
                sections
                    .iter()
                    .find(|s| !s.is_empty() && normalize_title(&s.title) == wanted)
            });
            let section = match existing {
                Some(section) => section.clone(),
                None => synthesize(topic, rca),
            };
            (!section.is_empty()).then_some(section)
        })
        .collect()
}

fn synthesize(topic: &str, rca: &RcaResult) -> Section {
    let mut section = Section::new(topic);
    match topic {
        TIER_ANALYSIS => section.bullets = tier_bullets(rca),
        CROSS_TIER_CORRELATIONS => {
            if rca.evidence.is_empty() {
                section.paragraphs.push(NO_CORRELATIONS.to_string());
            } else {
                section.bullets = clean_all(&rca.evidence);
            }
        }
        ROOT_CAUSE_ANALYSIS => {
            let root_cause = strip_inline(&rca.root_cause);
            if !root_cause.trim().is_empty() {
                section.paragraphs.push(root_cause.trim().to_string());
            }
        }
        IMPACT_ASSESSMENT => {
            section.bullets = rca
                .tier_analysis()
                .iter()
                .filter_map(|tier| {
                    let severity = non_blank(tier.severity.as_deref())?;
                    Some(strip_inline(&format!("{}: {severity}", tier.title)))
                })
                .collect();
        }
        REMEDIATION_PLAN => section.bullets = clean_all(&rca.recommendations),
        _ => {}
    }
    section
}

fn tier_bullets(rca: &RcaResult) -> Vec<String> {
    let tiers = rca.tier_analysis();
    if tiers.is_empty() {
        return rca
            .layer_results()
            .iter()
            .filter_map(|(label, text)| {
                let text = non_blank(*text)?;
                Some(format!("{label}: {}", strip_inline(text)))
            })
            .collect();
    }
    tiers.iter().flat_map(tier_lines).collect()
}

fn tier_lines(tier: &TierAnalysis) -> Vec<String> {
    let qualifiers: Vec<&str> = [tier.severity.as_deref(), tier.status.as_deref()]
        .into_iter()
        .filter_map(non_blank)
        .collect();
    let mut headline = tier.title.clone();
    if !qualifiers.is_empty() {
        headline = format!("{headline} ({})", qualifiers.join(" / "));
    }
    if let Some(summary) = non_blank(tier.summary.as_deref()) {
        headline = format!("{headline}: {summary}");
    }

    std::iter::once(headline)
        .chain(
            tier.details
                .iter()
                .filter(|d| !d.trim().is_empty())
                .map(|detail| format!("{}: {}", tier.title, detail.trim())),
        )
        .map(|line| strip_inline(&line))
        .collect()
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn clean_all(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| strip_inline(item).trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
