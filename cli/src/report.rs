//! Plain-text rendering of analysis results.

use std::fmt::Write;

use srenity_core::normalize::Section;
use srenity_core::normalize::canonical_sections;
use srenity_core::normalize::deep_dive_sections;
use srenity_core::normalize::strip_inline;
use srenity_core::normalize::summary_cards;
use srenity_core::progress::StepState;
use srenity_core::progress::Timeline;
use srenity_protocol::RcaResult;
use srenity_protocol::RunbookAction;

pub fn format_section(section: &Section) -> String {
    let mut out = format!("## {}\n", section.title);
    for paragraph in &section.paragraphs {
        let _ = writeln!(out, "{paragraph}");
    }
    for bullet in &section.bullets {
        let _ = writeln!(out, "  • {bullet}");
    }
    for (index, item) in section.numbered.iter().enumerate() {
        let _ = writeln!(out, "  {}. {item}", index + 1);
    }
    out
}

pub fn format_timeline(timeline: &Timeline) -> String {
    timeline
        .steps
        .iter()
        .map(|step| {
            let mark = match step.state {
                StepState::Complete => "✓",
                StepState::Active => "…",
                StepState::Pending => " ",
            };
            format!("[{mark}] {}\n", step.label)
        })
        .collect()
}

pub fn format_runbooks(runbooks: &[RunbookAction]) -> String {
    let mut out = String::new();
    for (index, runbook) in runbooks.iter().enumerate() {
        let _ = write!(out, "{}. {}", index + 1, runbook.action_title);
        if let Some(percent) = runbook.relevance_percent() {
            let _ = write!(out, " ({percent}% relevant)");
        }
        out.push('\n');
        for (n, step) in runbook.steps.iter().enumerate() {
            let _ = writeln!(out, "   {}. {step}", n + 1);
        }
        if !runbook.source_document.is_empty() {
            let _ = write!(out, "   Source: {}", runbook.source_document);
            if runbook.has_link() {
                let _ = write!(out, " <{}>", runbook.source_url.trim());
            }
            out.push('\n');
        }
    }
    out
}

/// Summary cards, falling back to the raw root cause text, then the
/// deep-dive report when requested.
pub fn format_rca(rca: &RcaResult, deep_dive: bool) -> String {
    let mut out = String::new();
    let sections = canonical_sections(rca);
    let cards = summary_cards(&sections);

    if cards.is_empty() {
        let _ = writeln!(out, "Root cause: {}", strip_inline(&rca.root_cause).trim());
        if let Some(summary) = rca.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            let _ = writeln!(out, "\n{}", strip_inline(summary).trim());
        }
    } else {
        for card in &cards {
            out.push_str(&format_section(card));
            out.push('\n');
        }
    }

    if deep_dive {
        let sections = deep_dive_sections(rca);
        if !sections.is_empty() {
            out.push_str("\n# Deep Dive\n\n");
            for section in &sections {
                out.push_str(&format_section(section));
                out.push('\n');
            }
        }
    }
    out
}
