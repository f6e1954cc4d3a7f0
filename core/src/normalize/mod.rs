//! Turns an [`RcaResult`] into canonical display sections.
//!
//! The backend sends overlapping narrative fields. Resolution order is
//! pre-split `summary_sections`, then `#` headings in `full_summary` (or
//! `summary`), then headings in `root_cause`. Everything here is pure.

mod blocks;
mod deep_dive;
mod inline;

use serde::Serialize;
use srenity_protocol::RcaResult;

pub use blocks::parse_markdown_sections;
pub use blocks::parse_summary_sections;
pub use deep_dive::DEEP_DIVE_TOPICS;
pub use deep_dive::deep_dive_sections;
pub use inline::strip_inline;

/// Titles shown as compact cards, in normalized form.
pub const CARD_TITLES: [&str; 3] = [
    "executive summary",
    "root cause analysis",
    "impact assessment",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub paragraphs: Vec<String>,
    pub bullets: Vec<String>,
    pub numbered: Vec<String>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty() && self.bullets.is_empty() && self.numbered.is_empty()
    }
}

/// Case-folds a title and turns punctuation into word breaks, so
/// `"Root-Cause **Analysis**:"` and `"root cause analysis"` compare equal.
pub fn normalize_title(title: &str) -> String {
    let spaced: String = strip_inline(title)
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    spaced
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The resolved section list. Empty when no source yields a section; the
/// caller then shows `root_cause`/`summary` as plain text.
pub fn canonical_sections(rca: &RcaResult) -> Vec<Section> {
    let structured = parse_summary_sections(rca.summary_sections());
    if !structured.is_empty() {
        return structured;
    }

    let narratives = [rca.full_summary.as_deref(), rca.summary.as_deref()];
    if let Some(sections) = narratives
        .into_iter()
        .flatten()
        .map(parse_markdown_sections)
        .find(|sections| !sections.is_empty())
    {
        return sections;
    }

    parse_markdown_sections(&rca.root_cause)
}

/// Sections whose normalized title is one of [`CARD_TITLES`].
pub fn summary_cards(sections: &[Section]) -> Vec<Section> {
    sections
        .iter()
        .filter(|section| CARD_TITLES.contains(&normalize_title(&section.title).as_str()))
        .cloned()
        .collect()
}
