//! Line classification shared by the structured and markdown parsers.

use lazy_static::lazy_static;
use regex_lite::Regex;
use srenity_protocol::SummarySection;

use super::Section;
use super::inline::strip_inline;

const BULLET_MARKERS: [&str; 3] = ["- ", "* ", "• "];

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern compiles")
}

lazy_static! {
    static ref ORDINAL: Regex = compile(r"^\d+[.)]\s+(.*)$");
    static ref HEADING: Regex = compile(r"^#{1,6}\s+(.*)$");
}

#[derive(Debug, PartialEq, Eq)]
enum Line {
    Blank,
    Separator,
    Bullet(String),
    Numbered(String),
    Text(String),
}

fn classify(raw: &str) -> Line {
    let stripped = strip_inline(raw);
    let line = stripped.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if line.len() >= 3 && line.chars().all(|c| c == '-') {
        return Line::Separator;
    }
    if let Some(item) = BULLET_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
    {
        return Line::Bullet(item.trim().to_string());
    }
    if let Some(caps) = ORDINAL.captures(line) {
        let item = caps.get(1).map_or("", |m| m.as_str());
        return Line::Numbered(item.trim().to_string());
    }
    Line::Text(line.to_string())
}

fn heading(raw: &str) -> Option<String> {
    let caps = HEADING.captures(raw.trim())?;
    let title = caps.get(1).map_or("", |m| m.as_str());
    Some(strip_inline(title.trim_end_matches('#')).trim().to_string())
}

/// Parses pre-split sections. Every plain line is its own paragraph.
pub fn parse_summary_sections(sections: &[SummarySection]) -> Vec<Section> {
    sections
        .iter()
        .map(|entry| {
            let mut section = Section::new(strip_inline(&entry.title).trim());
            for line in entry.content.lines() {
                match classify(line) {
                    Line::Blank | Line::Separator => {}
                    Line::Bullet(item) => section.bullets.push(item),
                    Line::Numbered(item) => section.numbered.push(item),
                    Line::Text(text) => section.paragraphs.push(text),
                }
            }
            section
        })
        .filter(|section| !section.is_empty())
        .collect()
}

/// Collects content lines under the current heading.
struct SectionBuilder {
    section: Section,
    paragraph: Vec<String>,
}

impl SectionBuilder {
    fn new(title: String) -> Self {
        Self {
            section: Section::new(title),
            paragraph: Vec::new(),
        }
    }

    fn push(&mut self, line: Line) {
        match line {
            Line::Text(text) => self.paragraph.push(text),
            Line::Blank | Line::Separator => self.end_paragraph(),
            Line::Bullet(item) => {
                self.end_paragraph();
                self.section.bullets.push(item);
            }
            Line::Numbered(item) => {
                self.end_paragraph();
                self.section.numbered.push(item);
            }
        }
    }

    fn end_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            self.section.paragraphs.push(self.paragraph.join(" "));
            self.paragraph.clear();
        }
    }

    fn finish(mut self) -> Section {
        self.end_paragraph();
        self.section
    }
}

/// Splits `#`-headed text into sections. Text before the first heading
/// belongs to no section; sections without content are dropped.
pub fn parse_markdown_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<SectionBuilder> = None;

    for line in text.lines() {
        if let Some(title) = heading(line) {
            if let Some(done) = current.take() {
                sections.push(done.finish());
            }
            current = Some(SectionBuilder::new(title));
        } else if let Some(builder) = current.as_mut() {
            builder.push(classify(line));
        }
    }
    if let Some(done) = current {
        sections.push(done.finish());
    }

    sections.retain(|section| !section.is_empty());
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_lines() {
        assert_eq!(classify("  "), Line::Blank);
        assert_eq!(classify("-----"), Line::Separator);
        assert_eq!(classify("- cause A"), Line::Bullet("cause A".to_string()));
        assert_eq!(classify("* cause B"), Line::Bullet("cause B".to_string()));
        assert_eq!(classify("• cause C"), Line::Bullet("cause C".to_string()));
        assert_eq!(classify("12. step"), Line::Numbered("step".to_string()));
        assert_eq!(classify("3) step"), Line::Numbered("step".to_string()));
        assert_eq!(classify("**Bold** text"), Line::Text("Bold text".to_string()));
        assert_eq!(classify("2024.10 release"), Line::Text("2024.10 release".to_string()));
        assert_eq!(classify("--"), Line::Text("--".to_string()));
    }

    #[test]
    fn structured_section_bullets() {
        let sections = parse_summary_sections(&[SummarySection::new(
            "Root Cause Analysis",
            "- cause A\n- cause B",
        )]);
        assert_eq!(
            sections,
            vec![Section {
                title: "Root Cause Analysis".to_string(),
                paragraphs: vec![],
                bullets: vec!["cause A".to_string(), "cause B".to_string()],
                numbered: vec![],
            }]
        );
    }

    #[test]
    fn structured_section_mixed_content() {
        let sections = parse_summary_sections(&[SummarySection::new(
            "**Remediation**",
            "Scale the pool.\n\n---\n1. Raise max_connections\n2) Restart `api`\nThen watch latency.",
        )]);
        let section = &sections[0];
        assert_eq!(section.title, "Remediation");
        assert_eq!(section.paragraphs, vec!["Scale the pool.", "Then watch latency."]);
        assert_eq!(section.numbered, vec!["Raise max_connections", "Restart api"]);
        assert!(section.bullets.is_empty());
    }

    #[test]
    fn dunder_paths_survive_parsing() {
        let sections = parse_summary_sections(&[SummarySection::new(
            "Root Cause Analysis",
            "- ImportError in app/__init__.py",
        )]);
        assert_eq!(sections[0].bullets, vec!["ImportError in app/__init__.py"]);
    }

    #[test]
    fn empty_structured_sections_are_dropped() {
        let sections = parse_summary_sections(&[
            SummarySection::new("Empty", "\n---\n"),
            SummarySection::new("Kept", "text"),
        ]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Kept");
    }

    #[test]
    fn markdown_headings_split_sections() {
        let text = "Preamble that belongs nowhere\n\
                    # Executive Summary\n\
                    Checkout latency rose\n\
                    after the 14:00 deploy.\n\
                    \n\
                    Error rate stayed flat.\n\
                    ## Root Cause Analysis ##\n\
                    - pool exhaustion\n\
                    1. raise pool size\n\
                    ### Empty\n";
        let sections = parse_markdown_sections(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Executive Summary");
        assert_eq!(
            sections[0].paragraphs,
            vec![
                "Checkout latency rose after the 14:00 deploy.",
                "Error rate stayed flat."
            ]
        );
        assert_eq!(sections[1].title, "Root Cause Analysis");
        assert_eq!(sections[1].bullets, vec!["pool exhaustion"]);
        assert_eq!(sections[1].numbered, vec!["raise pool size"]);
    }

    #[test]
    fn text_without_headings_has_no_sections() {
        assert!(parse_markdown_sections("just a root cause sentence").is_empty());
        assert!(parse_markdown_sections("#hashtag is not a heading").is_empty());
    }
}
