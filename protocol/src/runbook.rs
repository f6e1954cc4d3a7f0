use serde::Deserialize;
use serde::Serialize;

/// A remediation action extracted from a runbook document.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, schemars::JsonSchema)]
pub struct RunbookAction {
    pub action_title: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub source_document: String,
    #[serde(default)]
    pub source_url: String,
    /// Retriever relevance in `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

impl RunbookAction {
    /// Relevance as a whole percentage, e.g. `0.874` → `87`.
    pub fn relevance_percent(&self) -> Option<u8> {
        let score = self.relevance_score.filter(|s| s.is_finite())?;
        Some((score * 100.0).round().clamp(0.0, 100.0) as u8)
    }

    pub fn has_link(&self) -> bool {
        !self.source_url.trim().is_empty()
    }
}
