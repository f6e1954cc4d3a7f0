use serde::Deserialize;
use serde::Serialize;

/// Root-cause-analysis payload delivered by an `rca_complete` event.
///
/// Only `root_cause` is required. The backend fills different subsets of the
/// remaining fields depending on which agent produced the result, so absence
/// is meaningful and never an error.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, schemars::JsonSchema)]
pub struct RcaResult {
    pub root_cause: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Markdown-like narrative with `#` headings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_summary: Option<String>,
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_analysis: Option<Vec<TierAnalysis>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_sections: Option<Vec<SummarySection>>,
}

impl RcaResult {
    pub fn new(root_cause: impl Into<String>) -> Self {
        Self {
            root_cause: root_cause.into(),
            ..Default::default()
        }
    }

    /// Per-layer result strings paired with their display labels, in
    /// web → app → db → cache order.
    pub fn layer_results(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("Web Tier", self.web_result.as_deref()),
            ("App Tier", self.app_result.as_deref()),
            ("Database Tier", self.db_result.as_deref()),
            ("Cache Tier", self.cache_result.as_deref()),
        ]
    }

    pub fn tier_analysis(&self) -> &[TierAnalysis] {
        self.tier_analysis.as_deref().unwrap_or_default()
    }

    pub fn summary_sections(&self) -> &[SummarySection] {
        self.summary_sections.as_deref().unwrap_or_default()
    }
}

/// One tier's findings as reported by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, schemars::JsonSchema)]
pub struct TierAnalysis {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

/// Pre-split narrative section; `content` is still line-oriented text.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, schemars::JsonSchema)]
pub struct SummarySection {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl SummarySection {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn minimal_result_only_needs_root_cause() {
        let rca: RcaResult =
            serde_json::from_str(r#"{"root_cause":"pool exhaustion"}"#).expect("decodes");
        assert_eq!(rca, RcaResult::new("pool exhaustion"));
        assert!(rca.tier_analysis().is_empty());
        assert!(rca.summary_sections().is_empty());
    }

    #[test]
    fn missing_root_cause_is_rejected() {
        assert!(serde_json::from_str::<RcaResult>(r#"{"summary":"x"}"#).is_err());
    }

    #[test]
    fn layer_results_keep_fixed_order() {
        let rca = RcaResult {
            db_result: Some("slow queries".to_string()),
            web_result: Some("CPU saturated".to_string()),
            ..RcaResult::new("x")
        };
        let labels: Vec<_> = rca
            .layer_results()
            .iter()
            .filter_map(|(label, text)| text.map(|_| *label))
            .collect();
        assert_eq!(labels, vec!["Web Tier", "Database Tier"]);
    }

    #[test]
    fn schema_names_wire_fields() {
        let schema = schemars::schema_for!(RcaResult);
        let json = serde_json::to_string(&schema).expect("schema serializes");
        for field in ["root_cause", "full_summary", "tier_analysis", "summary_sections"] {
            assert!(json.contains(field), "schema is missing {field}");
        }
    }
}
