use serde::Deserialize;
use serde::Serialize;

use crate::rca::RcaResult;
use crate::runbook::RunbookAction;

/// Body of both analysis endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, schemars::JsonSchema)]
pub struct AnalyzeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    pub query: String,
}

impl AnalyzeRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            alert_id: None,
            service_id: None,
            query: query.into(),
        }
    }

    pub fn with_alert_id(mut self, alert_id: Option<String>) -> Self {
        self.alert_id = alert_id;
        self
    }

    pub fn with_service_id(mut self, service_id: Option<String>) -> Self {
        self.service_id = service_id;
        self
    }
}

/// Response of the one-shot `/api/analyze` endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, schemars::JsonSchema)]
pub struct AnalyzeResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// JSON payload of a streamed event record, discriminated by `type`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, schemars::JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisUpdate {
    Status {
        message: String,
    },
    RcaComplete {
        rca: RcaResult,
    },
    RunbookComplete {
        runbooks: Vec<RunbookAction>,
    },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl AnalysisUpdate {
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status {
            message: message.into(),
        }
    }

    /// Serializes the update into its wire record (`data: {...}\n`).
    pub fn to_record(&self) -> serde_json::Result<String> {
        Ok(crate::encode_record(&serde_json::to_string(self)?))
    }
}
