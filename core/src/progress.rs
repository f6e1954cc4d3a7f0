//! Four-step progress timeline derived from a [`SessionState`].

use serde::Serialize;

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Retrieve,
    Analyze,
    Rca,
    Runbooks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Pending,
    Active,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub id: StepId,
    pub label: &'static str,
    pub state: StepState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub steps: Vec<Step>,
    /// Index of the first incomplete step, or the last step once all are done.
    pub active_index: usize,
}

impl Timeline {
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|s| s.state == StepState::Complete)
    }
}

const ANALYZE_MARKERS: [&str; 2] = ["Analyzing", "Pattern"];

pub fn timeline(state: &SessionState) -> Timeline {
    let done = [
        (
            StepId::Retrieve,
            "Retrieving Logs & Metrics",
            !state.status_messages.is_empty(),
        ),
        (
            StepId::Analyze,
            "Analyzing Patterns",
            state
                .status_texts()
                .any(|m| ANALYZE_MARKERS.iter().any(|marker| m.contains(marker))),
        ),
        (StepId::Rca, "RCA Summary", state.rca.is_some()),
        (StepId::Runbooks, "Runbook Search", !state.runbooks.is_empty()),
    ];

    let active_index = done
        .iter()
        .position(|(_, _, complete)| !complete)
        .unwrap_or(done.len() - 1);

    let steps = done
        .into_iter()
        .enumerate()
        .map(|(index, (id, label, complete))| {
            let step_state = if complete {
                StepState::Complete
            } else if index == active_index && state.is_streaming {
                StepState::Active
            } else {
                StepState::Pending
            };
            Step {
                id,
                label,
                state: step_state,
            }
        })
        .collect();

    Timeline {
        steps,
        active_index,
    }
}
