use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The project stage a decision belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionStage {
    Kickoff,
    #[default]
    Planning,
    Execution,
    Completion,
}

impl fmt::Display for DecisionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DecisionStage::Kickoff => "kickoff",
            DecisionStage::Planning => "planning",
            DecisionStage::Execution => "execution",
            DecisionStage::Completion => "completion",
        };
        f.write_str(label)
    }
}

/// The kind of resolution session a caller is running.
///
/// Only affects pending-decision gating and audit stamping, never the resolution itself.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionMode {
    #[default]
    InitialPlan,
    FinalPlan,
    UnplannedWork,
    Replan,
}

impl ResolutionMode {
    /// Whether unanswered decisions prevent finalizing a session in this mode.
    pub fn blocks_on_pending(self) -> bool {
        matches!(self, ResolutionMode::InitialPlan)
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResolutionMode::InitialPlan => "initial-plan",
            ResolutionMode::FinalPlan => "final-plan",
            ResolutionMode::UnplannedWork => "unplanned-work",
            ResolutionMode::Replan => "replan",
        };
        f.write_str(label)
    }
}

/// A step-level question with discrete options, each able to redirect step flow.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DecisionPoint {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub stage: DecisionStage,
    #[serde(default)]
    pub options: Vec<DecisionOption>,

    // Audit trail, written by the resolver and never read for control flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_in_stage: Option<ResolutionMode>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOption {
    pub id: String,
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_step_id: Option<String>,
}

impl DecisionPoint {
    pub fn new(question: impl Into<String>, stage: DecisionStage) -> Self {
        Self {
            question: question.into(),
            stage,
            ..Default::default()
        }
    }

    pub fn with_option(mut self, option: DecisionOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn option_for(&self, value: &str) -> Option<&DecisionOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

impl DecisionOption {
    /// Creates an option whose id and value are both `value`.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            id: value.clone(),
            label: label.into(),
            value,
            next_step_id: None,
            alternate_step_id: None,
        }
    }

    pub fn leading_to(mut self, next_step_id: impl Into<String>) -> Self {
        self.next_step_id = Some(next_step_id.into());
        self
    }

    pub fn or_else(mut self, alternate_step_id: impl Into<String>) -> Self {
        self.alternate_step_id = Some(alternate_step_id.into());
        self
    }
}
