use super::decision::DecisionPoint;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A project template: the authored phase graph that runs are instantiated from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phases: Vec<Phase>,
}

/// A concrete run of a project, carrying the resolved plan and the user's selections.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRun {
    pub id: String,
    pub template_id: String,
    pub name: String,
    #[serde(default)]
    pub phases: Vec<Phase>,
    /// Decision-point and alternate-group selections, keyed by step id or group key.
    #[serde(default)]
    pub answers: AHashMap<String, String>,
    /// Selected optional work, keyed by phase id.
    #[serde(default)]
    pub if_necessary_work: AHashMap<String, Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub operations: Vec<Operation>,
    /// Marks one of the four canonical phases.
    #[serde(default)]
    pub is_standard: bool,
    /// Incorporated by reference from another published project.
    #[serde(default)]
    pub is_linked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorporated_revision: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
    #[serde(default)]
    pub is_standard: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: String,
    pub step: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_decision_point: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_point: Option<DecisionPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_step_id: Option<String>,
    #[serde(default)]
    pub is_standard: bool,
}

impl Phase {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_operations(mut self, operations: Vec<Operation>) -> Self {
        self.operations = operations;
        self
    }

    pub fn standard(mut self) -> Self {
        self.is_standard = true;
        self
    }

    /// Marks the phase as incorporated from another project.
    pub fn linked_from(
        mut self,
        project_id: impl Into<String>,
        project_name: impl Into<String>,
        revision: u32,
    ) -> Self {
        self.is_linked = true;
        self.source_project_id = Some(project_id.into());
        self.source_project_name = Some(project_name.into());
        self.incorporated_revision = Some(revision);
        self
    }
}

impl Operation {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_steps(mut self, steps: Vec<WorkflowStep>) -> Self {
        self.steps = steps;
        self
    }
}

impl WorkflowStep {
    pub fn new(id: impl Into<String>, step: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            step: step.into(),
            ..Default::default()
        }
    }

    pub fn then(mut self, next_step_id: impl Into<String>) -> Self {
        self.next_step_id = Some(next_step_id.into());
        self
    }

    /// Attaches a decision point and flags the step accordingly.
    pub fn with_decision(mut self, decision: DecisionPoint) -> Self {
        self.is_decision_point = true;
        self.decision_point = Some(decision);
        self
    }

    /// The decision point, if this step is flagged as one and actually carries it.
    pub fn active_decision(&self) -> Option<&DecisionPoint> {
        if self.is_decision_point {
            self.decision_point.as_ref()
        } else {
            None
        }
    }
}
