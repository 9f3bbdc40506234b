use serde::{Deserialize, Serialize};
use std::fmt;

/// How a node participates in branching, optionality or conditional inclusion.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FlowType {
    /// Optional work the user may opt into.
    IfNecessary,
    /// One member of a mutually exclusive choice group.
    Alternate,
    /// Work gated on an if-necessary node being chosen.
    Dependent,
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowType::IfNecessary => f.write_str("if-necessary"),
            FlowType::Alternate => f.write_str("alternate"),
            FlowType::Dependent => f.write_str("dependent"),
        }
    }
}

/// Flow annotation for a single phase, operation or step, stored in a side map by node id.
///
/// The zero value (`flow_type: None`) means the node is ordinary, always-included work.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FlowConfig {
    #[serde(rename = "type", default)]
    pub flow_type: Option<FlowType>,
    #[serde(default)]
    pub decision_prompt: Option<String>,
    #[serde(default)]
    pub alternate_ids: Vec<String>,
    #[serde(default)]
    pub dependent_on: Option<String>,
    #[serde(default)]
    pub predecessor_ids: Vec<String>,
}

impl FlowConfig {
    pub fn is_alternate(&self) -> bool {
        self.flow_type == Some(FlowType::Alternate)
    }

    pub fn is_if_necessary(&self) -> bool {
        self.flow_type == Some(FlowType::IfNecessary)
    }

    pub fn is_dependent(&self) -> bool {
        self.flow_type == Some(FlowType::Dependent)
    }

    /// True when the entry carries no information and can be dropped from the store.
    pub fn is_empty(&self) -> bool {
        *self == FlowConfig::default()
    }
}

/// A partial update merged into an existing `FlowConfig` by `FlowConfigStore::set_config`.
///
/// Relationship fields (alternates, dependency target, prerequisites) are edited through
/// the dedicated store methods so that their invariants hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowConfigPatch {
    /// `Some(None)` clears the flow type.
    pub flow_type: Option<Option<FlowType>>,
    /// `Some(None)` clears the prompt.
    pub decision_prompt: Option<Option<String>>,
}

impl FlowConfigPatch {
    pub fn flow_type(flow_type: FlowType) -> Self {
        Self {
            flow_type: Some(Some(flow_type)),
            ..Default::default()
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.decision_prompt = Some(Some(prompt.into()));
        self
    }
}
