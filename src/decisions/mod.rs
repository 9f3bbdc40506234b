//! Decision extraction and rollup.
//!
//! Decision items are derived views over a phase list. They are rebuilt every time a
//! resolution session opens; the only persisted state is the answer map.

use crate::model::{DecisionOption, DecisionStage};
use serde::{Deserialize, Serialize};

mod extract;
mod rollup;

pub use extract::*;
pub use rollup::*;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionStatus {
    #[default]
    Pending,
    Answered,
    /// The stored answer or the authored options no longer line up with the project.
    RequiresAttention,
}

/// Where a decision item comes from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionSource {
    /// A step carrying a decision point; the item id is the step id.
    Step,
    /// An alternate group; the item id is the group key and options name its members.
    AlternateGroup,
}

/// One resolvable decision, flattened for presentation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecisionItem {
    pub id: String,
    pub source: DecisionSource,
    pub question: String,
    pub step_name: String,
    pub phase_name: String,
    pub operation_name: Option<String>,
    pub stage: DecisionStage,
    pub options: Vec<DecisionOption>,
    pub selected_value: Option<String>,
    pub status: DecisionStatus,
}

impl DecisionItem {
    pub fn is_pending(&self) -> bool {
        self.status == DecisionStatus::Pending
    }

    pub fn is_answered(&self) -> bool {
        self.status == DecisionStatus::Answered
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}
