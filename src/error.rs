use crate::flow::FlowType;
use itertools::Itertools;
use thiserror::Error;

/// Errors raised while authoring flow annotations in a `FlowConfigStore`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error(
        "Node '{node_id}' cannot depend on '{target_id}': target is {found}, expected if-necessary"
    )]
    InvalidDependency {
        node_id: String,
        target_id: String,
        found: String,
    },

    #[error("Node '{0}' cannot be its own prerequisite")]
    SelfPrerequisite(String),

    #[error("Node '{0}' cannot be an alternate of itself")]
    SelfAlternate(String),

    #[error("Adding prerequisites to '{node_id}' would create a cycle: {}", .path.join(" -> "))]
    PredecessorCycle { node_id: String, path: Vec<String> },

    #[error(
        "Node '{node_id}' must stay if-necessary while {} depend on it",
        .dependents.iter().map(|d| format!("'{}'", d)).join(", ")
    )]
    TargetHasDependents {
        node_id: String,
        dependents: Vec<String>,
    },
}

impl FlowError {
    pub(crate) fn invalid_dependency(node_id: &str, target_id: &str, found: Option<FlowType>) -> Self {
        FlowError::InvalidDependency {
            node_id: node_id.to_string(),
            target_id: target_id.to_string(),
            found: found.map_or_else(|| "unannotated".to_string(), |t| t.to_string()),
        }
    }
}

/// User-facing, recoverable problems that block applying a resolution.
///
/// Each variant carries enough context for a caller to point at the offending item.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "No option chosen for alternate group '{group_key}' in {} (members: {})",
        location_label(.phase_name, .operation_name),
        .members.iter().join(", ")
    )]
    UnansweredAlternateGroup {
        group_key: String,
        members: Vec<String>,
        phase_name: Option<String>,
        operation_name: Option<String>,
    },

    #[error(
        "'{node_id}' in {} is dependent on '{target_id}', which is not an if-necessary node",
        location_label(.phase_name, .operation_name)
    )]
    InvalidDependency {
        node_id: String,
        target_id: String,
        phase_name: Option<String>,
        operation_name: Option<String>,
    },

    #[error("{pending} decision(s) must be answered before the {mode} plan can be finalized")]
    PendingDecisions { pending: usize, mode: String },
}

fn location_label(phase_name: &Option<String>, operation_name: &Option<String>) -> String {
    match (phase_name, operation_name) {
        (Some(phase), Some(operation)) => format!("phase '{}' / operation '{}'", phase, operation),
        (Some(phase), None) => format!("phase '{}'", phase),
        (None, Some(operation)) => format!("operation '{}'", operation),
        (None, None) => "the project".to_string(),
    }
}

/// Integrity problems that the engine repairs on its own and reports alongside a result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityWarning {
    #[error("Phase '{phase_name}' reused id '{original_id}'; reassigned to '{new_id}'")]
    DuplicatePhaseId {
        original_id: String,
        new_id: String,
        phase_name: String,
    },

    #[error("Phase '{phase_id}' repeats standard phase '{name}'; kept with the custom phases")]
    DuplicateStandardPhase { phase_id: String, name: String },

    #[error("Step '{step_id}' points at missing node '{missing_id}' via {via}")]
    DanglingNextStep {
        step_id: String,
        missing_id: String,
        via: String,
    },

    #[error("Alternate link from '{node_id}' to missing node '{missing_id}' was dropped")]
    DanglingAlternate { node_id: String, missing_id: String },

    #[error("'{node_id}' depends on missing node '{missing_id}' and was dropped")]
    DanglingDependency { node_id: String, missing_id: String },

    #[error("'{node_id}' is dependent but names no prerequisite and was dropped")]
    MissingDependencyTarget { node_id: String },

    #[error("'{node_id}' lists missing prerequisite '{missing_id}'")]
    DanglingPredecessor { node_id: String, missing_id: String },

    #[error("'{node_id}' is planned but its prerequisite '{predecessor_id}' is not")]
    UnmetPredecessor {
        node_id: String,
        predecessor_id: String,
    },
}

/// Errors that can occur when reading or writing snapshots and configuration files.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Could not access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary encoding failed: {0}")]
    Encode(String),

    #[error("Binary decoding failed: {0}")]
    Decode(String),
}

/// Errors reported by a `ProjectStore` implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("No {kind} found with id '{id}'")]
    NotFound { kind: &'static str, id: String },

    #[error("Storage backend failed: {0}")]
    Backend(String),
}

/// Errors from committing a resolution session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Resolution failed validation: {0}")]
    Validation(#[from] crate::resolver::ValidationFailure),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
