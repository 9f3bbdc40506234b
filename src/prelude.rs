//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the flowcraft
//! crate. Import it to get the model, the flow store, the resolver and the session without
//! naming each module.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowcraft::prelude::*;
//!
//! # fn run_example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let project: Project = serde_json::from_str(&std::fs::read_to_string("project.json")?)?;
//! let flows = FlowConfigStore::from_json_str(&std::fs::read_to_string("flows.json")?)?;
//!
//! let session = ResolutionSession::open(
//!     project,
//!     flows,
//!     EngineConfig::default(),
//!     ResolutionMode::FinalPlan,
//!     "run-1",
//!     Selections::default(),
//! );
//! println!("{} decision(s) pending", session.pending_count());
//! # Ok(())
//! # }
//! ```

// Data model
pub use crate::model::{
    DecisionOption, DecisionPoint, DecisionStage, NodeIndex, NodeKind, Operation, Phase,
    Project, ProjectRun, ResolutionMode, WorkflowStep,
};

// Flow annotations
pub use crate::flow::{AlternateGroup, FlowConfig, FlowConfigPatch, FlowConfigStore, FlowType};

// Decisions, resolution and ordering
pub use crate::decisions::{
    DecisionItem, DecisionRollup, DecisionSource, DecisionStatus, answered_count, apply_answer,
    extract_alternate_decisions, extract_decisions, extract_decisions_with_answers,
    pending_count,
};
pub use crate::ordering::{OrderingReport, PhaseOrdering, StandardPhase, enforce_standard_ordering};
pub use crate::resolver::{PlanScope, Resolution, Resolver, Selections, ValidationFailure};
pub use crate::session::{FinalizedRun, ResolutionSession};
pub use crate::storage::ProjectStore;

// Configuration and reporting
pub use crate::config::EngineConfig;
pub use crate::report::PlanFormatter;

// Error types
pub use crate::error::{
    DataIntegrityWarning, FlowError, SessionError, SnapshotError, StorageError, ValidationError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
