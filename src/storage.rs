use crate::error::StorageError;
use crate::flow::FlowConfigStore;
use crate::model::{Project, ProjectRun};
use crate::resolver::Selections;

/// The persistence collaborator the engine reads from and writes back to.
///
/// The store owns tree assembly: it hands out fully assembled phase lists and receives
/// them back whole. Flow annotations are keyed by project id; selections and resolved
/// plans by project-run id. Concurrency control is the implementation's concern.
pub trait ProjectStore {
    fn load_project(&self, project_id: &str) -> Result<Project, StorageError>;

    /// Flow annotations for a project. A project with none yields an empty store.
    fn load_flow_configs(&self, project_id: &str) -> Result<FlowConfigStore, StorageError>;

    fn save_flow_configs(&mut self, project_id: &str, flows: &FlowConfigStore) -> Result<(), StorageError>;

    /// Saved answers and optional-work picks for a run. A fresh run yields empty selections.
    fn load_selections(&self, run_id: &str) -> Result<Selections, StorageError>;

    fn save_run(&mut self, run: &ProjectRun) -> Result<(), StorageError>;
}
