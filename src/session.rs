//! Resolution sessions.
//!
//! A session is the thin layer that ties the engine together for one project run: it
//! extracts the decisions to present, records answers and optional-work picks, enforces
//! the pending-decision gate for the session's mode, and finally produces an immutable
//! `ProjectRun` snapshot with a resolved, canonically ordered phase list.

use crate::config::EngineConfig;
use crate::decisions::{
    DecisionItem, DecisionRollup, extract_alternate_decisions, extract_decisions_with_answers,
};
use crate::error::{DataIntegrityWarning, SessionError, StorageError, ValidationError};
use crate::flow::FlowConfigStore;
use crate::model::{Project, ProjectRun, ResolutionMode};
use crate::ordering::PhaseOrdering;
use crate::resolver::{Resolution, Resolver, Selections, ValidationFailure};
use crate::storage::ProjectStore;
use chrono::{DateTime, Utc};

/// The outcome of a successful finalize: the new run snapshot and any repairs made.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedRun {
    pub run: ProjectRun,
    pub warnings: Vec<DataIntegrityWarning>,
}

pub struct ResolutionSession {
    project: Project,
    flows: FlowConfigStore,
    config: EngineConfig,
    mode: ResolutionMode,
    run_id: String,
    selections: Selections,
    items: Vec<DecisionItem>,
}

impl ResolutionSession {
    /// Opens a session over `project`, seeding it with previously saved selections.
    ///
    /// Step decisions come first (document order), followed by alternate-group choices.
    /// Decisions that sit entirely in excluded work are not listed.
    pub fn open(
        project: Project,
        flows: FlowConfigStore,
        config: EngineConfig,
        mode: ResolutionMode,
        run_id: impl Into<String>,
        saved: Selections,
    ) -> Self {
        let mut session = Self {
            project,
            flows,
            config,
            mode,
            run_id: run_id.into(),
            selections: saved,
            items: Vec::new(),
        };
        session.refresh_items();
        tracing::debug!(
            project = %session.project.id,
            run = %session.run_id,
            mode = %mode,
            decisions = session.items.len(),
            "Opened resolution session"
        );
        session
    }

    /// Opens a session from whatever `store` holds for the project and run.
    pub fn open_from_store(
        store: &dyn ProjectStore,
        project_id: &str,
        run_id: &str,
        mode: ResolutionMode,
        config: EngineConfig,
    ) -> Result<Self, StorageError> {
        let project = store.load_project(project_id)?;
        let flows = store.load_flow_configs(project_id)?;
        let saved = store.load_selections(run_id)?;
        Ok(Self::open(project, flows, config, mode, run_id, saved))
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    pub fn items(&self) -> &[DecisionItem] {
        &self.items
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn rollup(&self) -> DecisionRollup {
        DecisionRollup::from_items(&self.items)
    }

    pub fn pending_count(&self) -> usize {
        self.rollup().pending
    }

    pub fn answered_count(&self) -> usize {
        self.rollup().answered
    }

    pub fn can_finalize(&self) -> bool {
        self.rollup().can_finalize(self.mode)
    }

    /// Records an answer for the decision `id`.
    ///
    /// Unknown ids and values that are not one of the item's options are ignored, so the
    /// item keeps its status. For an alternate-group item the value is the chosen member id.
    pub fn answer(&mut self, id: &str, value: &str) {
        let Some(item) = self.items.iter().find(|item| item.id == id) else {
            tracing::debug!(id, "Ignoring answer for unknown decision");
            return;
        };
        if !item.has_option(value) {
            tracing::debug!(id, value, "Ignoring value that is not an option of the decision");
            return;
        }
        self.selections
            .answers
            .insert(id.to_string(), value.to_string());
        self.refresh_items();
    }

    /// Adds or removes `node_id` from the optional work picked for `phase_id`.
    pub fn toggle_if_necessary(&mut self, phase_id: &str, node_id: &str, selected: bool) {
        let list = self
            .selections
            .if_necessary_work
            .entry(phase_id.to_string())
            .or_default();
        if selected {
            if !list.iter().any(|id| id == node_id) {
                list.push(node_id.to_string());
            }
        } else {
            list.retain(|id| id != node_id);
            if list.is_empty() {
                self.selections.if_necessary_work.remove(phase_id);
            }
        }
        self.refresh_items();
    }

    /// Rebuilds the decision list, keeping only decisions with a member still in the plan.
    fn refresh_items(&mut self) {
        let phases = &self.project.phases;
        let answers = &self.selections.answers;
        let scope = Resolver::new(&self.flows, &self.config, self.mode).scope(phases, &self.selections);

        let steps = extract_decisions_with_answers(phases, answers)
            .into_iter()
            .filter(|item| scope.contains(&item.id));
        let groups = extract_alternate_decisions(phases, &self.flows, answers)
            .into_iter()
            .filter(|item| item.options.iter().any(|option| scope.contains(&option.value)));
        self.items = steps.chain(groups).collect();
    }

    /// Resolves the current selections without the pending gate or phase ordering.
    pub fn preview(&self) -> Result<Resolution, ValidationFailure> {
        Resolver::new(&self.flows, &self.config, self.mode).resolve(&self.project.phases, &self.selections)
    }

    pub fn finalize(&self) -> Result<FinalizedRun, ValidationFailure> {
        self.finalize_at(Utc::now())
    }

    /// Resolves, orders and snapshots the run, stamping decisions with `applied_at`.
    pub fn finalize_at(&self, applied_at: DateTime<Utc>) -> Result<FinalizedRun, ValidationFailure> {
        if !self.can_finalize() {
            return Err(ValidationFailure {
                errors: vec![ValidationError::PendingDecisions {
                    pending: self.pending_count(),
                    mode: self.mode.to_string(),
                }],
                warnings: Vec::new(),
            });
        }

        let resolution = Resolver::new(&self.flows, &self.config, self.mode)
            .at(applied_at)
            .resolve(&self.project.phases, &self.selections)?;
        let ordered = PhaseOrdering::new(&self.config).enforce(&resolution.phases);

        let mut warnings = resolution.warnings;
        warnings.extend(ordered.warnings);

        tracing::info!(
            project = %self.project.id,
            run = %self.run_id,
            mode = %self.mode,
            phases = ordered.phases.len(),
            warnings = warnings.len(),
            "Finalized project run"
        );

        Ok(FinalizedRun {
            run: ProjectRun {
                id: self.run_id.clone(),
                template_id: self.project.id.clone(),
                name: self.project.name.clone(),
                phases: ordered.phases,
                answers: self.selections.answers.clone(),
                if_necessary_work: self.selections.if_necessary_work.clone(),
            },
            warnings,
        })
    }

    /// Finalizes and writes the resulting run to `store`.
    pub fn commit(&self, store: &mut dyn ProjectStore) -> Result<FinalizedRun, SessionError> {
        let finalized = self.finalize()?;
        store.save_run(&finalized.run)?;
        Ok(finalized)
    }
}
