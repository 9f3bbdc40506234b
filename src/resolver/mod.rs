//! Workflow resolution.
//!
//! Turns an authored phase list, its flow annotations and a user's selections into the
//! concrete plan for one project run. The input is never mutated; a fresh `Vec<Phase>` is
//! returned together with any integrity repairs that were made along the way.

use crate::config::EngineConfig;
use crate::error::{DataIntegrityWarning, ValidationError};
use crate::flow::FlowConfigStore;
use crate::model::{NodeIndex, Phase, ResolutionMode};
use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

mod inclusion;
mod rewiring;

use inclusion::Inclusion;

/// What the user chose for one project run.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Selections {
    /// Step decision answers (step id → option value) and alternate-group choices
    /// (group key or member id → chosen member id).
    #[serde(default)]
    pub answers: AHashMap<String, String>,
    /// Selected optional work: phase id → ids of the chosen if-necessary or dependent nodes.
    #[serde(default)]
    pub if_necessary_work: AHashMap<String, Vec<String>>,
}

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.answers.insert(id.into(), value.into());
        self
    }

    pub fn select_work(mut self, phase_id: impl Into<String>, node_id: impl Into<String>) -> Self {
        let list = self.if_necessary_work.entry(phase_id.into()).or_default();
        let node_id = node_id.into();
        if !list.contains(&node_id) {
            list.push(node_id);
        }
        self
    }

    /// Whether `id` appears in any phase's optional-work list.
    pub fn is_work_selected(&self, id: &str) -> bool {
        self.if_necessary_work
            .values()
            .any(|ids| ids.iter().any(|selected| selected == id))
    }
}

/// A successfully resolved plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub phases: Vec<Phase>,
    /// Ids removed by a flow rule, in document order. Descendants of removed nodes are
    /// not listed separately.
    pub excluded: Vec<String>,
    pub warnings: Vec<DataIntegrityWarning>,
}

/// Node ids still part of the plan under a given set of selections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanScope {
    present: AHashSet<String>,
}

impl PlanScope {
    pub fn contains(&self, id: &str) -> bool {
        self.present.contains(id)
    }
}

/// Every validation problem found during one resolution attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<DataIntegrityWarning>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.errors.iter().join("; "))
    }
}

impl std::error::Error for ValidationFailure {}

/// Applies selections to a phase list.
///
/// A resolver is cheap to build and holds only borrowed inputs plus the audit timestamp,
/// so repeated calls with the same selections produce identical output.
pub struct Resolver<'a> {
    store: &'a FlowConfigStore,
    config: &'a EngineConfig,
    mode: ResolutionMode,
    applied_at: DateTime<Utc>,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a FlowConfigStore, config: &'a EngineConfig, mode: ResolutionMode) -> Self {
        Self {
            store,
            config,
            mode,
            applied_at: Utc::now(),
        }
    }

    /// Overrides the timestamp stamped on applied decision points.
    pub fn at(mut self, applied_at: DateTime<Utc>) -> Self {
        self.applied_at = applied_at;
        self
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Resolves `phases` against `selections`.
    ///
    /// 1. Answered step decision points redirect their step's successor pointers.
    /// 2. Each alternate group keeps only its chosen member.
    /// 3. If-necessary nodes are kept only when selected.
    /// 4. Dependent nodes are kept only when selected and their prerequisite is kept.
    ///
    /// Validation errors are collected rather than returned at the first problem.
    pub fn resolve(
        &self,
        phases: &[Phase],
        selections: &Selections,
    ) -> Result<Resolution, ValidationFailure> {
        let index = NodeIndex::build(phases);
        let mut warnings = self.store.integrity_warnings(&index);
        for warning in &warnings {
            tracing::warn!(%warning, "Flow configuration references a missing node");
        }

        let mut working = phases.to_vec();
        self.apply_step_decisions(&mut working, &selections.answers, &index, &mut warnings);

        let mut inclusion = Inclusion::evaluate(self.store, self.config, &index, selections);
        warnings.append(&mut inclusion.warnings);
        if !inclusion.errors.is_empty() {
            return Err(ValidationFailure {
                errors: inclusion.errors,
                warnings,
            });
        }

        let excluded = inclusion.excluded_in_order(&index);
        let resolved = rewiring::filter_and_rewire(working, &inclusion);
        warnings.extend(inclusion.unmet_predecessors(self.store, &index));

        tracing::debug!(
            mode = %self.mode,
            excluded = excluded.len(),
            warnings = warnings.len(),
            "Resolved workflow"
        );
        Ok(Resolution {
            phases: resolved,
            excluded,
            warnings,
        })
    }

    /// The nodes that would survive resolution with `selections`, without building the plan.
    pub fn scope(&self, phases: &[Phase], selections: &Selections) -> PlanScope {
        let index = NodeIndex::build(phases);
        let inclusion = Inclusion::evaluate(self.store, self.config, &index, selections);
        let present = index
            .iter()
            .filter(|(id, _)| inclusion.is_present(id, &index))
            .map(|(id, _)| id.to_string())
            .collect();
        PlanScope { present }
    }

    fn apply_step_decisions(
        &self,
        phases: &mut [Phase],
        answers: &AHashMap<String, String>,
        index: &NodeIndex,
        warnings: &mut Vec<DataIntegrityWarning>,
    ) {
        let steps = phases
            .iter_mut()
            .flat_map(|phase| phase.operations.iter_mut())
            .flat_map(|operation| operation.steps.iter_mut());

        for step in steps {
            let answer = answers.get(&step.id).filter(|_| step.is_decision_point);
            if let (Some(value), Some(decision)) = (answer, step.decision_point.as_mut()) {
                match decision.option_for(value).cloned() {
                    Some(option) => {
                        decision.selected_value = Some(option.value.clone());
                        decision.applied_at = Some(self.applied_at);
                        decision.applied_in_stage = Some(self.mode);
                        step.next_step_id = option.next_step_id;
                        step.alternate_step_id = option.alternate_step_id;
                    }
                    None => {
                        tracing::debug!(step_id = %step.id, value = %value, "Ignoring unknown option value");
                    }
                }
            }

            for (via, pointer) in [
                ("nextStepId", &mut step.next_step_id),
                ("alternateStepId", &mut step.alternate_step_id),
            ] {
                let dangling = pointer.as_deref().filter(|target| !index.contains(target));
                if let Some(missing) = dangling {
                    let warning = DataIntegrityWarning::DanglingNextStep {
                        step_id: step.id.clone(),
                        missing_id: missing.to_string(),
                        via: via.to_string(),
                    };
                    tracing::warn!(%warning, "Dropping dangling step link");
                    warnings.push(warning);
                    *pointer = None;
                }
            }
        }
    }
}
