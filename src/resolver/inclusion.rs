use super::Selections;
use crate::config::EngineConfig;
use crate::error::{DataIntegrityWarning, ValidationError};
use crate::flow::{AlternateGroup, FlowConfigStore, FlowType};
use crate::model::NodeIndex;
use ahash::AHashSet;

/// Which nodes survive resolution, plus the validation errors found while deciding.
pub(super) struct Inclusion {
    removed: AHashSet<String>,
    pub(super) errors: Vec<ValidationError>,
    pub(super) warnings: Vec<DataIntegrityWarning>,
}

impl Inclusion {
    /// Decides inclusion in dependency order.
    ///
    /// Answered alternates and unselected optional work are removed first, then dependents
    /// are settled until nothing else drops out. Open groups and dependency targets are only
    /// validated for nodes that are still part of the plan at that point.
    pub(super) fn evaluate(
        store: &FlowConfigStore,
        config: &EngineConfig,
        index: &NodeIndex,
        selections: &Selections,
    ) -> Self {
        let mut inclusion = Self {
            removed: AHashSet::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        };
        let open_groups = inclusion.apply_answered_alternates(store, index, selections);
        inclusion.apply_optional_work(store, index, selections);
        inclusion.settle_dependents(store, index, selections);
        inclusion.check_open_groups(open_groups, config, index);
        inclusion.check_dependency_targets(store, index);
        inclusion
    }

    /// Removes the unchosen members of every answered group and returns the rest.
    fn apply_answered_alternates(
        &mut self,
        store: &FlowConfigStore,
        index: &NodeIndex,
        selections: &Selections,
    ) -> Vec<AlternateGroup> {
        let mut open = Vec::new();
        for group in store.alternate_groups_in(index) {
            match group.selection(&selections.answers) {
                Some(chosen) => {
                    tracing::debug!(group = %group.key, chosen, "Alternate chosen");
                    for member in group.members.iter().filter(|m| m.as_str() != chosen) {
                        self.removed.insert(member.clone());
                    }
                }
                None => open.push(group),
            }
        }
        open
    }

    fn apply_optional_work(&mut self, store: &FlowConfigStore, index: &NodeIndex, selections: &Selections) {
        for (id, _) in index.iter() {
            if store.flow_type(id) == Some(FlowType::IfNecessary) && !selections.is_work_selected(id) {
                self.removed.insert(id.to_string());
            }
        }
    }

    /// Drops dependents until a full pass removes nothing new.
    ///
    /// A dependent can lose its target through a later node in document order, so a
    /// single pass is not enough.
    fn settle_dependents(&mut self, store: &FlowConfigStore, index: &NodeIndex, selections: &Selections) {
        loop {
            let before = self.removed.len();
            for (id, _) in index.iter() {
                let flow = store.get_config(id);
                if flow.flow_type != Some(FlowType::Dependent) || self.is_removed(id) {
                    continue;
                }

                let keep = match flow.dependent_on.as_deref() {
                    // Wrongly typed targets are reported once the plan has settled.
                    Some(target) if store.flow_type(target) != Some(FlowType::IfNecessary) && index.contains(target) => {
                        continue;
                    }
                    Some(target) => selections.is_work_selected(id) && self.is_present(target, index),
                    None => {
                        let warning = DataIntegrityWarning::MissingDependencyTarget {
                            node_id: id.to_string(),
                        };
                        tracing::warn!(%warning, "Dropping dependent without a prerequisite");
                        self.warnings.push(warning);
                        false
                    }
                };
                if !keep {
                    tracing::debug!(node = id, "Dropping dependent whose prerequisite is inactive");
                    self.removed.insert(id.to_string());
                }
            }
            if self.removed.len() == before {
                break;
            }
        }
    }

    fn check_open_groups(&mut self, groups: Vec<AlternateGroup>, config: &EngineConfig, index: &NodeIndex) {
        for group in groups {
            if !group.members.iter().any(|m| self.is_present(m, index)) {
                tracing::debug!(group = %group.key, "Alternate group sits in excluded work");
            } else if config.require_alternate_answers {
                self.errors.push(ValidationError::UnansweredAlternateGroup {
                    group_key: group.key,
                    members: group.members,
                    phase_name: group.phase_name,
                    operation_name: group.operation_name,
                });
            } else {
                tracing::debug!(group = %group.key, "Alternate group left open; keeping all members");
            }
        }
    }

    fn check_dependency_targets(&mut self, store: &FlowConfigStore, index: &NodeIndex) {
        for (id, location) in index.iter() {
            let flow = store.get_config(id);
            if flow.flow_type != Some(FlowType::Dependent) || !self.is_present(id, index) {
                continue;
            }
            let Some(target) = flow.dependent_on.as_deref() else {
                continue;
            };
            if index.contains(target) && store.flow_type(target) != Some(FlowType::IfNecessary) {
                let (phase_name, operation_name) = location.context();
                self.errors.push(ValidationError::InvalidDependency {
                    node_id: id.to_string(),
                    target_id: target.to_string(),
                    phase_name,
                    operation_name,
                });
            }
        }
    }

    pub(super) fn is_removed(&self, id: &str) -> bool {
        self.removed.contains(id)
    }

    /// Whether `id` exists and neither it nor any ancestor was removed.
    pub(super) fn is_present(&self, id: &str, index: &NodeIndex) -> bool {
        let Some(location) = index.get(id) else {
            return false;
        };
        !self.is_removed(id)
            && !self.is_removed(&location.phase_id)
            && !location
                .operation_id
                .as_deref()
                .is_some_and(|operation| self.is_removed(operation))
    }

    /// Removed nodes whose ancestors were kept, in document order.
    pub(super) fn excluded_in_order(&self, index: &NodeIndex) -> Vec<String> {
        index
            .iter()
            .filter(|(id, location)| {
                let ancestor_removed = (location.phase_id != *id && self.is_removed(&location.phase_id))
                    || location
                        .operation_id
                        .as_deref()
                        .is_some_and(|operation| operation != *id && self.is_removed(operation));
                self.is_removed(id) && !ancestor_removed
            })
            .map(|(id, _)| id.to_string())
            .collect()
    }

    /// Kept nodes whose prerequisites did not make it into the plan.
    pub(super) fn unmet_predecessors(
        &self,
        store: &FlowConfigStore,
        index: &NodeIndex,
    ) -> Vec<DataIntegrityWarning> {
        let mut warnings = Vec::new();
        for (id, _) in index.iter() {
            if !self.is_present(id, index) {
                continue;
            }
            for predecessor in &store.get_config(id).predecessor_ids {
                if index.contains(predecessor) && !self.is_present(predecessor, index) {
                    let warning = DataIntegrityWarning::UnmetPredecessor {
                        node_id: id.to_string(),
                        predecessor_id: predecessor.clone(),
                    };
                    tracing::warn!(%warning, "Prerequisite excluded from plan");
                    warnings.push(warning);
                }
            }
        }
        warnings
    }
}
