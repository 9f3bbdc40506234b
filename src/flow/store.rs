use super::config::{FlowConfig, FlowConfigPatch, FlowType};
use crate::error::{DataIntegrityWarning, FlowError};
use crate::model::{NodeIndex, Phase};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

static EMPTY_CONFIG: FlowConfig = FlowConfig {
    flow_type: None,
    decision_prompt: None,
    alternate_ids: Vec::new(),
    dependent_on: None,
    predecessor_ids: Vec::new(),
};

/// The id-keyed side map of flow annotations for one project.
///
/// Alternate membership is kept symmetric: every edit touches both endpoints, and
/// deserialized data is repaired on load.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(
    from = "AHashMap<String, FlowConfig>",
    into = "AHashMap<String, FlowConfig>"
)]
pub struct FlowConfigStore {
    configs: AHashMap<String, FlowConfig>,
}

impl FlowConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The annotation for `id`, or the zero-value config when the node has none.
    pub fn get_config(&self, id: &str) -> &FlowConfig {
        self.configs.get(id).unwrap_or(&EMPTY_CONFIG)
    }

    pub fn flow_type(&self, id: &str) -> Option<FlowType> {
        self.get_config(id).flow_type
    }

    pub fn contains(&self, id: &str) -> bool {
        self.configs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FlowConfig)> {
        self.configs.iter()
    }

    /// Merges the fields present in `patch` into the config for `id`.
    ///
    /// Moving a node away from `alternate` detaches it from its group on both sides, and
    /// moving it away from `dependent` drops its dependency target. An if-necessary node
    /// that other nodes depend on cannot change type.
    pub fn set_config(&mut self, id: &str, patch: FlowConfigPatch) -> Result<(), FlowError> {
        if let Some(flow_type) = patch.flow_type {
            self.check_retype(id, flow_type)?;
            self.change_type(id, flow_type);
        }
        if let Some(prompt) = patch.decision_prompt {
            self.entry(id).decision_prompt = prompt;
        }
        self.drop_if_empty(id);
        Ok(())
    }

    /// Removes every annotation on `id`, detaching it from any alternate group.
    pub fn clear(&mut self, id: &str) -> Result<(), FlowError> {
        self.check_retype(id, None)?;
        self.detach_alternates(id);
        self.configs.remove(id);
        Ok(())
    }

    /// Ids of the nodes whose `dependent_on` names `id`, sorted.
    pub fn dependents_of(&self, id: &str) -> Vec<String> {
        let mut dependents: Vec<String> = self
            .configs
            .iter()
            .filter(|(_, config)| config.is_dependent() && config.dependent_on.as_deref() == Some(id))
            .map(|(node, _)| node.clone())
            .collect();
        dependents.sort();
        dependents
    }

    /// Links `a` and `b` as mutually exclusive alternates. Repeated calls are no-ops.
    pub fn add_alternate(&mut self, a: &str, b: &str) -> Result<(), FlowError> {
        if a == b {
            return Err(FlowError::SelfAlternate(a.to_string()));
        }
        self.check_retype(a, Some(FlowType::Alternate))?;
        self.check_retype(b, Some(FlowType::Alternate))?;
        self.change_type(a, Some(FlowType::Alternate));
        self.change_type(b, Some(FlowType::Alternate));
        Self::push_unique(&mut self.entry(a).alternate_ids, b);
        Self::push_unique(&mut self.entry(b).alternate_ids, a);
        Ok(())
    }

    /// Removes the alternate edge between `a` and `b` on both sides.
    ///
    /// The flow type is left as `alternate` even if no siblings remain.
    pub fn remove_alternate(&mut self, a: &str, b: &str) {
        if let Some(config) = self.configs.get_mut(a) {
            config.alternate_ids.retain(|id| id != b);
        }
        if let Some(config) = self.configs.get_mut(b) {
            config.alternate_ids.retain(|id| id != a);
        }
    }

    /// Marks `node` as dependent on `depends_on`, which must be an if-necessary node.
    pub fn set_dependent(&mut self, node: &str, depends_on: &str) -> Result<(), FlowError> {
        if node == depends_on {
            return Err(FlowError::SelfPrerequisite(node.to_string()));
        }
        let target_type = self.flow_type(depends_on);
        if target_type != Some(FlowType::IfNecessary) {
            return Err(FlowError::invalid_dependency(node, depends_on, target_type));
        }
        self.check_retype(node, Some(FlowType::Dependent))?;
        self.change_type(node, Some(FlowType::Dependent));
        self.entry(node).dependent_on = Some(depends_on.to_string());
        Ok(())
    }

    /// Replaces the prerequisites of `node`, rejecting self references and cycles.
    pub fn set_predecessors(&mut self, node: &str, predecessor_ids: &[String]) -> Result<(), FlowError> {
        if predecessor_ids.iter().any(|p| p == node) {
            return Err(FlowError::SelfPrerequisite(node.to_string()));
        }
        for predecessor in predecessor_ids {
            if let Some(mut path) = self.predecessor_path(predecessor, node) {
                path.insert(0, node.to_string());
                return Err(FlowError::PredecessorCycle {
                    node_id: node.to_string(),
                    path,
                });
            }
        }

        let mut unique = Vec::with_capacity(predecessor_ids.len());
        for predecessor in predecessor_ids {
            Self::push_unique(&mut unique, predecessor);
        }
        self.entry(node).predecessor_ids = unique;
        self.drop_if_empty(node);
        Ok(())
    }

    /// Reports references to nodes that do not exist in `phases`.
    pub fn integrity_warnings(&self, index: &NodeIndex) -> Vec<DataIntegrityWarning> {
        let mut warnings = Vec::new();
        let mut entries: Vec<(&String, &FlowConfig)> = self.configs.iter().collect();
        entries.sort_by(|(a, _), (b, _)| {
            index
                .order_of(a)
                .cmp(&index.order_of(b))
                .then_with(|| a.cmp(b))
        });

        for (id, config) in entries {
            if !index.contains(id) {
                continue;
            }
            for alternate in &config.alternate_ids {
                if !index.contains(alternate) {
                    warnings.push(DataIntegrityWarning::DanglingAlternate {
                        node_id: id.clone(),
                        missing_id: alternate.clone(),
                    });
                }
            }
            if let Some(target) = &config.dependent_on {
                if !index.contains(target) {
                    warnings.push(DataIntegrityWarning::DanglingDependency {
                        node_id: id.clone(),
                        missing_id: target.clone(),
                    });
                }
            }
            for predecessor in &config.predecessor_ids {
                if !index.contains(predecessor) {
                    warnings.push(DataIntegrityWarning::DanglingPredecessor {
                        node_id: id.clone(),
                        missing_id: predecessor.clone(),
                    });
                }
            }
        }
        warnings
    }

    /// Drops annotations and edges that reference nodes no longer present in `phases`.
    pub fn prune(&mut self, phases: &[Phase]) -> Vec<DataIntegrityWarning> {
        let index = NodeIndex::build(phases);
        let warnings = self.integrity_warnings(&index);
        for warning in &warnings {
            tracing::warn!(%warning, "Repairing flow configuration");
        }

        let before = self.configs.len();
        self.configs.retain(|id, _| index.contains(id));
        if self.configs.len() != before {
            tracing::debug!(
                removed = before - self.configs.len(),
                "Dropped flow configs for deleted nodes"
            );
        }

        for config in self.configs.values_mut() {
            config.alternate_ids.retain(|id| index.contains(id));
            config.predecessor_ids.retain(|id| index.contains(id));
            if config.dependent_on.as_deref().is_some_and(|t| !index.contains(t)) {
                config.dependent_on = None;
            }
        }
        warnings
    }

    fn entry(&mut self, id: &str) -> &mut FlowConfig {
        self.configs.entry(id.to_string()).or_default()
    }

    fn drop_if_empty(&mut self, id: &str) {
        if self.configs.get(id).is_some_and(FlowConfig::is_empty) {
            self.configs.remove(id);
        }
    }

    /// Refuses to move an if-necessary node away from that type while dependents point at it.
    fn check_retype(&self, id: &str, flow_type: Option<FlowType>) -> Result<(), FlowError> {
        if self.flow_type(id) != Some(FlowType::IfNecessary) || flow_type == Some(FlowType::IfNecessary) {
            return Ok(());
        }
        let dependents = self.dependents_of(id);
        if dependents.is_empty() {
            Ok(())
        } else {
            Err(FlowError::TargetHasDependents {
                node_id: id.to_string(),
                dependents,
            })
        }
    }

    fn change_type(&mut self, id: &str, flow_type: Option<FlowType>) {
        let previous = self.flow_type(id);
        if previous == flow_type {
            return;
        }
        if previous == Some(FlowType::Alternate) {
            self.detach_alternates(id);
        }
        let config = self.entry(id);
        if previous == Some(FlowType::Dependent) {
            config.dependent_on = None;
        }
        config.flow_type = flow_type;
    }

    fn detach_alternates(&mut self, id: &str) {
        let siblings = match self.configs.get_mut(id) {
            Some(config) => std::mem::take(&mut config.alternate_ids),
            None => return,
        };
        for sibling in siblings {
            if let Some(config) = self.configs.get_mut(&sibling) {
                config.alternate_ids.retain(|other| other != id);
            }
        }
    }

    /// Finds a chain of prerequisites leading from `from` to `to`, if any.
    fn predecessor_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let mut visited = AHashSet::new();
        let mut stack = vec![vec![from.to_string()]];
        while let Some(path) = stack.pop() {
            let current = path.last()?;
            if current == to {
                return Some(path);
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            for next in &self.get_config(current).predecessor_ids {
                let mut extended = path.clone();
                extended.push(next.clone());
                stack.push(extended);
            }
        }
        None
    }

    fn push_unique(list: &mut Vec<String>, id: &str) {
        if list.iter().any(|existing| existing == id) {
            tracing::debug!(id, "Edge already present");
        } else {
            list.push(id.to_string());
        }
    }
}

impl From<AHashMap<String, FlowConfig>> for FlowConfigStore {
    fn from(configs: AHashMap<String, FlowConfig>) -> Self {
        configs.into_iter().collect()
    }
}

impl From<FlowConfigStore> for AHashMap<String, FlowConfig> {
    fn from(store: FlowConfigStore) -> Self {
        store.configs
    }
}

impl FromIterator<(String, FlowConfig)> for FlowConfigStore {
    /// Collects raw entries as read from storage; alternate links are made symmetric.
    fn from_iter<I: IntoIterator<Item = (String, FlowConfig)>>(iter: I) -> Self {
        let mut store = Self {
            configs: iter.into_iter().collect(),
        };
        store.symmetrize();
        store
    }
}

impl FlowConfigStore {
    /// Restores alternate symmetry on data that was written without it.
    pub fn symmetrize(&mut self) {
        let edges: Vec<(String, String)> = self
            .configs
            .iter()
            .filter(|(_, c)| c.is_alternate())
            .flat_map(|(id, c)| c.alternate_ids.iter().map(move |b| (id.clone(), b.clone())))
            .collect();
        for (a, b) in edges {
            if a == b {
                if let Some(config) = self.configs.get_mut(&a) {
                    config.alternate_ids.retain(|id| id != &b);
                }
                continue;
            }
            if self.flow_type(&b) != Some(FlowType::Alternate) {
                self.change_type(&b, Some(FlowType::Alternate));
            }
            Self::push_unique(&mut self.entry(&b).alternate_ids, &a);
        }
    }
}
