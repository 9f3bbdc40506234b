use super::store::FlowConfigStore;
use crate::model::{NodeIndex, NodeLocation, Phase};
use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;

/// A set of mutually exclusive nodes from which exactly one is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateGroup {
    /// Id of the member that comes first in document order.
    pub key: String,
    /// Members in document order, key first.
    pub members: Vec<String>,
    pub phase_name: Option<String>,
    pub operation_name: Option<String>,
}

impl AlternateGroup {
    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m == id)
    }

    /// The member chosen in `answers`, looked up by group key first and then by member id.
    ///
    /// An answer that names a node outside the group is ignored.
    pub fn selection<'a>(&self, answers: &'a AHashMap<String, String>) -> Option<&'a str> {
        std::iter::once(&self.key)
            .chain(self.members.iter())
            .filter_map(|k| answers.get(k))
            .map(String::as_str)
            .find(|chosen| self.contains(chosen))
    }
}

impl FlowConfigStore {
    /// Every alternate group present in `phases`, in document order.
    ///
    /// Groups are connected components over alternate links, limited to nodes that exist in
    /// the project. A member left without siblings forms no group.
    pub fn alternate_groups(&self, phases: &[Phase]) -> Vec<AlternateGroup> {
        let index = NodeIndex::build(phases);
        self.alternate_groups_in(&index)
    }

    pub(crate) fn alternate_groups_in(&self, index: &NodeIndex) -> Vec<AlternateGroup> {
        let mut seeds: Vec<&String> = self
            .iter()
            .filter(|(id, config)| config.is_alternate() && index.contains(id))
            .map(|(id, _)| id)
            .collect();
        seeds.sort_by(|a, b| index.order_of(a).cmp(&index.order_of(b)).then_with(|| a.cmp(b)));

        let mut visited: AHashSet<String> = AHashSet::new();
        let mut groups = Vec::new();

        for seed in seeds {
            if visited.contains(seed.as_str()) {
                continue;
            }
            let mut members = Vec::new();
            let mut queue = VecDeque::from([seed.clone()]);
            visited.insert(seed.clone());
            while let Some(id) = queue.pop_front() {
                for sibling in &self.get_config(&id).alternate_ids {
                    if index.contains(sibling)
                        && self.get_config(sibling).is_alternate()
                        && visited.insert(sibling.clone())
                    {
                        queue.push_back(sibling.clone());
                    }
                }
                members.push(id);
            }

            if members.len() < 2 {
                continue;
            }
            members.sort_by(|a, b| index.order_of(a).cmp(&index.order_of(b)).then_with(|| a.cmp(b)));
            let key = members[0].clone();
            let (phase_name, operation_name) = index
                .get(&key)
                .map(NodeLocation::context)
                .unwrap_or((None, None));
            groups.push(AlternateGroup {
                key,
                members,
                phase_name,
                operation_name,
            });
        }
        groups
    }
}
