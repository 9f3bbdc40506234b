use super::project::Phase;
use ahash::AHashMap;
use std::fmt;

/// Which level of the phase → operation → step hierarchy a node lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Phase,
    Operation,
    Step,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Phase => f.write_str("phase"),
            NodeKind::Operation => f.write_str("operation"),
            NodeKind::Step => f.write_str("step"),
        }
    }
}

/// Where a node sits in a phase list, with display context for its ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLocation {
    pub kind: NodeKind,
    /// Position in a depth-first, document-order walk.
    pub order: usize,
    pub name: String,
    pub phase_id: String,
    pub phase_name: String,
    pub operation_id: Option<String>,
    pub operation_name: Option<String>,
}

impl NodeLocation {
    /// The enclosing phase and operation names, as used in user-facing messages.
    ///
    /// A phase reports itself; an operation reports its phase and itself.
    pub fn context(&self) -> (Option<String>, Option<String>) {
        match self.kind {
            NodeKind::Phase => (Some(self.name.clone()), None),
            NodeKind::Operation => (Some(self.phase_name.clone()), Some(self.name.clone())),
            NodeKind::Step => (Some(self.phase_name.clone()), self.operation_name.clone()),
        }
    }
}

/// A read-only id lookup over a phase list.
///
/// When ids repeat, the first occurrence in document order wins.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    nodes: AHashMap<String, NodeLocation>,
    ordered: Vec<String>,
}

impl NodeIndex {
    pub fn build(phases: &[Phase]) -> Self {
        let mut nodes = AHashMap::new();
        let mut ordered = Vec::new();
        let mut order = 0usize;
        let mut record = |id: &str, location: NodeLocation| {
            if !nodes.contains_key(id) {
                nodes.insert(id.to_string(), location);
                ordered.push(id.to_string());
            }
        };

        for phase in phases {
            record(
                &phase.id,
                NodeLocation {
                    kind: NodeKind::Phase,
                    order,
                    name: phase.name.clone(),
                    phase_id: phase.id.clone(),
                    phase_name: phase.name.clone(),
                    operation_id: None,
                    operation_name: None,
                },
            );
            order += 1;
            for operation in &phase.operations {
                record(
                    &operation.id,
                    NodeLocation {
                        kind: NodeKind::Operation,
                        order,
                        name: operation.name.clone(),
                        phase_id: phase.id.clone(),
                        phase_name: phase.name.clone(),
                        operation_id: Some(operation.id.clone()),
                        operation_name: Some(operation.name.clone()),
                    },
                );
                order += 1;
                for step in &operation.steps {
                    record(
                        &step.id,
                        NodeLocation {
                            kind: NodeKind::Step,
                            order,
                            name: step.step.clone(),
                            phase_id: phase.id.clone(),
                            phase_name: phase.name.clone(),
                            operation_id: Some(operation.id.clone()),
                            operation_name: Some(operation.name.clone()),
                        },
                    );
                    order += 1;
                }
            }
        }

        Self { nodes, ordered }
    }

    /// Every distinct node in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeLocation)> {
        self.ordered
            .iter()
            .filter_map(|id| self.nodes.get(id).map(|loc| (id.as_str(), loc)))
    }

    pub fn get(&self, id: &str) -> Option<&NodeLocation> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Document-order position, or `usize::MAX` for unknown ids.
    pub fn order_of(&self, id: &str) -> usize {
        self.get(id).map_or(usize::MAX, |loc| loc.order)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
