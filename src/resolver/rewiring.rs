use super::inclusion::Inclusion;
use crate::model::Phase;
use ahash::{AHashMap, AHashSet};

/// Drops removed nodes and forwards step links that pointed at removed steps.
///
/// A link into a removed step follows that step's own `next_step_id` until it reaches a
/// kept node; if the chain runs out (or loops), the link is cleared. Links into removed
/// operations or phases are cleared.
pub(super) fn filter_and_rewire(phases: Vec<Phase>, inclusion: &Inclusion) -> Vec<Phase> {
    let mut forward: AHashMap<String, Option<String>> = AHashMap::new();
    for phase in &phases {
        let phase_removed = inclusion.is_removed(&phase.id);
        if phase_removed {
            forward.insert(phase.id.clone(), None);
        }
        for operation in &phase.operations {
            let operation_removed = phase_removed || inclusion.is_removed(&operation.id);
            if operation_removed {
                forward.insert(operation.id.clone(), None);
            }
            for step in &operation.steps {
                if operation_removed || inclusion.is_removed(&step.id) {
                    forward.insert(step.id.clone(), step.next_step_id.clone());
                }
            }
        }
    }

    phases
        .into_iter()
        .filter(|phase| !inclusion.is_removed(&phase.id))
        .map(|mut phase| {
            phase.operations.retain(|operation| !inclusion.is_removed(&operation.id));
            for operation in &mut phase.operations {
                operation.steps.retain(|step| !inclusion.is_removed(&step.id));
                for step in &mut operation.steps {
                    step.next_step_id = step.next_step_id.take().and_then(|t| follow(t, &forward));
                    step.alternate_step_id = step
                        .alternate_step_id
                        .take()
                        .and_then(|t| follow(t, &forward));
                }
            }
            phase
        })
        .collect()
}

fn follow(target: String, forward: &AHashMap<String, Option<String>>) -> Option<String> {
    let mut visited = AHashSet::new();
    let mut current = target;
    loop {
        match forward.get(&current) {
            None => return Some(current),
            Some(Some(next)) if visited.insert(current.clone()) => current = next.clone(),
            Some(_) => {
                tracing::debug!(node = %current, "Step link cleared; no kept successor");
                return None;
            }
        }
    }
}
