use super::{DecisionItem, DecisionSource, DecisionStatus};
use crate::flow::FlowConfigStore;
use crate::model::{DecisionOption, DecisionPoint, DecisionStage, NodeIndex, Phase};
use ahash::AHashMap;
use itertools::Itertools;

/// Collects every step decision point in document order.
///
/// Items start out `pending`, or `requires-attention` when the decision point has no
/// options or one of its options routes to an id that names no node.
pub fn extract_decisions(phases: &[Phase]) -> Vec<DecisionItem> {
    extract_decisions_with_answers(phases, &AHashMap::new())
}

/// Like [`extract_decisions`], with previously saved answers applied.
///
/// A saved answer that matches no option marks the item `requires-attention`.
pub fn extract_decisions_with_answers(
    phases: &[Phase],
    answers: &AHashMap<String, String>,
) -> Vec<DecisionItem> {
    let index = NodeIndex::build(phases);
    let mut items = Vec::new();

    for phase in phases {
        for operation in &phase.operations {
            for step in &operation.steps {
                let Some(decision) = step.active_decision() else {
                    continue;
                };
                let saved = answers.get(&step.id).cloned();
                let status = step_status(decision, saved.as_deref(), &index);
                items.push(DecisionItem {
                    id: step.id.clone(),
                    source: DecisionSource::Step,
                    question: decision.question.clone(),
                    step_name: step.step.clone(),
                    phase_name: phase.name.clone(),
                    operation_name: Some(operation.name.clone()),
                    stage: decision.stage,
                    options: decision.options.clone(),
                    selected_value: saved,
                    status,
                });
            }
        }
    }
    items
}

fn step_status(decision: &DecisionPoint, saved: Option<&str>, index: &NodeIndex) -> DecisionStatus {
    let broken_route = decision.options.iter().any(|option| {
        [&option.next_step_id, &option.alternate_step_id]
            .into_iter()
            .flatten()
            .any(|target| !index.contains(target))
    });
    if decision.options.is_empty() || broken_route {
        return DecisionStatus::RequiresAttention;
    }
    match saved {
        Some(value) if decision.option_for(value).is_some() => DecisionStatus::Answered,
        Some(_) => DecisionStatus::RequiresAttention,
        None => DecisionStatus::Pending,
    }
}

/// Turns each alternate group into a decision item whose options are the group members.
///
/// The item id is the group key; a saved answer may be stored under the key or any member.
pub fn extract_alternate_decisions(
    phases: &[Phase],
    store: &FlowConfigStore,
    answers: &AHashMap<String, String>,
) -> Vec<DecisionItem> {
    let index = NodeIndex::build(phases);
    store
        .alternate_groups_in(&index)
        .into_iter()
        .map(|group| {
            let location = index.get(&group.key);
            let member_name = |id: &str| {
                index
                    .get(id)
                    .map_or_else(|| id.to_string(), |loc| loc.name.clone())
            };
            let options: Vec<DecisionOption> = group
                .members
                .iter()
                .map(|member| DecisionOption::new(member.clone(), member_name(member.as_str())))
                .collect();
            let question = store
                .get_config(&group.key)
                .decision_prompt
                .clone()
                .unwrap_or_else(|| {
                    format!(
                        "Choose one: {}",
                        group.members.iter().map(|m| member_name(m.as_str())).join(" / ")
                    )
                });
            let selected = group.selection(answers).map(str::to_string);
            let status = if selected.is_some() {
                DecisionStatus::Answered
            } else {
                DecisionStatus::Pending
            };

            DecisionItem {
                id: group.key.clone(),
                source: DecisionSource::AlternateGroup,
                question,
                step_name: member_name(group.key.as_str()),
                phase_name: location.map(|l| l.phase_name.clone()).unwrap_or_default(),
                operation_name: location.and_then(|l| l.operation_name.clone()),
                stage: DecisionStage::Planning,
                options,
                selected_value: selected,
                status,
            }
        })
        .collect()
}

/// Records `value` for the item `id` and marks it answered.
///
/// Unknown ids leave the list unchanged so that stale UI state is tolerated.
pub fn apply_answer(items: &[DecisionItem], id: &str, value: &str) -> Vec<DecisionItem> {
    if !items.iter().any(|item| item.id == id) {
        tracing::debug!(id, "Ignoring answer for unknown decision");
    }
    items
        .iter()
        .map(|item| {
            if item.id == id {
                DecisionItem {
                    selected_value: Some(value.to_string()),
                    status: DecisionStatus::Answered,
                    ..item.clone()
                }
            } else {
                item.clone()
            }
        })
        .collect()
}
