//! Tests for decision extraction, answering and rollup.
mod common;
use ahash::AHashMap;
use common::*;
use flowcraft::prelude::*;

fn answers(pairs: &[(&str, &str)]) -> AHashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_extracts_step_decisions_with_context() {
    let items = extract_decisions(&tile_project_phases());

    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.id, "s-inspect");
    assert_eq!(item.source, DecisionSource::Step);
    assert_eq!(item.question, "Subfloor condition?");
    assert_eq!(item.step_name, "Step s-inspect");
    assert_eq!(item.phase_name, "Planning");
    assert_eq!(item.operation_name.as_deref(), Some("Operation plan-subfloor"));
    assert_eq!(item.stage, DecisionStage::Planning);
    assert_eq!(item.options.len(), 2);
    assert_eq!(item.selected_value, None);
    assert_eq!(item.status, DecisionStatus::Pending);
}

#[test]
fn test_decisions_come_out_in_document_order() {
    let ask = |q: &str| {
        DecisionPoint::new(q, DecisionStage::Execution).with_option(DecisionOption::new("yes", "Yes"))
    };
    let phases = vec![
        phase("p1", "First", vec![operation("o1", vec![step("a").with_decision(ask("A?"))])]),
        phase(
            "p2",
            "Second",
            vec![
                operation("o2", vec![step("b"), step("c").with_decision(ask("C?"))]),
                operation("o3", vec![step("d").with_decision(ask("D?"))]),
            ],
        ),
    ];
    let ids: Vec<String> = extract_decisions(&phases).into_iter().map(|i| i.id).collect();
    assert_eq!(ids, vec!["a", "c", "d"]);
}

#[test]
fn test_unflagged_decision_point_is_ignored() {
    let mut inspect = step("s1").with_decision(subfloor_decision());
    inspect.is_decision_point = false;
    let phases = vec![phase("p", "Custom", vec![operation("o", vec![inspect])])];
    assert!(extract_decisions(&phases).is_empty());
}

#[test]
fn test_broken_decisions_require_attention() {
    let no_options = DecisionPoint::new("Anything?", DecisionStage::Planning);
    let broken_route = DecisionPoint::new("Where to?", DecisionStage::Planning)
        .with_option(DecisionOption::new("away", "Away").leading_to("deleted-step"));
    let phases = vec![phase(
        "p",
        "Custom",
        vec![operation(
            "o",
            vec![
                step("empty").with_decision(no_options),
                step("broken").with_decision(broken_route),
            ],
        )],
    )];

    let items = extract_decisions(&phases);
    assert!(items.iter().all(|i| i.status == DecisionStatus::RequiresAttention));
    assert_eq!(pending_count(&items), 0);
}

#[test]
fn test_option_routing_to_an_operation_is_a_valid_route() {
    let to_operation = DecisionPoint::new("Skip ahead?", DecisionStage::Planning)
        .with_option(DecisionOption::new("yes", "Yes").leading_to("op2"))
        .with_option(DecisionOption::new("no", "No").leading_to("s2"));
    let phases = vec![phase(
        "p",
        "Custom",
        vec![
            operation("op1", vec![step("s1").with_decision(to_operation), step("s2")]),
            operation("op2", vec![step("s3")]),
        ],
    )];

    let items = extract_decisions(&phases);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status, DecisionStatus::Pending);
    assert_eq!(pending_count(&items), 1);
}

#[test]
fn test_saved_answers_seed_status() {
    let phases = tile_project_phases();

    let answered = extract_decisions_with_answers(&phases, &answers(&[("s-inspect", "bad")]));
    assert_eq!(answered[0].status, DecisionStatus::Answered);
    assert_eq!(answered[0].selected_value.as_deref(), Some("bad"));

    let stale = extract_decisions_with_answers(&phases, &answers(&[("s-inspect", "rotten")]));
    assert_eq!(stale[0].status, DecisionStatus::RequiresAttention);
    assert_eq!(stale[0].selected_value.as_deref(), Some("rotten"));
}

#[test]
fn test_apply_answer_is_pure_and_tolerates_unknown_ids() {
    let items = extract_decisions(&tile_project_phases());

    let updated = apply_answer(&items, "s-inspect", "good");
    assert_eq!(items[0].status, DecisionStatus::Pending);
    assert_eq!(updated[0].status, DecisionStatus::Answered);
    assert_eq!(updated[0].selected_value.as_deref(), Some("good"));

    let unchanged = apply_answer(&items, "no-such-step", "good");
    assert_eq!(unchanged, items);
}

#[test]
fn test_counts_and_rollup() {
    let phases = tile_project_phases();
    let mut items = extract_decisions(&phases);
    items.extend(extract_alternate_decisions(&phases, &tile_flows(), &AHashMap::new()));
    assert_eq!(pending_count(&items), 2);
    assert_eq!(answered_count(&items), 0);

    let items = apply_answer(&items, "op-thinset", "op-mastic");
    let rollup = DecisionRollup::from_items(&items);
    assert_eq!(
        rollup,
        DecisionRollup {
            total: 2,
            pending: 1,
            answered: 1,
            requires_attention: 0,
        }
    );
    assert!(!rollup.can_finalize(ResolutionMode::InitialPlan));
    assert!(rollup.can_finalize(ResolutionMode::FinalPlan));
    assert!(rollup.can_finalize(ResolutionMode::Replan));
    assert!(rollup.can_finalize(ResolutionMode::UnplannedWork));

    let items = apply_answer(&items, "s-inspect", "good");
    assert!(DecisionRollup::from_items(&items).can_finalize(ResolutionMode::InitialPlan));
}

#[test]
fn test_alternate_group_becomes_a_decision() {
    let phases = tile_project_phases();
    let items = extract_alternate_decisions(&phases, &tile_flows(), &AHashMap::new());

    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.id, "op-thinset");
    assert_eq!(item.source, DecisionSource::AlternateGroup);
    assert_eq!(item.question, "How will the tile be set?");
    assert_eq!(item.phase_name, "Tile Floor");
    assert_eq!(item.stage, DecisionStage::Planning);
    assert!(item.is_pending());

    let values: Vec<&str> = item.options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["op-thinset", "op-mastic", "op-epoxy"]);
    assert_eq!(item.options[1].label, "Operation op-mastic");
}

#[test]
fn test_alternate_question_defaults_to_member_names() {
    let phases = vec![phase(
        "p",
        "Custom",
        vec![
            Operation::new("roll", "Roller"),
            Operation::new("spray", "Sprayer"),
        ],
    )];
    let mut flows = FlowConfigStore::new();
    flows.add_alternate("spray", "roll").unwrap();

    let items = extract_alternate_decisions(&phases, &flows, &AHashMap::new());
    assert_eq!(items[0].id, "roll");
    assert_eq!(items[0].question, "Choose one: Roller / Sprayer");
}

#[test]
fn test_alternate_answer_under_member_id_is_recognized() {
    let phases = tile_project_phases();
    let saved = answers(&[("op-epoxy", "op-epoxy")]);
    let items = extract_alternate_decisions(&phases, &tile_flows(), &saved);

    assert!(items[0].is_answered());
    assert_eq!(items[0].selected_value.as_deref(), Some("op-epoxy"));

    // A value naming a node outside the group does not count as a choice.
    let foreign = answers(&[("op-thinset", "op-grout")]);
    let items = extract_alternate_decisions(&phases, &tile_flows(), &foreign);
    assert!(items[0].is_pending());
}
