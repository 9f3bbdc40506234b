//! Common test fixtures: a small tiling project and its flow annotations.
use flowcraft::prelude::*;

#[allow(dead_code)]
pub fn step(id: &str) -> WorkflowStep {
    WorkflowStep::new(id, format!("Step {}", id))
}

#[allow(dead_code)]
pub fn operation(id: &str, steps: Vec<WorkflowStep>) -> Operation {
    Operation::new(id, format!("Operation {}", id)).with_steps(steps)
}

#[allow(dead_code)]
pub fn phase(id: &str, name: &str, operations: Vec<Operation>) -> Phase {
    Phase::new(id, name).with_operations(operations)
}

/// The "Subfloor condition?" decision: `good` goes straight to priming, `bad` levels first.
#[allow(dead_code)]
pub fn subfloor_decision() -> DecisionPoint {
    DecisionPoint::new("Subfloor condition?", DecisionStage::Planning)
        .with_option(DecisionOption::new("good", "Sound and flat").leading_to("s-prime"))
        .with_option(
            DecisionOption::new("bad", "Uneven")
                .leading_to("s-level")
                .or_else("s-prime"),
        )
}

/// A tiling project with all four canonical phases plus one custom phase.
///
/// Tile Floor holds three setting methods (thinset, mastic, epoxy), an optional heat mat,
/// a thermostat that only makes sense with the heat mat, and grouting.
#[allow(dead_code)]
pub fn tile_project_phases() -> Vec<Phase> {
    vec![
        phase("kickoff", "Kickoff", vec![operation("kickoff-op", vec![step("k1")])]).standard(),
        phase(
            "planning",
            "Planning",
            vec![operation(
                "plan-subfloor",
                vec![
                    step("s-inspect").with_decision(subfloor_decision()),
                    step("s-level").then("s-prime"),
                    step("s-prime"),
                ],
            )],
        )
        .standard(),
        phase("ordering", "Ordering", vec![operation("order-materials", vec![step("o1")])]).standard(),
        phase(
            "tile",
            "Tile Floor",
            vec![
                operation("op-thinset", vec![step("t1").then("t2"), step("t2").then("g1")]),
                operation("op-mastic", vec![step("m1").then("g1")]),
                operation("op-epoxy", vec![step("e1").then("g1")]),
                operation("op-heat", vec![step("h1")]),
                operation("op-thermostat", vec![step("th1")]),
                operation("op-grout", vec![step("g1")]),
            ],
        ),
        phase("close", "Close Project", vec![operation("close-op", vec![step("c1")])]).standard(),
    ]
}

#[allow(dead_code)]
pub fn tile_project() -> Project {
    Project {
        id: "proj-tile".to_string(),
        name: "Tile a bathroom floor".to_string(),
        description: String::new(),
        phases: tile_project_phases(),
    }
}

/// Thinset, mastic and epoxy are mutually alternate; the heat mat is optional and the
/// thermostat depends on it.
#[allow(dead_code)]
pub fn tile_flows() -> FlowConfigStore {
    let mut flows = FlowConfigStore::new();
    flows.add_alternate("op-thinset", "op-mastic").unwrap();
    flows.add_alternate("op-mastic", "op-epoxy").unwrap();
    flows.add_alternate("op-thinset", "op-epoxy").unwrap();
    flows.set_config(
        "op-thinset",
        FlowConfigPatch::default().with_prompt("How will the tile be set?"),
    ).unwrap();
    flows.set_config("op-heat", FlowConfigPatch::flow_type(FlowType::IfNecessary)).unwrap();
    flows.set_dependent("op-thermostat", "op-heat").unwrap();
    flows
}

#[allow(dead_code)]
pub fn phase_names(phases: &[Phase]) -> Vec<String> {
    phases.iter().map(|p| p.name.clone()).collect()
}

#[allow(dead_code)]
pub fn operation_ids(phases: &[Phase], phase_id: &str) -> Vec<String> {
    phases
        .iter()
        .find(|p| p.id == phase_id)
        .map(|p| p.operations.iter().map(|o| o.id.clone()).collect())
        .unwrap_or_default()
}

#[allow(dead_code)]
pub fn find_step<'a>(phases: &'a [Phase], step_id: &str) -> Option<&'a WorkflowStep> {
    phases
        .iter()
        .flat_map(|p| p.operations.iter())
        .flat_map(|o| o.steps.iter())
        .find(|s| s.id == step_id)
}
