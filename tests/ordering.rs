//! Tests for canonical phase ordering.
mod common;
use common::*;
use flowcraft::prelude::*;

fn named(id: &str, name: &str) -> Phase {
    Phase::new(id, name)
}

#[test]
fn test_out_of_order_canonical_phases() {
    let phases = vec![
        named("p", "Planning"),
        named("k", "Kickoff"),
        named("c", "Close Project"),
    ];
    let ordered = enforce_standard_ordering(&phases);
    assert_eq!(phase_names(&ordered), vec!["Kickoff", "Planning", "Close Project"]);
}

#[test]
fn test_custom_phases_sit_between_ordering_and_close() {
    let phases = vec![
        named("c", "Close Project"),
        named("demo", "Demolition"),
        named("o", "Ordering"),
        named("tile", "Tile Floor"),
        named("k", "Kickoff"),
        named("p", "Planning"),
        named("paint", "Paint"),
    ];
    let ordered = enforce_standard_ordering(&phases);
    assert_eq!(
        phase_names(&ordered),
        vec![
            "Kickoff",
            "Planning",
            "Ordering",
            "Demolition",
            "Tile Floor",
            "Paint",
            "Close Project"
        ]
    );
}

#[test]
fn test_ordering_is_idempotent() {
    let mut phases = tile_project_phases();
    phases.reverse();
    phases.push(named("kickoff", "Extra"));

    let once = enforce_standard_ordering(&phases);
    let twice = enforce_standard_ordering(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_linked_phase_with_canonical_name_is_not_canonical() {
    let phases = vec![
        named("close", "Close Project"),
        named("planning-linked", "Planning").linked_from("proj-bath", "Bathroom remodel", 3),
        named("planning", "Planning"),
        named("kickoff", "Kickoff"),
    ];
    let report = PhaseOrdering::new(&EngineConfig::default()).enforce(&phases);

    let ids: Vec<&str> = report.phases.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["kickoff", "planning", "planning-linked", "close"]);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_repeated_canonical_phase_is_kept_as_custom() {
    let phases = vec![
        named("k1", "Kickoff"),
        named("custom", "Framing"),
        named("k2", "Kickoff"),
        named("c", "Close Project"),
    ];
    let report = PhaseOrdering::new(&EngineConfig::default()).enforce(&phases);

    let ids: Vec<&str> = report.phases.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["k1", "custom", "k2", "c"]);
    assert_eq!(
        report.warnings,
        vec![DataIntegrityWarning::DuplicateStandardPhase {
            phase_id: "k2".to_string(),
            name: "Kickoff".to_string(),
        }]
    );
}

#[test]
fn test_duplicate_ids_get_deterministic_replacements() {
    let phases = vec![
        named("tile", "Tile Floor"),
        named("tile", "Tile Walls"),
        named("tile-dup-1", "Grout Sealing"),
        named("tile", "Tile Backsplash"),
    ];
    let report = PhaseOrdering::new(&EngineConfig::default()).enforce(&phases);

    let ids: Vec<&str> = report.phases.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["tile", "tile-dup-2", "tile-dup-1", "tile-dup-3"]);
    assert_eq!(report.warnings.len(), 2);
    assert_eq!(
        report.warnings[0],
        DataIntegrityWarning::DuplicatePhaseId {
            original_id: "tile".to_string(),
            new_id: "tile-dup-2".to_string(),
            phase_name: "Tile Walls".to_string(),
        }
    );

    let again = PhaseOrdering::new(&EngineConfig::default()).enforce(&phases);
    assert_eq!(again, report);
}

#[test]
fn test_custom_standard_names_and_separator() {
    let config = EngineConfig::builder()
        .with_standard_phase_name(StandardPhase::CloseProject, "Wrap Up")
        .with_duplicate_id_separator("~")
        .build();
    let phases = vec![
        named("w", "Wrap Up"),
        named("x", "Close Project"),
        named("x", "Touch Up"),
        named("k", "Kickoff"),
    ];
    let report = PhaseOrdering::new(&config).enforce(&phases);

    let ids: Vec<&str> = report.phases.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["k", "x", "x~1", "w"]);
}

#[test]
fn test_missing_canonical_phases_are_omitted() {
    let phases = vec![named("demo", "Demolition"), named("o", "Ordering")];
    let ordered = enforce_standard_ordering(&phases);
    assert_eq!(phase_names(&ordered), vec!["Ordering", "Demolition"]);
    assert!(enforce_standard_ordering(&[]).is_empty());
}

#[test]
fn test_phase_contents_survive_reordering() {
    let mut phases = tile_project_phases();
    phases.rotate_left(2);
    let ordered = enforce_standard_ordering(&phases);

    assert_eq!(ordered, tile_project_phases());
}
