//! Canonical phase ordering.
//!
//! The four canonical phases always keep the relative order Kickoff, Planning, Ordering,
//! Close Project, and Close Project is always last. Every other phase (custom work or
//! phases incorporated from another project) is placed between Ordering and Close Project,
//! keeping the order it was given in.

use crate::config::EngineConfig;
use crate::error::DataIntegrityWarning;
use crate::model::Phase;
use ahash::AHashSet;
use std::fmt;

/// One of the four canonical phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardPhase {
    Kickoff,
    Planning,
    Ordering,
    CloseProject,
}

impl StandardPhase {
    pub const ALL: [StandardPhase; 4] = [
        StandardPhase::Kickoff,
        StandardPhase::Planning,
        StandardPhase::Ordering,
        StandardPhase::CloseProject,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StandardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandardPhase::Kickoff => f.write_str("Kickoff"),
            StandardPhase::Planning => f.write_str("Planning"),
            StandardPhase::Ordering => f.write_str("Ordering"),
            StandardPhase::CloseProject => f.write_str("Close Project"),
        }
    }
}

/// The reordered phases together with the repairs that were needed to produce them.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingReport {
    pub phases: Vec<Phase>,
    pub warnings: Vec<DataIntegrityWarning>,
}

/// Reorders phase lists according to the canonical-phase rule.
pub struct PhaseOrdering<'a> {
    config: &'a EngineConfig,
}

impl<'a> PhaseOrdering<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Produces `[kickoff, planning, ordering, ...others, close_project]`.
    ///
    /// Canonical phases are matched by exact name and must not be linked; absent ones are
    /// simply omitted. Duplicate phase ids are replaced before reassembly, the later
    /// occurrence receiving the new id. The result is stable under repeated application.
    pub fn enforce(&self, phases: &[Phase]) -> OrderingReport {
        let mut warnings = Vec::new();
        let repaired = self.repair_duplicate_ids(phases, &mut warnings);

        let mut canonical: [Option<Phase>; 4] = [None, None, None, None];
        let mut others = Vec::new();

        for phase in repaired {
            let standard = if phase.is_linked {
                None
            } else {
                self.config.standard_phases.classify(&phase.name)
            };
            match standard {
                Some(kind) if canonical[kind.slot()].is_none() => {
                    canonical[kind.slot()] = Some(phase);
                }
                Some(kind) => {
                    let warning = DataIntegrityWarning::DuplicateStandardPhase {
                        phase_id: phase.id.clone(),
                        name: kind.to_string(),
                    };
                    tracing::warn!(%warning, "Repeated standard phase");
                    warnings.push(warning);
                    others.push(phase);
                }
                None => others.push(phase),
            }
        }

        let [kickoff, planning, ordering, close_project] = canonical;
        let phases = kickoff
            .into_iter()
            .chain(planning)
            .chain(ordering)
            .chain(others)
            .chain(close_project)
            .collect();

        OrderingReport { phases, warnings }
    }

    fn repair_duplicate_ids(
        &self,
        phases: &[Phase],
        warnings: &mut Vec<DataIntegrityWarning>,
    ) -> Vec<Phase> {
        let mut taken: AHashSet<String> = phases.iter().map(|p| p.id.clone()).collect();
        let mut seen: AHashSet<String> = AHashSet::with_capacity(phases.len());
        let mut repaired = Vec::with_capacity(phases.len());

        for phase in phases {
            let mut phase = phase.clone();
            if !seen.insert(phase.id.clone()) {
                let new_id = self.fresh_id(&phase.id, &taken);
                let warning = DataIntegrityWarning::DuplicatePhaseId {
                    original_id: phase.id.clone(),
                    new_id: new_id.clone(),
                    phase_name: phase.name.clone(),
                };
                tracing::warn!(%warning, "Duplicate phase id");
                warnings.push(warning);
                taken.insert(new_id.clone());
                seen.insert(new_id.clone());
                phase.id = new_id;
            }
            repaired.push(phase);
        }
        repaired
    }

    fn fresh_id(&self, id: &str, taken: &AHashSet<String>) -> String {
        (1usize..)
            .map(|n| format!("{}{}{}", id, self.config.duplicate_id_separator, n))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_else(|| id.to_string())
    }
}

/// Applies the canonical ordering with the default engine configuration.
///
/// Repairs are logged; use [`PhaseOrdering::enforce`] to receive them as values.
pub fn enforce_standard_ordering(phases: &[Phase]) -> Vec<Phase> {
    let config = EngineConfig::default();
    PhaseOrdering::new(&config).enforce(phases).phases
}
