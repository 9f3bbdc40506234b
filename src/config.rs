use crate::error::SnapshotError;
use crate::ordering::StandardPhase;
use serde::{Deserialize, Serialize};
use std::fs;

/// Exact phase names that identify the four canonical phases.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct StandardPhaseNames {
    pub kickoff: String,
    pub planning: String,
    pub ordering: String,
    pub close_project: String,
}

impl Default for StandardPhaseNames {
    fn default() -> Self {
        Self {
            kickoff: "Kickoff".to_string(),
            planning: "Planning".to_string(),
            ordering: "Ordering".to_string(),
            close_project: "Close Project".to_string(),
        }
    }
}

impl StandardPhaseNames {
    pub fn name_of(&self, phase: StandardPhase) -> &str {
        match phase {
            StandardPhase::Kickoff => &self.kickoff,
            StandardPhase::Planning => &self.planning,
            StandardPhase::Ordering => &self.ordering,
            StandardPhase::CloseProject => &self.close_project,
        }
    }

    /// The canonical phase called `name`, if any.
    pub fn classify(&self, name: &str) -> Option<StandardPhase> {
        StandardPhase::ALL
            .into_iter()
            .find(|phase| self.name_of(*phase) == name)
    }

    fn set(&mut self, phase: StandardPhase, name: String) {
        match phase {
            StandardPhase::Kickoff => self.kickoff = name,
            StandardPhase::Planning => self.planning = name,
            StandardPhase::Ordering => self.ordering = name,
            StandardPhase::CloseProject => self.close_project = name,
        }
    }
}

/// Engine-wide settings shared by ordering, resolution and sessions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub standard_phases: StandardPhaseNames,
    /// Inserted between an id and a counter when a duplicate phase id is replaced.
    pub duplicate_id_separator: String,
    /// Whether an unanswered alternate group fails resolution.
    pub require_alternate_answers: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            standard_phases: StandardPhaseNames::default(),
            duplicate_id_separator: "-dup-".to_string(),
            require_alternate_answers: true,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &str) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn with_standard_phase_name(mut self, phase: StandardPhase, name: &str) -> Self {
        self.config.standard_phases.set(phase, name.to_string());
        self
    }

    pub fn with_duplicate_id_separator(mut self, separator: &str) -> Self {
        self.config.duplicate_id_separator = separator.to_string();
        self
    }

    /// Lets resolution keep every member of a group nobody chose from.
    pub fn allow_unanswered_alternates(mut self) -> Self {
        self.config.require_alternate_answers = false;
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}
