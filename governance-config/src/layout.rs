//! Hub layout: where every governance document lives.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Phase model, relative to the hub root.
pub const PHASE_MODEL_PATH: &str = "governance/inference-phases.yaml";
/// Agent registry, relative to the hub root.
pub const AGENT_REGISTRY_PATH: &str = "AGENTS.md";
/// Synchronization contract directory, relative to the hub root.
pub const SYNCHRONIZATIONS_DIR: &str = "synchronizations";
/// Memory record directory, relative to the hub root.
pub const MEMORY_RECORDS_DIR: &str = "memory/records";
/// Memory record schema, relative to the hub root.
pub const MEMORY_SCHEMA_PATH: &str = "schemas/memory-record.schema.json";
/// Observability event stream, relative to the hub root.
pub const EVENTS_PATH: &str = "logs/events.jsonl";
/// Observability event schema, relative to the hub root.
pub const EVENTS_SCHEMA_PATH: &str = "schemas/observability-event.schema.json";

/// Resolved locations of every document a governance run reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubLayout {
    root: PathBuf,
    phase_model: PathBuf,
    agent_registry: PathBuf,
    synchronizations: PathBuf,
    memory_records: PathBuf,
    memory_schema: PathBuf,
    events: PathBuf,
    events_schema: PathBuf,
}

impl HubLayout {
    /// Resolves the conventional hub tree under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            phase_model: root.join(PHASE_MODEL_PATH),
            agent_registry: root.join(AGENT_REGISTRY_PATH),
            synchronizations: root.join(SYNCHRONIZATIONS_DIR),
            memory_records: root.join(MEMORY_RECORDS_DIR),
            memory_schema: root.join(MEMORY_SCHEMA_PATH),
            events: root.join(EVENTS_PATH),
            events_schema: root.join(EVENTS_SCHEMA_PATH),
            root,
        }
    }

    /// Overrides the phase model path.
    #[must_use]
    pub fn with_phase_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.phase_model = path.into();
        self
    }

    /// Overrides the agent registry path.
    #[must_use]
    pub fn with_agent_registry(mut self, path: impl Into<PathBuf>) -> Self {
        self.agent_registry = path.into();
        self
    }

    /// Overrides the synchronization directory.
    #[must_use]
    pub fn with_synchronizations(mut self, path: impl Into<PathBuf>) -> Self {
        self.synchronizations = path.into();
        self
    }

    /// Overrides the memory record directory and its schema.
    #[must_use]
    pub fn with_memory(mut self, records: impl Into<PathBuf>, schema: impl Into<PathBuf>) -> Self {
        self.memory_records = records.into();
        self.memory_schema = schema.into();
        self
    }

    /// Overrides the observability event stream.
    #[must_use]
    pub fn with_events(mut self, path: impl Into<PathBuf>) -> Self {
        self.events = path.into();
        self
    }

    /// Overrides the observability event schema.
    #[must_use]
    pub fn with_events_schema(mut self, path: impl Into<PathBuf>) -> Self {
        self.events_schema = path.into();
        self
    }

    /// Hub root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Phase model document.
    #[must_use]
    pub fn phase_model(&self) -> &Path {
        &self.phase_model
    }

    /// Agent registry document.
    #[must_use]
    pub fn agent_registry(&self) -> &Path {
        &self.agent_registry
    }

    /// Synchronization contract directory.
    #[must_use]
    pub fn synchronizations(&self) -> &Path {
        &self.synchronizations
    }

    /// Memory record directory.
    #[must_use]
    pub fn memory_records(&self) -> &Path {
        &self.memory_records
    }

    /// Memory record schema.
    #[must_use]
    pub fn memory_schema(&self) -> &Path {
        &self.memory_schema
    }

    /// Observability event stream.
    #[must_use]
    pub fn events(&self) -> &Path {
        &self.events
    }

    /// Observability event schema.
    #[must_use]
    pub fn events_schema(&self) -> &Path {
        &self.events_schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_conventional_tree() {
        let layout = HubLayout::new("/hub");
        assert_eq!(
            layout.phase_model(),
            Path::new("/hub/governance/inference-phases.yaml")
        );
        assert_eq!(layout.agent_registry(), Path::new("/hub/AGENTS.md"));
        assert_eq!(layout.events(), Path::new("/hub/logs/events.jsonl"));
    }

    #[test]
    fn every_path_can_be_overridden() {
        let layout = HubLayout::new("/hub")
            .with_phase_model("/etc/ceres/phases.json")
            .with_agent_registry("/etc/ceres/agents.yaml")
            .with_synchronizations("/etc/ceres/sync")
            .with_memory("/var/ceres/records", "/etc/ceres/record.schema.json")
            .with_events_schema("/etc/ceres/event.schema.json");

        assert_eq!(layout.phase_model(), Path::new("/etc/ceres/phases.json"));
        assert_eq!(layout.agent_registry(), Path::new("/etc/ceres/agents.yaml"));
        assert_eq!(layout.synchronizations(), Path::new("/etc/ceres/sync"));
        assert_eq!(layout.memory_records(), Path::new("/var/ceres/records"));
        assert_eq!(layout.memory_schema(), Path::new("/etc/ceres/record.schema.json"));
        assert_eq!(layout.events_schema(), Path::new("/etc/ceres/event.schema.json"));
        assert_eq!(layout.events(), Path::new("/hub/logs/events.jsonl"));
        assert_eq!(layout.root(), Path::new("/hub"));
    }

    #[test]
    fn event_override_leaves_schema_in_place() {
        let layout = HubLayout::new("/hub").with_events("/tmp/run.jsonl");
        assert_eq!(layout.events(), Path::new("/tmp/run.jsonl"));
        assert_eq!(
            layout.events_schema(),
            Path::new("/hub/schemas/observability-event.schema.json")
        );
    }
}
