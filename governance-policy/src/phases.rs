//! Inference phase model.

use std::collections::{BTreeMap, BTreeSet};

use governance_primitives::{
    GovernanceError, GovernanceResult, MemoryScope, ObjectReader, ReferenceKind, SideEffects,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// A named pipeline stage with its declared permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    name: String,
    allowed_agents: BTreeSet<String>,
    side_effects: SideEffects,
    memory_scope: MemoryScope,
}

impl Phase {
    fn from_entry(entry: &Value, position: usize) -> GovernanceResult<Self> {
        let reader = ObjectReader::new(entry, format!("Phase {position}"))?;
        let name = reader.required_str("name")?;
        let reader = reader.relabel(format!("Phase {name}"));

        Ok(Self {
            allowed_agents: reader.string_set("allowed_agents")?,
            side_effects: reader.term("side_effects")?,
            memory_scope: reader.term("memory_scope")?,
            name,
        })
    }

    /// Returns the phase name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the agents this phase admits.
    #[must_use]
    pub fn allowed_agents(&self) -> &BTreeSet<String> {
        &self.allowed_agents
    }

    /// Returns `true` when `agent` is listed in `allowed_agents`.
    #[must_use]
    pub fn admits(&self, agent: &str) -> bool {
        self.allowed_agents.contains(agent)
    }

    /// Returns the side-effect policy.
    #[must_use]
    pub fn side_effects(&self) -> SideEffects {
        self.side_effects
    }

    /// Returns the memory tier the phase may touch.
    #[must_use]
    pub fn memory_scope(&self) -> MemoryScope {
        self.memory_scope
    }
}

/// Validated phase registry plus the task classes that require reflection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhaseModel {
    phases: BTreeMap<String, Phase>,
    requires_reflection_for: BTreeSet<String>,
}

impl PhaseModel {
    /// Builds the model from a document with a `phases` list and an optional
    /// `requires_reflection_for` list.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed phase, citing its position or name and
    /// the offending field, and with [`GovernanceError::DuplicateName`] when
    /// two phases share a name.
    pub fn from_document(document: &Value, origin: &str) -> GovernanceResult<Self> {
        let location = format!("Phase model {origin}");
        let reader = ObjectReader::new(document, location.as_str())?;

        let mut phases = BTreeMap::new();
        for (index, entry) in reader.required_list("phases")?.iter().enumerate() {
            let phase = Phase::from_entry(entry, index + 1)?;
            if phases.contains_key(phase.name()) {
                return Err(GovernanceError::DuplicateName {
                    location,
                    kind: ReferenceKind::Phase,
                    name: phase.name,
                });
            }
            debug!(
                phase = phase.name(),
                side_effects = %phase.side_effects(),
                memory_scope = %phase.memory_scope(),
                "phase declared"
            );
            phases.insert(phase.name.clone(), phase);
        }

        let requires_reflection_for = match reader.get("requires_reflection_for") {
            None | Some(Value::Null) => BTreeSet::new(),
            Some(_) => reader.string_set("requires_reflection_for")?,
        };

        info!(
            phases = phases.len(),
            reflection_classes = requires_reflection_for.len(),
            "phase model built"
        );
        Ok(Self {
            phases,
            requires_reflection_for,
        })
    }

    /// Looks up a phase by name.
    #[must_use]
    pub fn phase(&self, name: &str) -> Option<&Phase> {
        self.phases.get(name)
    }

    /// Iterates over phases in name order.
    pub fn phases(&self) -> impl Iterator<Item = &Phase> {
        self.phases.values()
    }

    /// Returns the number of declared phases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Returns `true` when no phases are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Returns the task classes that carry a reflection obligation.
    #[must_use]
    pub fn reflection_task_classes(&self) -> &BTreeSet<String> {
        &self.requires_reflection_for
    }

    /// Returns `true` when `task_class` requires reflection evidence.
    #[must_use]
    pub fn requires_reflection(&self, task_class: &str) -> bool {
        self.requires_reflection_for.contains(task_class)
    }
}

#[cfg(test)]
mod tests {
    use governance_primitives::ErrorKind;
    use serde_json::json;

    use super::*;

    fn build(document: &Value) -> GovernanceResult<PhaseModel> {
        PhaseModel::from_document(document, "inference-phases.yaml")
    }

    #[test]
    fn builds_phases_and_reflection_classes() {
        let model = build(&json!({
            "phases": [
                {"name": "planning", "allowed_agents": ["planner"], "side_effects": "forbidden", "memory_scope": "draft"},
                {"name": "execution", "allowed_agents": ["worker", "worker"], "side_effects": "allowed", "memory_scope": "working"}
            ],
            "requires_reflection_for": ["migration", "security"]
        }))
        .unwrap();

        assert_eq!(model.len(), 2);
        let execution = model.phase("execution").unwrap();
        assert!(execution.admits("worker"));
        assert_eq!(execution.allowed_agents().len(), 1);
        assert_eq!(execution.memory_scope(), MemoryScope::Working);
        assert!(model.requires_reflection("migration"));
        assert!(!model.requires_reflection("codegen"));
        let names: Vec<_> = model.phases().map(Phase::name).collect();
        assert_eq!(names, ["execution", "planning"]);
    }

    #[test]
    fn reflection_classes_default_to_empty() {
        let model = build(&json!({"phases": []})).unwrap();
        assert!(model.is_empty());
        assert!(model.reflection_task_classes().is_empty());
    }

    #[test]
    fn missing_phases_list_is_field_error() {
        let err = build(&json!({"stages": []})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Field);
    }

    #[test]
    fn non_object_root_is_shape_error() {
        let err = build(&json!(["execution"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DocumentShape);
    }

    #[test]
    fn unnamed_phase_cites_position() {
        let err = build(&json!({"phases": [{"allowed_agents": []}]})).unwrap_err();
        assert_eq!(err.to_string(), "Phase 1 field `name` is required");
    }

    #[test]
    fn bad_memory_scope_cites_phase_name() {
        let err = build(&json!({
            "phases": [{"name": "review", "allowed_agents": [], "side_effects": "forbidden", "memory_scope": "global"}]
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EnumViolation);
        assert!(err.to_string().starts_with("Phase review field `memory_scope`"));
    }

    #[test]
    fn blank_allowed_agent_is_rejected() {
        let err = build(&json!({
            "phases": [{"name": "review", "allowed_agents": [" "], "side_effects": "forbidden", "memory_scope": "readonly"}]
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Field);
    }

    #[test]
    fn duplicate_phase_names_are_rejected() {
        let phase = json!({"name": "execution", "allowed_agents": [], "side_effects": "allowed", "memory_scope": "working"});
        let err = build(&json!({"phases": [phase.clone(), phase]})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
    }

    #[test]
    fn reflection_classes_must_be_a_list() {
        let err =
            build(&json!({"phases": [], "requires_reflection_for": "migration"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Field);
    }
}
