//! Agent registry and the global pattern catalog.

use std::collections::{BTreeMap, BTreeSet};

use governance_primitives::{
    GovernanceError, GovernanceResult, ObjectReader, ReferenceKind, SideEffects, kind_of,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Set of pattern identifiers agents may claim to support.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PatternCatalog(BTreeSet<String>);

impl PatternCatalog {
    /// Creates a catalog from pattern identifiers.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(patterns.into_iter().map(Into::into).collect())
    }

    /// Returns `true` when `pattern` is declared.
    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }

    /// Returns the number of declared patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over patterns in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// A named actor and the phases and patterns it is declared for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Agent {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    supports_patterns: BTreeSet<String>,
    allowed_phases: BTreeSet<String>,
    side_effects: SideEffects,
}

impl Agent {
    /// Validates one agent entry against an explicit pattern catalog.
    ///
    /// # Errors
    ///
    /// Returns field and vocabulary errors for malformed entries, and
    /// [`GovernanceError::CrossReference`] for a supported pattern missing
    /// from `catalog`.
    pub fn from_entry(
        entry: &Value,
        position: usize,
        catalog: &PatternCatalog,
    ) -> GovernanceResult<Self> {
        let reader = ObjectReader::new(entry, format!("Agent {position}"))?;
        let name = reader.required_str("name")?;
        let reader = reader.relabel(format!("Agent {name}"));

        let supports_patterns = reader.string_set("supports_patterns")?;
        if let Some(unknown) = supports_patterns.iter().find(|p| !catalog.contains(p.as_str())) {
            return Err(GovernanceError::cross_reference(
                ReferenceKind::Pattern,
                unknown.as_str(),
                format!("pattern catalog (agent `{name}` supports_patterns)"),
            ));
        }

        let role = match reader.get("role") {
            None | Some(Value::Null) => None,
            Some(Value::String(role)) => Some(role.trim().to_owned()),
            Some(other) => {
                return Err(reader.field_error(
                    "role",
                    format!("must be a string, got {}", kind_of(other)),
                ));
            }
        };

        Ok(Self {
            role,
            supports_patterns,
            allowed_phases: reader.string_set("allowed_phases")?,
            side_effects: reader.term("side_effects")?,
            name,
        })
    }

    /// Returns the agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the free-form role description.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Returns the patterns the agent supports.
    #[must_use]
    pub fn supports_patterns(&self) -> &BTreeSet<String> {
        &self.supports_patterns
    }

    /// Returns `true` when the agent supports `pattern`.
    #[must_use]
    pub fn supports(&self, pattern: &str) -> bool {
        self.supports_patterns.contains(pattern)
    }

    /// Returns the phases the agent declares itself for.
    #[must_use]
    pub fn allowed_phases(&self) -> &BTreeSet<String> {
        &self.allowed_phases
    }

    /// Returns `true` when `phase` is listed in `allowed_phases`.
    #[must_use]
    pub fn may_enter(&self, phase: &str) -> bool {
        self.allowed_phases.contains(phase)
    }

    /// Returns the side-effect policy.
    #[must_use]
    pub fn side_effects(&self) -> SideEffects {
        self.side_effects
    }
}

/// Validated agents keyed by name, with the catalog they were checked against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentRegistry {
    patterns: PatternCatalog,
    agents: BTreeMap<String, Agent>,
}

impl AgentRegistry {
    /// Builds the registry from a document with `patterns` and `agents` lists.
    ///
    /// The pattern catalog is parsed first and handed to every agent entry.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed agent or unknown pattern, and with
    /// [`GovernanceError::DuplicateName`] when two agents share a name.
    pub fn from_document(document: &Value, origin: &str) -> GovernanceResult<Self> {
        let location = format!("Agent registry {origin}");
        let reader = ObjectReader::new(document, location.as_str())?;
        let patterns = PatternCatalog(reader.string_set("patterns")?);

        let mut agents = BTreeMap::new();
        for (index, entry) in reader.required_list("agents")?.iter().enumerate() {
            let agent = Agent::from_entry(entry, index + 1, &patterns)?;
            if agents.contains_key(agent.name()) {
                return Err(GovernanceError::DuplicateName {
                    location,
                    kind: ReferenceKind::Agent,
                    name: agent.name,
                });
            }
            debug!(
                agent = agent.name(),
                patterns = agent.supports_patterns().len(),
                phases = agent.allowed_phases().len(),
                "agent declared"
            );
            agents.insert(agent.name.clone(), agent);
        }

        info!(
            agents = agents.len(),
            patterns = patterns.len(),
            "agent registry built"
        );
        Ok(Self { patterns, agents })
    }

    /// Looks up an agent by name.
    #[must_use]
    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.get(name)
    }

    /// Iterates over agents in name order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Returns the pattern catalog.
    #[must_use]
    pub fn patterns(&self) -> &PatternCatalog {
        &self.patterns
    }

    /// Returns the number of registered agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Returns `true` when no agents are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use governance_primitives::ErrorKind;
    use serde_json::json;

    use super::*;

    fn build(document: &Value) -> GovernanceResult<AgentRegistry> {
        AgentRegistry::from_document(document, "AGENTS.md")
    }

    #[test]
    fn builds_registry() {
        let registry = build(&json!({
            "patterns": ["batch", "stream"],
            "agents": [{
                "name": "worker",
                "role": "Executes approved plans",
                "supports_patterns": ["batch"],
                "allowed_phases": ["execution"],
                "side_effects": "allowed"
            }]
        }))
        .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.patterns().len(), 2);
        let worker = registry.agent("worker").unwrap();
        assert_eq!(worker.role(), Some("Executes approved plans"));
        assert!(worker.supports("batch"));
        assert!(!worker.supports("stream"));
        assert!(worker.may_enter("execution"));
        let names: Vec<_> = registry.agents().map(Agent::name).collect();
        assert_eq!(names, ["worker"]);
    }

    #[test]
    fn unknown_pattern_is_cross_reference() {
        let err = build(&json!({
            "patterns": ["batch"],
            "agents": [{
                "name": "worker",
                "supports_patterns": ["stream"],
                "allowed_phases": [],
                "side_effects": "allowed"
            }]
        }))
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CrossReference);
        assert_eq!(
            err.to_string(),
            "pattern `stream` not found in pattern catalog (agent `worker` supports_patterns)"
        );
    }

    #[test]
    fn catalog_is_explicit_input() {
        let catalog = PatternCatalog::new(["batch"]);
        let entry = json!({
            "name": "reviewer",
            "supports_patterns": ["batch"],
            "allowed_phases": ["review"],
            "side_effects": "forbidden"
        });

        let agent = Agent::from_entry(&entry, 1, &catalog).unwrap();
        assert_eq!(agent.side_effects(), SideEffects::Forbidden);
        assert!(Agent::from_entry(&entry, 1, &PatternCatalog::default()).is_err());
    }

    #[test]
    fn missing_pattern_catalog_is_field_error() {
        let err = build(&json!({"agents": []})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Field);
    }

    #[test]
    fn non_string_role_is_rejected() {
        let err = build(&json!({
            "patterns": [],
            "agents": [{
                "name": "worker",
                "role": 3,
                "supports_patterns": [],
                "allowed_phases": [],
                "side_effects": "allowed"
            }]
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Field);
    }

    #[test]
    fn duplicate_agent_names_are_rejected() {
        let agent = json!({
            "name": "worker",
            "supports_patterns": [],
            "allowed_phases": [],
            "side_effects": "allowed"
        });
        let err = build(&json!({"patterns": [], "agents": [agent.clone(), agent]})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
    }
}
