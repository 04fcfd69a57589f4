//! Governance contract validation for CERES agent hubs.
//!
//! Depend on this crate to run the whole check in one call: load the hub with
//! [`config::load_hub`] and hand the sources to [`Governance::evaluate`]. The
//! pipeline stops at the first violation, in this order:
//!
//! 1. phase model
//! 2. agent registry
//! 3. authorization, when both a phase and an agent are supplied
//! 4. synchronization contracts
//! 5. memory records
//! 6. observability events
//! 7. reflection obligation

#![warn(missing_docs, clippy::pedantic)]

use governance_config::{DocumentFormat, DocumentParser, HubLayout, HubSources, load_hub};
use governance_policy::{
    AgentRegistry, AuthorizationRequest, Authorizer, GovernanceReport, PhaseModel, ReflectionCheck,
    RegistryAuthorizer, validate_synchronizations,
};
use governance_primitives::{GovernanceResult, SourceDocument};
use governance_records::{EventStream, RecordSchema, validate_memory_records};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Re-export shared primitives for convenience.
pub use governance_primitives as primitives;

/// Record schemas, memory records and event streams.
pub use governance_records as records;

/// Phase model, agent registry, authorization and reflection.
pub use governance_policy as policy;

/// Hub layout, parsing and loading.
pub use governance_config as config;

/// Diagnostic tracing (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use governance_telemetry as telemetry;

pub use governance_primitives::{ErrorKind, GovernanceError};

/// Per-run inputs supplied by the caller. Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    task_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    task_id: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl Invocation {
    /// Creates an invocation with no inputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the active phase.
    #[must_use]
    pub fn with_phase(mut self, phase: impl Into<Option<String>>) -> Self {
        self.phase = present(phase.into());
        self
    }

    /// Sets the agent requesting authorization.
    #[must_use]
    pub fn with_agent(mut self, agent: impl Into<Option<String>>) -> Self {
        self.agent = present(agent.into());
        self
    }

    /// Sets the pattern the agent intends to run.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<Option<String>>) -> Self {
        self.pattern = present(pattern.into());
        self
    }

    /// Sets the task class used for the reflection obligation.
    #[must_use]
    pub fn with_task_class(mut self, task_class: impl Into<Option<String>>) -> Self {
        self.task_class = present(task_class.into());
        self
    }

    /// Sets the task the reflection evidence must reference.
    #[must_use]
    pub fn with_task_id(mut self, task_id: impl Into<Option<String>>) -> Self {
        self.task_id = present(task_id.into());
        self
    }

    /// Returns the active phase.
    #[must_use]
    pub fn phase(&self) -> Option<&str> {
        self.phase.as_deref()
    }

    /// Returns the requesting agent.
    #[must_use]
    pub fn agent(&self) -> Option<&str> {
        self.agent.as_deref()
    }

    /// Returns the requested pattern.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Returns the task class.
    #[must_use]
    pub fn task_class(&self) -> Option<&str> {
        self.task_class.as_deref()
    }

    /// Returns the task identifier.
    #[must_use]
    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    /// Builds the authorization request; only produced when both a phase and
    /// an agent are present.
    #[must_use]
    pub fn authorization_request(&self) -> Option<AuthorizationRequest> {
        let request = AuthorizationRequest::new(self.phase.clone()?, self.agent.clone()?);
        Some(match &self.pattern {
            Some(pattern) => request.with_pattern(pattern.clone()),
            None => request,
        })
    }
}

/// Runs the governance pipeline over documents already in memory.
#[derive(Debug, Clone, Copy)]
pub struct Governance<'a> {
    sources: &'a HubSources,
}

impl<'a> Governance<'a> {
    /// Wraps the loaded hub documents.
    #[must_use]
    pub fn new(sources: &'a HubSources) -> Self {
        Self { sources }
    }

    /// Validates every contract and returns what was checked.
    ///
    /// The run has no side effects; evaluating the same sources and
    /// invocation twice yields the same outcome.
    ///
    /// # Errors
    ///
    /// Returns the first [`GovernanceError`] the pipeline hits.
    pub fn evaluate(&self, invocation: &Invocation) -> GovernanceResult<GovernanceReport> {
        let phase_doc = self.sources.phase_model();
        let phases = PhaseModel::from_document(&parse_detected(phase_doc)?, phase_doc.origin())?;
        info!(phases = phases.len(), "phase model validated");

        let agent_doc = self.sources.agent_registry();
        let agents = AgentRegistry::from_document(&parse_detected(agent_doc)?, agent_doc.origin())?;
        info!(
            agents = agents.len(),
            patterns = agents.patterns().len(),
            "agent registry validated"
        );

        let grant = match invocation.authorization_request() {
            Some(request) => Some(RegistryAuthorizer::new(&phases, &agents).authorize(&request)?),
            None => {
                debug!("phase or agent absent; authorization skipped");
                None
            }
        };

        let contracts = validate_synchronizations(self.sources.synchronizations(), parse_detected)?;

        let memory_records = match self.sources.memory() {
            Some(memory) => {
                let schema = load_schema(memory.schema(), "Memory record schema")?;
                let count = validate_memory_records(&schema, memory.records())?;
                info!(records = count, "memory records validated");
                Some(count)
            }
            None => None,
        };

        let events = match self.sources.events() {
            Some(events) => {
                let schema = load_schema(events.schema(), "Observability event schema")?;
                let count = EventStream::new(events.stream()).validate(&schema)?;
                info!(events = count, "observability events validated");
                Some(count)
            }
            None => None,
        };

        let reflection = ReflectionCheck::new(invocation.task_class(), invocation.phase())
            .with_task_id(invocation.task_id())
            .enforce(
                &phases,
                self.sources.events().map(|events| EventStream::new(events.stream())),
            )?;

        Ok(GovernanceReport::new(phases.len(), agents.len(), agents.patterns().len())
            .with_authorization(grant)
            .with_synchronizations(contracts.len())
            .with_memory_records(memory_records)
            .with_events(events)
            .with_reflection(reflection))
    }
}

/// Loads the hub at `layout` and evaluates it.
///
/// # Errors
///
/// Returns [`GovernanceError::Io`] when a document cannot be read, otherwise
/// the first violation reported by [`Governance::evaluate`].
pub fn govern(layout: &HubLayout, invocation: &Invocation) -> GovernanceResult<GovernanceReport> {
    let sources = load_hub(layout)?;
    Governance::new(&sources).evaluate(invocation)
}

fn parse_detected(document: &SourceDocument) -> GovernanceResult<Value> {
    DocumentFormat::detect(document.origin()).parse(document)
}

fn load_schema(document: &SourceDocument, label: &str) -> GovernanceResult<RecordSchema> {
    let value = DocumentFormat::Json.parse(document)?;
    RecordSchema::from_document(&value, &format!("{label} {}", document.origin()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_inputs_count_as_absent() {
        let invocation = Invocation::new()
            .with_phase(Some("execution".to_owned()))
            .with_agent(Some("  ".to_owned()))
            .with_pattern(Some(String::new()));
        assert_eq!(invocation.agent(), None);
        assert_eq!(invocation.pattern(), None);
        assert!(invocation.authorization_request().is_none());
    }

    #[test]
    fn authorization_request_needs_phase_and_agent() {
        let invocation = Invocation::new()
            .with_phase(Some("execution".to_owned()))
            .with_agent(Some("worker".to_owned()))
            .with_pattern(Some("batch".to_owned()));
        let request = invocation.authorization_request().unwrap();
        assert_eq!(request.phase(), "execution");
        assert_eq!(request.agent(), "worker");
        assert_eq!(request.pattern(), Some("batch"));
    }
}
