//! Bidirectional authorization over the phase model and agent registry.

use governance_primitives::{
    GovernanceError, GovernanceResult, MemoryScope, ReferenceKind, SideEffects,
};
use serde::Serialize;
use tracing::debug;

use crate::agents::AgentRegistry;
use crate::phases::PhaseModel;
use crate::request::AuthorizationRequest;

/// Decides whether an agent may act in a phase.
pub trait Authorizer {
    /// Evaluates the supplied request.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::CrossReference`] naming the first
    /// declaration that does not admit the request.
    fn authorize(&self, request: &AuthorizationRequest) -> GovernanceResult<Grant>;
}

/// Permissions in effect once a request has been authorized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grant {
    phase: String,
    agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    side_effects: SideEffects,
    memory_scope: MemoryScope,
}

impl Grant {
    /// Returns the authorized phase.
    #[must_use]
    pub fn phase(&self) -> &str {
        &self.phase
    }

    /// Returns the authorized agent.
    #[must_use]
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Returns the authorized pattern, if one was requested.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Side effects are allowed only when both the phase and the agent allow them.
    #[must_use]
    pub fn side_effects(&self) -> SideEffects {
        self.side_effects
    }

    /// Memory tier of the phase.
    #[must_use]
    pub fn memory_scope(&self) -> MemoryScope {
        self.memory_scope
    }
}

/// Authorizer backed by the two independently authored registries.
///
/// A request succeeds only when the phase lists the agent *and* the agent
/// lists the phase; either declaration alone is not enough.
#[derive(Debug, Clone, Copy)]
pub struct RegistryAuthorizer<'a> {
    phases: &'a PhaseModel,
    agents: &'a AgentRegistry,
}

impl<'a> RegistryAuthorizer<'a> {
    /// Creates an authorizer over both registries.
    #[must_use]
    pub fn new(phases: &'a PhaseModel, agents: &'a AgentRegistry) -> Self {
        Self { phases, agents }
    }
}

impl Authorizer for RegistryAuthorizer<'_> {
    fn authorize(&self, request: &AuthorizationRequest) -> GovernanceResult<Grant> {
        let phase_name = request.phase();
        let agent_name = request.agent();

        let phase = self.phases.phase(phase_name).ok_or_else(|| {
            GovernanceError::cross_reference(ReferenceKind::Phase, phase_name, "phase model")
        })?;
        let agent = self.agents.agent(agent_name).ok_or_else(|| {
            GovernanceError::cross_reference(ReferenceKind::Agent, agent_name, "agent registry")
        })?;

        if !phase.admits(agent_name) {
            return Err(GovernanceError::cross_reference(
                ReferenceKind::Agent,
                agent_name,
                format!("phase `{phase_name}` allowed_agents"),
            ));
        }
        if !agent.may_enter(phase_name) {
            return Err(GovernanceError::cross_reference(
                ReferenceKind::Phase,
                phase_name,
                format!("agent `{agent_name}` allowed_phases"),
            ));
        }
        if let Some(pattern) = request.pattern() {
            if !agent.supports(pattern) {
                return Err(GovernanceError::cross_reference(
                    ReferenceKind::Pattern,
                    pattern,
                    format!("agent `{agent_name}` supports_patterns"),
                ));
            }
        }

        let side_effects = match (phase.side_effects(), agent.side_effects()) {
            (SideEffects::Allowed, SideEffects::Allowed) => SideEffects::Allowed,
            _ => SideEffects::Forbidden,
        };

        debug!(
            phase = phase_name,
            agent = agent_name,
            pattern = request.pattern(),
            %side_effects,
            "authorization granted"
        );
        Ok(Grant {
            phase: phase_name.to_owned(),
            agent: agent_name.to_owned(),
            pattern: request.pattern().map(str::to_owned),
            side_effects,
            memory_scope: phase.memory_scope(),
        })
    }
}
