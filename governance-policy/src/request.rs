//! Authorization requests evaluated against the phase model and agent registry.

use serde::{Deserialize, Serialize};

/// Ephemeral `(phase, agent, pattern?)` triple to authorize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    phase: String,
    agent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
}

impl AuthorizationRequest {
    /// Creates a request for `agent` acting in `phase`.
    #[must_use]
    pub fn new(phase: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            agent: agent.into(),
            pattern: None,
        }
    }

    /// Narrows the request to a pattern. Blank patterns are ignored.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.pattern = (!pattern.trim().is_empty()).then_some(pattern);
        self
    }

    /// Returns the requested phase.
    #[must_use]
    pub fn phase(&self) -> &str {
        &self.phase
    }

    /// Returns the requesting agent.
    #[must_use]
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Returns the requested pattern, if any.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_pattern_is_dropped() {
        let request = AuthorizationRequest::new("execution", "worker").with_pattern("  ");
        assert_eq!(request.pattern(), None);

        let request = AuthorizationRequest::new("execution", "worker").with_pattern("batch");
        assert_eq!(request.pattern(), Some("batch"));
    }
}
