//! Confirmation emitted after a successful governance run.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::authorize::Grant;
use crate::reflection::ReflectionStatus;

/// Summary of everything a successful run checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GovernanceReport {
    phases: usize,
    agents: usize,
    patterns: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    authorization: Option<Grant>,
    synchronizations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<usize>,
    reflection: ReflectionStatus,
}

impl GovernanceReport {
    /// Starts a report from the sizes of the two registries.
    #[must_use]
    pub fn new(phases: usize, agents: usize, patterns: usize) -> Self {
        Self {
            phases,
            agents,
            patterns,
            authorization: None,
            synchronizations: 0,
            memory_records: None,
            events: None,
            reflection: ReflectionStatus::NotRequired,
        }
    }

    /// Records the authorization grant.
    #[must_use]
    pub fn with_authorization(mut self, grant: Option<Grant>) -> Self {
        self.authorization = grant;
        self
    }

    /// Records how many synchronization contracts were validated.
    #[must_use]
    pub fn with_synchronizations(mut self, count: usize) -> Self {
        self.synchronizations = count;
        self
    }

    /// Records how many memory records were validated; `None` when skipped.
    #[must_use]
    pub fn with_memory_records(mut self, count: Option<usize>) -> Self {
        self.memory_records = count;
        self
    }

    /// Records how many events were validated; `None` when skipped.
    #[must_use]
    pub fn with_events(mut self, count: Option<usize>) -> Self {
        self.events = count;
        self
    }

    /// Records the reflection outcome.
    #[must_use]
    pub fn with_reflection(mut self, status: ReflectionStatus) -> Self {
        self.reflection = status;
        self
    }

    /// Returns the authorization grant, if a request was evaluated.
    #[must_use]
    pub fn authorization(&self) -> Option<&Grant> {
        self.authorization.as_ref()
    }

    /// Returns the number of validated synchronization contracts.
    #[must_use]
    pub fn synchronizations(&self) -> usize {
        self.synchronizations
    }

    /// Returns the number of validated memory records.
    #[must_use]
    pub fn memory_records(&self) -> Option<usize> {
        self.memory_records
    }

    /// Returns the number of validated events.
    #[must_use]
    pub fn events(&self) -> Option<usize> {
        self.events
    }

    /// Returns the reflection outcome.
    #[must_use]
    pub fn reflection(&self) -> &ReflectionStatus {
        &self.reflection
    }
}

impl Display for GovernanceReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Governance contracts validated: {} phases, {} agents, {} patterns",
            self.phases, self.agents, self.patterns
        )?;
        if let Some(grant) = &self.authorization {
            write!(f, "; authorized {} in {}", grant.agent(), grant.phase())?;
            if let Some(pattern) = grant.pattern() {
                write!(f, " with pattern {pattern}")?;
            }
        }
        write!(f, "; {} synchronizations", self.synchronizations)?;
        match self.memory_records {
            Some(count) => write!(f, "; {count} memory records")?,
            None => f.write_str("; memory records skipped")?,
        }
        match self.events {
            Some(count) => write!(f, "; {count} events")?,
            None => f.write_str("; events skipped")?,
        }
        match &self.reflection {
            ReflectionStatus::NotRequired => f.write_str("; reflection not required"),
            ReflectionStatus::Satisfied { task_id, line } => {
                write!(f, "; reflection satisfied for {task_id} (line {line})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_single_confirmation_line() {
        let report = GovernanceReport::new(3, 2, 1)
            .with_synchronizations(4)
            .with_memory_records(Some(5))
            .with_reflection(ReflectionStatus::Satisfied {
                task_id: "T1".into(),
                line: 7,
            });

        assert_eq!(
            report.to_string(),
            "Governance contracts validated: 3 phases, 2 agents, 1 patterns; 4 synchronizations; \
             5 memory records; events skipped; reflection satisfied for T1 (line 7)"
        );
    }
}
