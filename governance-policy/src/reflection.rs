//! Reflection obligation for sensitive task classes.

use governance_primitives::{GovernanceError, GovernanceResult};
use governance_records::{CritiqueScan, EventStream};
use serde::Serialize;
use tracing::{debug, info};

use crate::phases::PhaseModel;

/// Phases in which the reflection obligation applies.
pub const REFLECTION_GATED_PHASES: &[&str] = &["execution", "correction"];

/// Outcome of a satisfied or inapplicable reflection check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReflectionStatus {
    /// The task class or phase does not trigger the obligation.
    NotRequired,
    /// A matching critique event was found.
    Satisfied {
        /// Task the critique was recorded for.
        task_id: String,
        /// 1-based line of the critique in the event stream.
        line: usize,
    },
}

/// Inputs of a reflection check. Every field is optional on the invocation
/// surface; absent values never trigger the obligation on their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectionCheck<'a> {
    task_class: Option<&'a str>,
    active_phase: Option<&'a str>,
    task_id: Option<&'a str>,
}

impl<'a> ReflectionCheck<'a> {
    /// Creates a check for the given task class and active phase.
    #[must_use]
    pub fn new(task_class: Option<&'a str>, active_phase: Option<&'a str>) -> Self {
        Self {
            task_class,
            active_phase,
            task_id: None,
        }
    }

    /// Sets the task identifier the critique must reference.
    #[must_use]
    pub fn with_task_id(mut self, task_id: Option<&'a str>) -> Self {
        self.task_id = task_id.filter(|id| !id.trim().is_empty());
        self
    }

    /// Returns the task class that triggers the obligation, if it does.
    #[must_use]
    pub fn obligation(&self, model: &PhaseModel) -> Option<&'a str> {
        let task_class = self.task_class?;
        let phase = self.active_phase?;
        (model.requires_reflection(task_class) && REFLECTION_GATED_PHASES.contains(&phase))
            .then_some(task_class)
    }

    /// Enforces the obligation against an optional event stream.
    ///
    /// A missing stream is treated as holding no evidence.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::ReflectionMissing`] when the obligation
    /// applies and either no task id was supplied or no matching critique
    /// event exists.
    pub fn enforce(
        &self,
        model: &PhaseModel,
        events: Option<EventStream<'_>>,
    ) -> GovernanceResult<ReflectionStatus> {
        let Some(task_class) = self.obligation(model) else {
            debug!(
                task_class = self.task_class,
                phase = self.active_phase,
                "reflection not required"
            );
            return Ok(ReflectionStatus::NotRequired);
        };

        let Some(task_id) = self.task_id else {
            return Err(GovernanceError::ReflectionMissing {
                task_class: task_class.to_owned(),
                task_id: None,
                reason: "task_id required to enforce reflection for task class",
            });
        };

        let line = events.and_then(|stream| CritiqueScan::new(stream).find(task_id));
        match line {
            Some(line) => {
                info!(task_class, task_id, line, "reflection evidence found");
                Ok(ReflectionStatus::Satisfied {
                    task_id: task_id.to_owned(),
                    line,
                })
            }
            None => Err(GovernanceError::ReflectionMissing {
                task_class: task_class.to_owned(),
                task_id: Some(task_id.to_owned()),
                reason: "no critique event found for task",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use governance_primitives::{ErrorKind, SourceDocument};
    use serde_json::json;

    use super::*;

    const CRITIQUE: &str = r#"{"type":"critique","phase":"reflection","task_id":"T1"}"#;

    fn model() -> PhaseModel {
        PhaseModel::from_document(
            &json!({"phases": [], "requires_reflection_for": ["migration"]}),
            "phases.yaml",
        )
        .unwrap()
    }

    fn run(phase: &str, task_id: Option<&str>, events: &str) -> GovernanceResult<ReflectionStatus> {
        let doc = SourceDocument::new("events.jsonl", events);
        ReflectionCheck::new(Some("migration"), Some(phase))
            .with_task_id(task_id)
            .enforce(&model(), Some(EventStream::new(&doc)))
    }

    #[test]
    fn critique_event_satisfies_obligation() {
        let events = format!("{{\"type\":\"gate\"}}\n{CRITIQUE}\n");
        let status = run("execution", Some("T1"), &events).unwrap();
        assert_eq!(
            status,
            ReflectionStatus::Satisfied {
                task_id: "T1".into(),
                line: 2
            }
        );
    }

    #[test]
    fn missing_critique_fails() {
        let err = run("correction", Some("T1"), "{\"type\":\"gate\"}\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReflectionMissing);
    }

    #[test]
    fn missing_task_id_fails_when_triggered() {
        let err = run("execution", None, CRITIQUE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReflectionMissing);

        let err = run("execution", Some("  "), CRITIQUE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReflectionMissing);
    }

    #[test]
    fn other_phases_never_trigger() {
        assert_eq!(run("planning", None, "").unwrap(), ReflectionStatus::NotRequired);
        assert_eq!(run("planning", Some("T1"), "garbage").unwrap(), ReflectionStatus::NotRequired);
    }

    #[test]
    fn unlisted_task_class_never_triggers() {
        let status = ReflectionCheck::new(Some("codegen"), Some("execution"))
            .enforce(&model(), None)
            .unwrap();
        assert_eq!(status, ReflectionStatus::NotRequired);
    }

    #[test]
    fn absent_stream_holds_no_evidence() {
        let err = ReflectionCheck::new(Some("migration"), Some("execution"))
            .with_task_id(Some("T1"))
            .enforce(&model(), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReflectionMissing);
    }
}
