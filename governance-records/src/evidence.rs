//! Tolerant scan of an event stream for critique evidence.
//!
//! Unlike [`EventStream::validate`](crate::EventStream::validate), this scan
//! never fails: lines that are not JSON objects are skipped, because the
//! stream may hold unrelated or partially written entries.

use serde_json::Value;
use tracing::trace;

use crate::events::EventStream;

/// Event `type` recorded for a critique.
pub const CRITIQUE_EVENT_TYPE: &str = "critique";
/// Phase in which critiques are recorded.
pub const REFLECTION_PHASE: &str = "reflection";

/// Searches a stream for a critique recorded during reflection for one task.
#[derive(Debug, Clone, Copy)]
pub struct CritiqueScan<'a> {
    stream: EventStream<'a>,
}

impl<'a> CritiqueScan<'a> {
    /// Creates a scan over `stream`.
    #[must_use]
    pub fn new(stream: EventStream<'a>) -> Self {
        Self { stream }
    }

    /// Returns the line number of the first critique event for `task_id`.
    ///
    /// A line matches when it is a JSON object with `type == "critique"`,
    /// `phase == "reflection"` and either a top-level `task_id` or a nested
    /// `context.task_id` equal to `task_id`. The whole stream is rescanned on
    /// every call.
    #[must_use]
    pub fn find(&self, task_id: &str) -> Option<usize> {
        self.stream.lines().find_map(|(line_no, raw)| {
            let Ok(Value::Object(event)) = serde_json::from_str::<Value>(raw) else {
                trace!(line = line_no, "skipping non-object event line");
                return None;
            };

            let is_critique = event.get("type").and_then(Value::as_str) == Some(CRITIQUE_EVENT_TYPE)
                && event.get("phase").and_then(Value::as_str) == Some(REFLECTION_PHASE);
            if !is_critique {
                return None;
            }

            let top_level = event.get("task_id").and_then(Value::as_str);
            let nested = event
                .get("context")
                .and_then(Value::as_object)
                .and_then(|context| context.get("task_id"))
                .and_then(Value::as_str);

            (top_level == Some(task_id) || nested == Some(task_id)).then_some(line_no)
        })
    }
}

#[cfg(test)]
mod tests {
    use governance_primitives::SourceDocument;

    use super::*;

    fn scan(text: &str, task_id: &str) -> Option<usize> {
        let doc = SourceDocument::new("events.jsonl", text);
        CritiqueScan::new(EventStream::new(&doc)).find(task_id)
    }

    #[test]
    fn finds_top_level_task_id() {
        let text = "{\"type\":\"gate\"}\n{\"type\":\"critique\",\"phase\":\"reflection\",\"task_id\":\"T1\"}\n";
        assert_eq!(scan(text, "T1"), Some(2));
        assert_eq!(scan(text, "T2"), None);
    }

    #[test]
    fn finds_nested_context_task_id() {
        let text = r#"{"type":"critique","phase":"reflection","context":{"task_id":"T1"}}"#;
        assert_eq!(scan(text, "T1"), Some(1));
    }

    #[test]
    fn requires_reflection_phase() {
        let text = r#"{"type":"critique","phase":"execution","task_id":"T1"}"#;
        assert_eq!(scan(text, "T1"), None);
    }

    #[test]
    fn skips_malformed_and_non_object_lines() {
        let text = "{broken\n[1,2]\n\"text\"\n{\"type\":\"critique\",\"phase\":\"reflection\",\"task_id\":\"T1\"}\n";
        assert_eq!(scan(text, "T1"), Some(4));
    }

    #[test]
    fn non_string_task_id_never_matches() {
        let text = r#"{"type":"critique","phase":"reflection","task_id":1}"#;
        assert_eq!(scan(text, "1"), None);
    }
}
