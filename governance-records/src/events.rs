//! Append-only observability event streams (newline-delimited JSON).

use governance_primitives::{GovernanceError, GovernanceResult, SourceDocument};
use serde_json::Value;
use tracing::debug;

use crate::schema::RecordSchema;

/// Read-only view over an event stream document.
#[derive(Debug, Clone, Copy)]
pub struct EventStream<'a> {
    document: &'a SourceDocument,
}

impl<'a> EventStream<'a> {
    /// Wraps an already loaded stream.
    #[must_use]
    pub fn new(document: &'a SourceDocument) -> Self {
        Self { document }
    }

    /// Returns the origin of the underlying document.
    #[must_use]
    pub fn origin(&self) -> &'a str {
        self.document.origin()
    }

    /// Iterates over non-blank lines with their 1-based line numbers.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        self.document
            .text()
            .lines()
            .enumerate()
            .filter(|(_, raw)| !raw.trim().is_empty())
            .map(|(index, raw)| (index + 1, raw))
    }

    /// Strictly validates every event line against `schema`.
    ///
    /// Returns the number of events checked.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::MalformedDocument`] for the first line that
    /// is not valid JSON, and any error produced by [`RecordSchema::validate`]
    /// for the first non-conforming event.
    pub fn validate(&self, schema: &RecordSchema) -> GovernanceResult<usize> {
        let mut checked = 0;
        for (line_no, raw) in self.lines() {
            let location = format!("Observability event {} line {line_no}", self.origin());
            let event: Value = serde_json::from_str(raw)
                .map_err(|err| GovernanceError::malformed(location.as_str(), err))?;
            schema.validate(&event, &location)?;
            checked += 1;
        }

        debug!(origin = self.origin(), events = checked, "event stream validated");
        Ok(checked)
    }
}

#[cfg(test)]
mod tests {
    use governance_primitives::ErrorKind;
    use serde_json::json;

    use super::*;

    fn schema() -> RecordSchema {
        RecordSchema::from_document(
            &json!({
                "required": ["type"],
                "properties": {
                    "type": {"type": "string", "enum": ["gate", "critique"]},
                    "phase": {"type": "string"},
                    "task_id": {"type": "string"}
                }
            }),
            "event schema",
        )
        .unwrap()
    }

    #[test]
    fn skips_blank_lines_and_numbers_from_one() {
        let doc = SourceDocument::new("events.jsonl", "\n{\"type\":\"gate\"}\n   \n{}\n");
        let lines: Vec<_> = EventStream::new(&doc).lines().map(|(n, _)| n).collect();
        assert_eq!(lines, [2, 4]);
    }

    #[test]
    fn validates_each_event() {
        let doc = SourceDocument::new(
            "events.jsonl",
            "{\"type\":\"gate\"}\n\n{\"type\":\"critique\",\"phase\":\"reflection\"}\n",
        );
        assert_eq!(EventStream::new(&doc).validate(&schema()).unwrap(), 2);
    }

    #[test]
    fn malformed_line_is_fatal_and_located() {
        let doc = SourceDocument::new("events.jsonl", "{\"type\":\"gate\"}\n{oops\n");
        let err = EventStream::new(&doc).validate(&schema()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn non_object_line_is_shape_error() {
        let doc = SourceDocument::new("events.jsonl", "[1, 2]\n");
        let err = EventStream::new(&doc).validate(&schema()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DocumentShape);
    }

    #[test]
    fn unknown_event_field_is_rejected() {
        let doc = SourceDocument::new("events.jsonl", "{\"type\":\"gate\",\"extra\":1}\n");
        let err = EventStream::new(&doc).validate(&schema()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownKey);
    }
}
