//! Memory record documents, one JSON object per file.

use governance_primitives::{GovernanceError, GovernanceResult, SourceDocument};
use serde_json::Value;
use tracing::debug;

use crate::schema::RecordSchema;

/// Validates every memory record against `schema`, stopping at the first
/// violation.
///
/// Records are checked in the order supplied; loaders hand them over sorted
/// by path so the first reported violation is reproducible. Returns the
/// number of records checked.
///
/// # Errors
///
/// Returns [`GovernanceError::MalformedDocument`] when a record is not valid
/// JSON, and any error produced by [`RecordSchema::validate`].
pub fn validate_memory_records(
    schema: &RecordSchema,
    records: &[SourceDocument],
) -> GovernanceResult<usize> {
    for record in records {
        let location = format!("Memory record {}", record.origin());
        let value: Value = serde_json::from_str(record.text())
            .map_err(|err| GovernanceError::malformed(location.as_str(), err))?;
        schema.validate(&value, &location)?;
        debug!(origin = record.origin(), "memory record validated");
    }

    Ok(records.len())
}
