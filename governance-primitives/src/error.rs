//! Shared error definitions for governance checks.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the governance crates.
pub type GovernanceResult<T> = std::result::Result<T, GovernanceError>;

/// Registry a cross-reference or duplicate name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Pipeline stage declared in the phase model.
    Phase,
    /// Actor declared in the agent registry.
    Agent,
    /// Capability identifier from the pattern catalog.
    Pattern,
    /// Synchronization contract.
    Synchronization,
}

impl Display for ReferenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Phase => "phase",
            Self::Agent => "agent",
            Self::Pattern => "pattern",
            Self::Synchronization => "synchronization",
        };
        f.write_str(label)
    }
}

/// Discriminant of [`GovernanceError`], stable across message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Wrong top-level container type.
    DocumentShape,
    /// Missing required field or wrong primitive type.
    Field,
    /// Value outside a declared closed vocabulary.
    EnumViolation,
    /// Key present outside a closed key set.
    UnknownKey,
    /// Name not found in the registry it refers to.
    CrossReference,
    /// Synchronization declares both or neither topology shape.
    TopologyConflict,
    /// Underlying document syntax is invalid.
    MalformedDocument,
    /// Required critique evidence is absent.
    ReflectionMissing,
    /// Two declarations share a unique name.
    DuplicateName,
    /// A document could not be read.
    Io,
}

/// Errors raised while validating governance documents.
///
/// Every variant carries enough locating context (document path, entity
/// name or line number, field name) to point at the offending input.
#[derive(Debug, Error)]
pub enum GovernanceError {
    /// A document or entry had the wrong container type.
    #[error("{location} must be {expected}")]
    DocumentShape {
        /// Where the offending value lives.
        location: String,
        /// Expected container, e.g. `an object`.
        expected: &'static str,
    },

    /// A field was missing or had the wrong primitive type.
    #[error("{location} field `{field}` {reason}")]
    Field {
        /// Where the offending value lives.
        location: String,
        /// Field name.
        field: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// A value fell outside its closed vocabulary.
    #[error("{location} field `{field}` must be one of [{}], got `{value}`", .allowed.join(", "))]
    EnumViolation {
        /// Where the offending value lives.
        location: String,
        /// Field name.
        field: String,
        /// The rejected value, rendered as text.
        value: String,
        /// Accepted values.
        allowed: Vec<String>,
    },

    /// A key appeared outside the closed key set of its document.
    #[error("{location} has unknown key: {key}")]
    UnknownKey {
        /// Where the offending key lives.
        location: String,
        /// The undeclared key.
        key: String,
    },

    /// A name was not found where it had to be declared.
    #[error("{kind} `{name}` not found in {scope}")]
    CrossReference {
        /// Registry the name belongs to.
        kind: ReferenceKind,
        /// The unresolved name.
        name: String,
        /// Declaration that was searched, e.g. `pattern catalog`.
        scope: String,
    },

    /// A synchronization contract declares both or neither topology shape.
    #[error("{location} {reason}")]
    TopologyConflict {
        /// Synchronization document path.
        location: String,
        /// Which conflict was detected.
        reason: &'static str,
    },

    /// The underlying JSON or YAML syntax was invalid.
    #[error("{location} is malformed: {reason}")]
    MalformedDocument {
        /// Document path or line identifier.
        location: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Critique evidence required by the reflection obligation was absent.
    #[error("reflection required for task class `{task_class}`: {reason}")]
    ReflectionMissing {
        /// Task class that triggered the obligation.
        task_class: String,
        /// Task identifier, when one was supplied.
        task_id: Option<String>,
        /// Which part of the obligation failed.
        reason: &'static str,
    },

    /// Two declarations share a name that must be unique.
    #[error("{location} declares duplicate {kind} `{name}`")]
    DuplicateName {
        /// Where the second declaration lives.
        location: String,
        /// Registry the name belongs to.
        kind: ReferenceKind,
        /// The repeated name.
        name: String,
    },

    /// A document could not be read from disk.
    #[error("failed to read {location}")]
    Io {
        /// Path that failed.
        location: String,
        /// Source [`std::io::Error`].
        #[source]
        source: std::io::Error,
    },
}

impl GovernanceError {
    /// Returns the taxonomy discriminant of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DocumentShape { .. } => ErrorKind::DocumentShape,
            Self::Field { .. } => ErrorKind::Field,
            Self::EnumViolation { .. } => ErrorKind::EnumViolation,
            Self::UnknownKey { .. } => ErrorKind::UnknownKey,
            Self::CrossReference { .. } => ErrorKind::CrossReference,
            Self::TopologyConflict { .. } => ErrorKind::TopologyConflict,
            Self::MalformedDocument { .. } => ErrorKind::MalformedDocument,
            Self::ReflectionMissing { .. } => ErrorKind::ReflectionMissing,
            Self::DuplicateName { .. } => ErrorKind::DuplicateName,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Helper to construct field errors from string-like values.
    #[must_use]
    pub fn field(
        location: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Field {
            location: location.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Helper to construct cross-reference errors.
    #[must_use]
    pub fn cross_reference(
        kind: ReferenceKind,
        name: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self::CrossReference {
            kind,
            name: name.into(),
            scope: scope.into(),
        }
    }

    /// Helper to construct malformed-document errors.
    #[must_use]
    pub fn malformed(location: impl Into<String>, reason: impl Display) -> Self {
        Self::MalformedDocument {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Helper to construct I/O errors tagged with the failing path.
    #[must_use]
    pub fn io(location: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            location: location.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_violation_lists_allowed_values() {
        let err = GovernanceError::EnumViolation {
            location: "Phase execution".into(),
            field: "side_effects".into(),
            value: "maybe".into(),
            allowed: vec!["allowed".into(), "forbidden".into()],
        };

        assert_eq!(err.kind(), ErrorKind::EnumViolation);
        assert_eq!(
            err.to_string(),
            "Phase execution field `side_effects` must be one of [allowed, forbidden], got `maybe`"
        );
    }

    #[test]
    fn cross_reference_names_scope() {
        let err = GovernanceError::cross_reference(
            ReferenceKind::Pattern,
            "stream",
            "agent `worker` supports_patterns",
        );
        assert_eq!(err.kind(), ErrorKind::CrossReference);
        assert_eq!(
            err.to_string(),
            "pattern `stream` not found in agent `worker` supports_patterns"
        );
    }
}
