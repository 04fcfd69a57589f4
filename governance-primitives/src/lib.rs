//! Core shared types for CERES governance validation.

#![warn(missing_docs, clippy::pedantic)]

mod document;
mod error;
pub mod fields;
mod vocabulary;

/// Unparsed document text tagged with its origin.
pub use document::SourceDocument;
/// Error taxonomy and result alias shared across the governance crates.
pub use error::{ErrorKind, GovernanceError, GovernanceResult, ReferenceKind};
/// Typed readers over generic documents.
pub use fields::{ObjectReader, kind_of, require_object};
/// Closed vocabularies for phase, agent and synchronization declarations.
pub use vocabulary::{MemoryScope, PolicyTerm, SideEffects, Transport, UnknownTerm};
