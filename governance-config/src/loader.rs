//! Filesystem loader collecting every governance document of a hub.

use std::fs;
use std::path::{Path, PathBuf};

use governance_primitives::{GovernanceError, GovernanceResult, SourceDocument};
use tracing::{debug, warn};

use crate::layout::HubLayout;

/// Extension of synchronization contract files.
pub const SYNCHRONIZATION_EXTENSION: &str = "yaml";
/// Extension of memory record files.
pub const MEMORY_RECORD_EXTENSION: &str = "json";

/// Memory record documents plus the schema they are checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSources {
    schema: SourceDocument,
    records: Vec<SourceDocument>,
}

impl RecordSources {
    /// Bundles a schema with its records; records are sorted by origin.
    #[must_use]
    pub fn new(schema: SourceDocument, mut records: Vec<SourceDocument>) -> Self {
        records.sort_by(|a, b| a.origin().cmp(b.origin()));
        Self { schema, records }
    }

    /// Returns the record schema document.
    #[must_use]
    pub fn schema(&self) -> &SourceDocument {
        &self.schema
    }

    /// Returns the record documents in origin order.
    #[must_use]
    pub fn records(&self) -> &[SourceDocument] {
        &self.records
    }
}

/// Observability event stream plus its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSources {
    schema: SourceDocument,
    stream: SourceDocument,
}

impl EventSources {
    /// Bundles a schema with the stream it governs.
    #[must_use]
    pub fn new(schema: SourceDocument, stream: SourceDocument) -> Self {
        Self { schema, stream }
    }

    /// Returns the event schema document.
    #[must_use]
    pub fn schema(&self) -> &SourceDocument {
        &self.schema
    }

    /// Returns the newline-delimited event stream.
    #[must_use]
    pub fn stream(&self) -> &SourceDocument {
        &self.stream
    }
}

/// Every document a governance run inspects, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubSources {
    phase_model: SourceDocument,
    agent_registry: SourceDocument,
    synchronizations: Vec<SourceDocument>,
    memory: Option<RecordSources>,
    events: Option<EventSources>,
}

impl HubSources {
    /// Starts from the two mandatory documents.
    #[must_use]
    pub fn new(phase_model: SourceDocument, agent_registry: SourceDocument) -> Self {
        Self {
            phase_model,
            agent_registry,
            synchronizations: Vec::new(),
            memory: None,
            events: None,
        }
    }

    /// Sets the synchronization contracts; they are sorted by origin.
    #[must_use]
    pub fn with_synchronizations(mut self, mut documents: Vec<SourceDocument>) -> Self {
        documents.sort_by(|a, b| a.origin().cmp(b.origin()));
        self.synchronizations = documents;
        self
    }

    /// Sets the memory records.
    #[must_use]
    pub fn with_memory(mut self, memory: RecordSources) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Sets the observability event stream.
    #[must_use]
    pub fn with_events(mut self, events: EventSources) -> Self {
        self.events = Some(events);
        self
    }

    /// Returns the phase model document.
    #[must_use]
    pub fn phase_model(&self) -> &SourceDocument {
        &self.phase_model
    }

    /// Returns the agent registry document.
    #[must_use]
    pub fn agent_registry(&self) -> &SourceDocument {
        &self.agent_registry
    }

    /// Returns the synchronization contracts in origin order.
    #[must_use]
    pub fn synchronizations(&self) -> &[SourceDocument] {
        &self.synchronizations
    }

    /// Returns the memory records, when the record directory exists.
    #[must_use]
    pub fn memory(&self) -> Option<&RecordSources> {
        self.memory.as_ref()
    }

    /// Returns the event stream, when it exists.
    #[must_use]
    pub fn events(&self) -> Option<&EventSources> {
        self.events.as_ref()
    }
}

/// Reads every document named by `layout`.
///
/// The phase model and agent registry are mandatory. A missing
/// synchronization directory, memory record directory or event stream is
/// skipped; when the record directory or stream exists, its schema is
/// mandatory.
///
/// # Errors
///
/// Returns [`GovernanceError::Io`] when a mandatory document or a listed
/// file cannot be read.
pub fn load_hub(layout: &HubLayout) -> GovernanceResult<HubSources> {
    let phase_model = read_document(layout.phase_model())?;
    let agent_registry = read_document(layout.agent_registry())?;

    let synchronizations = if layout.synchronizations().is_dir() {
        list_files(layout.synchronizations(), SYNCHRONIZATION_EXTENSION)?
            .iter()
            .map(|path| read_document(path))
            .collect::<GovernanceResult<Vec<_>>>()?
    } else {
        warn!(
            path = %layout.synchronizations().display(),
            "synchronization directory missing; skipping contracts"
        );
        Vec::new()
    };

    let mut sources =
        HubSources::new(phase_model, agent_registry).with_synchronizations(synchronizations);

    if layout.memory_records().is_dir() {
        let schema = read_document(layout.memory_schema())?;
        let records = list_files(layout.memory_records(), MEMORY_RECORD_EXTENSION)?
            .iter()
            .map(|path| read_document(path))
            .collect::<GovernanceResult<Vec<_>>>()?;
        sources = sources.with_memory(RecordSources::new(schema, records));
    } else {
        warn!(
            path = %layout.memory_records().display(),
            "memory record directory missing; skipping records"
        );
    }

    if layout.events().is_file() {
        let schema = read_document(layout.events_schema())?;
        let stream = read_document(layout.events())?;
        sources = sources.with_events(EventSources::new(schema, stream));
    } else {
        warn!(
            path = %layout.events().display(),
            "observability event stream missing; skipping events"
        );
    }

    Ok(sources)
}

/// Reads one file into a [`SourceDocument`] labelled with its path.
///
/// # Errors
///
/// Returns [`GovernanceError::Io`] naming the path on failure.
pub fn read_document(path: &Path) -> GovernanceResult<SourceDocument> {
    let text = fs::read_to_string(path)
        .map_err(|err| GovernanceError::io(path.display().to_string(), err))?;
    debug!(path = %path.display(), bytes = text.len(), "document loaded");
    Ok(SourceDocument::from_path(path, text))
}

/// Lists regular files with `extension` directly under `dir`, sorted by path.
fn list_files(dir: &Path, extension: &str) -> GovernanceResult<Vec<PathBuf>> {
    let location = || dir.display().to_string();
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|err| GovernanceError::io(location(), err))? {
        let path = entry
            .map_err(|err| GovernanceError::io(location(), err))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
