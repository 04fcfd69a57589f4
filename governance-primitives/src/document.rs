//! Raw governance documents as handed over by a loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Unparsed document text together with where it came from.
///
/// The origin is used verbatim in diagnostics, so loaders should pass the
/// path the operator would recognise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    origin: String,
    text: String,
}

impl SourceDocument {
    /// Creates a document from an origin label and its contents.
    #[must_use]
    pub fn new(origin: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            text: text.into(),
        }
    }

    /// Creates a document labelled with a filesystem path.
    #[must_use]
    pub fn from_path(path: &Path, text: impl Into<String>) -> Self {
        Self::new(path.display().to_string(), text)
    }

    /// Returns the origin label.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the raw document text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
