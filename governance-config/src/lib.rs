//! Hub layout, document parsing and loading for CERES governance.
//!
//! [`HubLayout`] names where each governance document lives, [`load_hub`]
//! reads them into [`HubSources`] and [`DocumentFormat`] parses each one
//! into a generic tree for the policy layer.

#![warn(missing_docs, clippy::pedantic)]

pub mod layout;
pub mod loader;
pub mod parser;

pub use layout::HubLayout;
pub use loader::{EventSources, HubSources, RecordSources, load_hub, read_document};
pub use parser::{DocumentFormat, DocumentParser};
