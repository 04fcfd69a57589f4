//! Record validation for CERES governance.
//!
//! Memory records and observability events share one closed-schema validator.
//! The event stream additionally supports a tolerant scan for critique
//! evidence, kept separate from strict validation.

#![warn(missing_docs, clippy::pedantic)]

mod events;
mod evidence;
mod record;
mod schema;

pub use events::EventStream;
pub use evidence::{CRITIQUE_EVENT_TYPE, CritiqueScan, REFLECTION_PHASE};
pub use record::validate_memory_records;
pub use schema::{FieldType, PropertySpec, RecordSchema};
