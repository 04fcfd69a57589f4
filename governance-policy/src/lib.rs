//! Governance policy evaluation for CERES agents.
//!
//! Builds the phase model and agent registry from their documents, checks
//! authorization requests against both, validates synchronization contracts
//! and enforces the reflection obligation.

#![warn(missing_docs, clippy::pedantic)]

pub mod agents;
pub mod authorize;
pub mod phases;
pub mod reflection;
pub mod report;
pub mod request;
pub mod synchronization;

pub use agents::{Agent, AgentRegistry, PatternCatalog};
pub use authorize::{Authorizer, Grant, RegistryAuthorizer};
pub use phases::{Phase, PhaseModel};
pub use reflection::{REFLECTION_GATED_PHASES, ReflectionCheck, ReflectionStatus};
pub use report::GovernanceReport;
pub use request::AuthorizationRequest;
pub use synchronization::{
    MessageContract, Synchronization, Topology, validate_synchronizations,
};
