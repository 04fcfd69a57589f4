//! Synchronization contracts between phases and concept groups.

use std::collections::BTreeSet;

use governance_primitives::{
    GovernanceError, GovernanceResult, ObjectReader, ReferenceKind, SourceDocument, Transport,
    kind_of,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

const CONTRACT_KEYS: &[&str] = &[
    "name",
    "from",
    "to",
    "direction",
    "concepts",
    "allow_cycle",
    "message_contract",
];
const MESSAGE_CONTRACT_KEYS: &[&str] = &["input_schema", "output_schema", "transport"];
const BIDIRECTIONAL: &str = "bidirectional";
const MIN_CONCEPTS: usize = 2;

/// Data-flow shape of a synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topology {
    /// Directed edge between two phases.
    Directed {
        /// Upstream phase.
        from: String,
        /// Downstream phase.
        to: String,
    },
    /// Group of concepts kept in sync in both directions.
    Bidirectional {
        /// At least two concept names.
        concepts: Vec<String>,
    },
}

/// Message shapes exchanged over a synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageContract {
    input_schema: String,
    output_schema: String,
    transport: Transport,
}

impl MessageContract {
    fn from_value(value: &Value, location: &str) -> GovernanceResult<Self> {
        let reader = ObjectReader::new(value, format!("message_contract in {location}"))?;
        reader.ensure_known_keys(MESSAGE_CONTRACT_KEYS)?;

        Ok(Self {
            input_schema: reader.required_str("input_schema")?,
            output_schema: reader.required_str("output_schema")?,
            transport: reader.term("transport")?,
        })
    }

    /// Returns the input schema reference.
    #[must_use]
    pub fn input_schema(&self) -> &str {
        &self.input_schema
    }

    /// Returns the output schema reference.
    #[must_use]
    pub fn output_schema(&self) -> &str {
        &self.output_schema
    }

    /// Returns the declared transport.
    #[must_use]
    pub fn transport(&self) -> Transport {
        self.transport
    }
}

/// One validated synchronization contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Synchronization {
    name: String,
    topology: Topology,
    #[serde(skip_serializing_if = "Option::is_none")]
    allow_cycle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_contract: Option<MessageContract>,
}

impl Synchronization {
    /// Validates one parsed contract document.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::UnknownKey`] for keys outside the contract
    /// key set, [`GovernanceError::TopologyConflict`] when both or neither
    /// topology shape is declared, and field or vocabulary errors for
    /// malformed values.
    pub fn from_document(document: &Value, origin: &str) -> GovernanceResult<Self> {
        let reader = ObjectReader::new(document, format!("Synchronization {origin}"))?;
        reader.ensure_known_keys(CONTRACT_KEYS)?;

        let name = reader.required_str("name")?;

        let directed = reader.contains("from") || reader.contains("to");
        let grouped = reader.contains("direction") || reader.contains("concepts");
        let topology = match (directed, grouped) {
            (true, true) => {
                return Err(GovernanceError::TopologyConflict {
                    location: reader.location().to_owned(),
                    reason: "cannot mix from/to with direction/concepts",
                });
            }
            (false, false) => {
                return Err(GovernanceError::TopologyConflict {
                    location: reader.location().to_owned(),
                    reason: "must define from/to or direction/concepts",
                });
            }
            (true, false) => Topology::Directed {
                from: reader.required_str("from")?,
                to: reader.required_str("to")?,
            },
            (false, true) => bidirectional(&reader)?,
        };

        let allow_cycle = reader.optional_bool("allow_cycle")?;

        let message_contract = match reader.get("message_contract") {
            None => None,
            Some(value @ Value::Object(_)) => Some(MessageContract::from_value(value, origin)?),
            Some(other) => {
                return Err(reader.field_error(
                    "message_contract",
                    format!("must be an object, got {}", kind_of(other)),
                ));
            }
        };

        Ok(Self {
            name,
            topology,
            allow_cycle,
            message_contract,
        })
    }

    /// Returns the contract name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared topology.
    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Returns the explicit cycle permission, if declared.
    #[must_use]
    pub fn allow_cycle(&self) -> Option<bool> {
        self.allow_cycle
    }

    /// Returns the message contract, if declared.
    #[must_use]
    pub fn message_contract(&self) -> Option<&MessageContract> {
        self.message_contract.as_ref()
    }
}

fn bidirectional(reader: &ObjectReader<'_>) -> GovernanceResult<Topology> {
    let direction = reader.required_str("direction")?;
    if direction != BIDIRECTIONAL {
        return Err(GovernanceError::EnumViolation {
            location: reader.location().to_owned(),
            field: "direction".into(),
            value: direction,
            allowed: vec![BIDIRECTIONAL.into()],
        });
    }

    let items = reader.required_list("concepts")?;
    if items.len() < MIN_CONCEPTS {
        return Err(reader.field_error(
            "concepts",
            format!("must include at least {MIN_CONCEPTS} items"),
        ));
    }

    let concepts = items
        .iter()
        .map(|item| match item {
            Value::String(text) if !text.trim().is_empty() => Ok(text.trim().to_owned()),
            _ => Err(reader.field_error("concepts", "must contain only non-empty strings")),
        })
        .collect::<GovernanceResult<Vec<_>>>()?;

    Ok(Topology::Bidirectional { concepts })
}

/// Validates every contract document, fail-fast, in sorted origin order.
///
/// `parse` is the document loader: it turns raw text into a generic tree.
/// Contract names must be unique across documents.
///
/// # Errors
///
/// Returns the first parse or validation error encountered, or
/// [`GovernanceError::DuplicateName`] for a repeated contract name.
pub fn validate_synchronizations<F>(
    documents: &[SourceDocument],
    mut parse: F,
) -> GovernanceResult<Vec<Synchronization>>
where
    F: FnMut(&SourceDocument) -> GovernanceResult<Value>,
{
    let mut ordered: Vec<&SourceDocument> = documents.iter().collect();
    ordered.sort_by(|a, b| a.origin().cmp(b.origin()));

    let mut names = BTreeSet::new();
    let mut contracts = Vec::with_capacity(ordered.len());
    for document in ordered {
        let value = parse(document)?;
        let contract = Synchronization::from_document(&value, document.origin())?;
        if !names.insert(contract.name.clone()) {
            return Err(GovernanceError::DuplicateName {
                location: format!("Synchronization {}", document.origin()),
                kind: ReferenceKind::Synchronization,
                name: contract.name,
            });
        }
        debug!(
            synchronization = contract.name(),
            origin = document.origin(),
            "synchronization contract validated"
        );
        contracts.push(contract);
    }

    info!(synchronizations = contracts.len(), "synchronization contracts validated");
    Ok(contracts)
}
