//! Declarative, closed record schemas.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use governance_primitives::{
    GovernanceError, GovernanceResult, ObjectReader, kind_of, require_object,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primitive kind a schema property may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// JSON string.
    String,
    /// JSON number without a fractional representation.
    Integer,
    /// Any JSON number.
    Number,
    /// JSON `true`/`false`.
    Boolean,
    /// JSON object.
    Object,
    /// JSON array.
    Array,
}

impl FieldType {
    const ALLOWED: &'static [&'static str] =
        &["string", "integer", "number", "boolean", "object", "array"];

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    /// Returns `true` when `value` has this kind.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        };
        f.write_str(label)
    }
}

/// Constraints declared for one property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<FieldType>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    allowed: Option<Vec<Value>>,
}

impl PropertySpec {
    /// Returns the declared type, if any.
    #[must_use]
    pub fn kind(&self) -> Option<FieldType> {
        self.kind
    }

    /// Returns the declared enumeration, if any.
    #[must_use]
    pub fn allowed(&self) -> Option<&[Value]> {
        self.allowed.as_deref()
    }
}

/// Closed schema applied to memory records and observability events.
///
/// Every required field must be present, every present field must be
/// declared, declared types are checked against the value's JSON kind and
/// declared enumerations against membership.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSchema {
    #[serde(default)]
    properties: BTreeMap<String, PropertySpec>,
    #[serde(default)]
    required: Vec<String>,
}

impl RecordSchema {
    /// Parses a schema document of the form `{properties: {...}, required: [...]}`.
    ///
    /// Both keys are optional. Keys other than these two (`$schema`, `title`,
    /// ...) are ignored so that ordinary JSON Schema files can be reused.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::DocumentShape`] when the document or a
    /// property is not an object, [`GovernanceError::Field`] for mistyped
    /// `properties`, `required`, or `enum` entries, and
    /// [`GovernanceError::EnumViolation`] for an unsupported `type`.
    pub fn from_document(document: &Value, location: &str) -> GovernanceResult<Self> {
        let reader = ObjectReader::new(document, location)?;

        let mut properties = BTreeMap::new();
        match reader.get("properties") {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => {
                for (name, spec) in map {
                    let spec_location = format!("{location} property `{name}`");
                    properties.insert(name.clone(), parse_property(spec, &spec_location)?);
                }
            }
            Some(other) => {
                return Err(reader.field_error(
                    "properties",
                    format!("must be an object, got {}", kind_of(other)),
                ));
            }
        }

        let required = reader
            .optional_list("required")?
            .iter()
            .map(|item| match item {
                Value::String(name) => Ok(name.clone()),
                other => Err(reader.field_error(
                    "required",
                    format!("must list field names, got {}", kind_of(other)),
                )),
            })
            .collect::<GovernanceResult<Vec<_>>>()?;

        Ok(Self {
            properties,
            required,
        })
    }

    /// Builds a schema programmatically.
    #[must_use]
    pub fn new(properties: BTreeMap<String, PropertySpec>, required: Vec<String>) -> Self {
        Self {
            properties,
            required,
        }
    }

    /// Returns the declared properties.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, PropertySpec> {
        &self.properties
    }

    /// Returns the required field names.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Validates a single record against the schema.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::DocumentShape`] when `record` is not an
    /// object, [`GovernanceError::Field`] for a missing required field or a
    /// type mismatch, [`GovernanceError::UnknownKey`] for an undeclared field,
    /// and [`GovernanceError::EnumViolation`] for a value outside its enum.
    pub fn validate(&self, record: &Value, location: &str) -> GovernanceResult<()> {
        let fields = require_object(record, location)?;

        if let Some(missing) = self
            .required
            .iter()
            .find(|field| !fields.contains_key(field.as_str()))
        {
            return Err(GovernanceError::field(location, missing.as_str(), "is required"));
        }

        for (name, value) in fields {
            let Some(spec) = self.properties.get(name) else {
                return Err(GovernanceError::UnknownKey {
                    location: location.to_owned(),
                    key: name.clone(),
                });
            };

            if let Some(kind) = spec.kind {
                if !kind.accepts(value) {
                    return Err(GovernanceError::field(
                        location,
                        name.as_str(),
                        format!("must be {kind}, got {}", kind_of(value)),
                    ));
                }
            }

            if let Some(allowed) = &spec.allowed {
                if !allowed.contains(value) {
                    return Err(GovernanceError::EnumViolation {
                        location: location.to_owned(),
                        field: name.clone(),
                        value: render(value),
                        allowed: allowed.iter().map(render).collect(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn parse_property(spec: &Value, location: &str) -> GovernanceResult<PropertySpec> {
    let reader = ObjectReader::new(spec, location)?;

    let kind = match reader.get("type") {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => Some(FieldType::parse(raw).ok_or_else(|| {
            GovernanceError::EnumViolation {
                location: location.to_owned(),
                field: "type".into(),
                value: raw.clone(),
                allowed: FieldType::ALLOWED.iter().map(|t| (*t).to_owned()).collect(),
            }
        })?),
        Some(other) => {
            return Err(reader.field_error(
                "type",
                format!("must be a string, got {}", kind_of(other)),
            ));
        }
    };

    let allowed = match reader.get("enum") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(items.clone()),
        Some(other) => {
            return Err(reader.field_error(
                "enum",
                format!("must be a list, got {}", kind_of(other)),
            ));
        }
    };

    Ok(PropertySpec { kind, allowed })
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use governance_primitives::ErrorKind;
    use serde_json::json;

    use super::*;

    fn gap_schema() -> RecordSchema {
        RecordSchema::from_document(
            &json!({
                "required": ["gap_id"],
                "properties": {"gap_id": {"type": "string"}}
            }),
            "gap schema",
        )
        .unwrap()
    }

    #[test]
    fn accepts_conforming_record() {
        gap_schema()
            .validate(&json!({"gap_id": "G-1"}), "record")
            .unwrap();
    }

    #[test]
    fn missing_required_field_fails() {
        let err = gap_schema().validate(&json!({}), "record").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Field);
        assert_eq!(err.to_string(), "record field `gap_id` is required");
    }

    #[test]
    fn undeclared_field_fails() {
        let err = gap_schema()
            .validate(&json!({"gap_id": "G-1", "owner": "ops"}), "record")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownKey);
    }

    #[test]
    fn integer_where_string_expected_fails() {
        let err = gap_schema()
            .validate(&json!({"gap_id": 7}), "record")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Field);
        assert_eq!(err.to_string(), "record field `gap_id` must be string, got number");
    }

    #[test]
    fn integer_rejects_fractions_and_booleans() {
        let schema = RecordSchema::from_document(
            &json!({"properties": {"attempt": {"type": "integer"}}}),
            "schema",
        )
        .unwrap();

        schema.validate(&json!({"attempt": 3}), "record").unwrap();
        assert!(schema.validate(&json!({"attempt": 3.5}), "record").is_err());
        assert!(schema.validate(&json!({"attempt": true}), "record").is_err());
    }

    #[test]
    fn enum_membership_is_enforced() {
        let schema = RecordSchema::from_document(
            &json!({"properties": {"status": {"type": "string", "enum": ["open", "resolved"]}}}),
            "schema",
        )
        .unwrap();

        schema.validate(&json!({"status": "open"}), "record").unwrap();
        let err = schema
            .validate(&json!({"status": "stale"}), "record")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EnumViolation);
    }

    #[test]
    fn property_without_type_is_unchecked() {
        let schema =
            RecordSchema::from_document(&json!({"properties": {"payload": {}}}), "schema").unwrap();
        schema.validate(&json!({"payload": [1, 2]}), "record").unwrap();
        schema.validate(&json!({"payload": null}), "record").unwrap();
    }

    #[test]
    fn unsupported_schema_type_is_rejected() {
        let err = RecordSchema::from_document(
            &json!({"properties": {"at": {"type": "timestamp"}}}),
            "schema",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EnumViolation);
    }

    #[test]
    fn programmatic_schema_matches_parsed_one() {
        let built = RecordSchema::new(
            BTreeMap::from([("gap_id".to_owned(), PropertySpec::default())]),
            vec!["gap_id".to_owned()],
        );
        let document = json!({"required": ["gap_id"], "properties": {"gap_id": {}}});
        let parsed = RecordSchema::from_document(&document, "schema").unwrap();

        assert_eq!(built, parsed);
        assert_eq!(built.required(), ["gap_id"]);
        assert!(built.validate(&json!({"gap_id": 42}), "record").is_ok());
        assert_eq!(
            built.validate(&json!({}), "record").unwrap_err().kind(),
            ErrorKind::Field
        );
    }

    #[test]
    fn non_object_record_is_shape_error() {
        let err = gap_schema().validate(&json!("G-1"), "record").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DocumentShape);
    }
}
