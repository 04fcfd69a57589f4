//! Typed field readers over loosely-typed governance documents.
//!
//! Documents arrive as generic [`serde_json::Value`] trees. These helpers turn
//! them into typed values and report the first violation with its location.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::error::{GovernanceError, GovernanceResult};
use crate::vocabulary::PolicyTerm;

/// Returns the object stored in `value`, or a shape error naming `location`.
///
/// # Errors
///
/// Returns [`GovernanceError::DocumentShape`] when `value` is not an object.
pub fn require_object<'a>(
    value: &'a Value,
    location: &str,
) -> GovernanceResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| GovernanceError::DocumentShape {
            location: location.to_owned(),
            expected: "an object",
        })
}

/// Short name of a JSON value's kind, used in diagnostics.
#[must_use]
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads fields out of one object while remembering where it lives.
#[derive(Debug, Clone)]
pub struct ObjectReader<'a> {
    location: String,
    map: &'a Map<String, Value>,
}

impl<'a> ObjectReader<'a> {
    /// Wraps `value`, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::DocumentShape`] when `value` is not an object.
    pub fn new(value: &'a Value, location: impl Into<String>) -> GovernanceResult<Self> {
        let location = location.into();
        let map = require_object(value, &location)?;
        Ok(Self { location, map })
    }

    /// Returns the location label used in errors.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Re-labels the reader, typically once the entity name is known.
    #[must_use]
    pub fn relabel(self, location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            map: self.map,
        }
    }

    /// Returns `true` when `field` is present, even if null.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.map.contains_key(field)
    }

    /// Returns the raw value stored under `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.map.get(field)
    }

    /// Rejects any key not listed in `allowed`.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::UnknownKey`] for the first undeclared key.
    pub fn ensure_known_keys(&self, allowed: &[&str]) -> GovernanceResult<()> {
        match self.map.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(GovernanceError::UnknownKey {
                location: self.location.clone(),
                key: key.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Reads a required, non-empty string. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::Field`] if the field is absent, not a string,
    /// or blank.
    pub fn required_str(&self, field: &str) -> GovernanceResult<String> {
        self.non_empty_str(self.map.get(field), field)
    }

    /// Reads an optional string; blank strings are rejected when present.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::Field`] if the field is present but not a
    /// non-empty string.
    pub fn optional_str(&self, field: &str) -> GovernanceResult<Option<String>> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(None),
            value => self.non_empty_str(value, field).map(Some),
        }
    }

    /// Reads a required list.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::Field`] if the field is absent or not a list.
    pub fn required_list(&self, field: &str) -> GovernanceResult<&'a [Value]> {
        match self.map.get(field) {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(self.field_error(
                field,
                format!("must be a list, got {}", kind_of(other)),
            )),
            None => Err(self.field_error(field, "is required and must be a list")),
        }
    }

    /// Reads an optional list; absence and null both yield an empty slice.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::Field`] if the field is present but not a list.
    pub fn optional_list(&self, field: &str) -> GovernanceResult<&'a [Value]> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(&[]),
            Some(_) => self.required_list(field),
        }
    }

    /// Reads a required list of non-empty strings into a set.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::Field`] if the field is absent, not a list,
    /// or holds anything other than non-empty strings.
    pub fn string_set(&self, field: &str) -> GovernanceResult<BTreeSet<String>> {
        self.required_list(field)?
            .iter()
            .map(|item| self.non_empty_str(Some(item), field))
            .collect()
    }

    /// Reads an optional boolean.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::Field`] if the field is present but not a
    /// boolean.
    pub fn optional_bool(&self, field: &str) -> GovernanceResult<Option<bool>> {
        match self.map.get(field) {
            None => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(other) => Err(self.field_error(
                field,
                format!("must be boolean, got {}", kind_of(other)),
            )),
        }
    }

    /// Reads a required term from a closed vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::Field`] if the field is not a non-empty string
    /// and [`GovernanceError::EnumViolation`] if it is outside `T::ALLOWED`.
    pub fn term<T: PolicyTerm>(&self, field: &str) -> GovernanceResult<T> {
        let raw = self.required_str(field)?;
        raw.parse::<T>()
            .map_err(|_| GovernanceError::EnumViolation {
                location: self.location.clone(),
                field: field.to_owned(),
                value: raw,
                allowed: T::ALLOWED.iter().map(|term| (*term).to_owned()).collect(),
            })
    }

    /// Builds a field error located at this reader.
    #[must_use]
    pub fn field_error(&self, field: &str, reason: impl Into<String>) -> GovernanceError {
        GovernanceError::field(self.location.clone(), field, reason)
    }

    fn non_empty_str(&self, value: Option<&Value>, field: &str) -> GovernanceResult<String> {
        match value {
            Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_owned()),
            Some(Value::String(_)) => Err(self.field_error(field, "must be a non-empty string")),
            Some(other) => Err(self.field_error(
                field,
                format!("must be a non-empty string, got {}", kind_of(other)),
            )),
            None => Err(self.field_error(field, "is required")),
        }
    }
}
