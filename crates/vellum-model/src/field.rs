//! Field schemas and field values
//!
//! A schema describes one named, typed, positioned slot on a blueprint.
//! A value is the current answer for one slot on one contract; the label is
//! snapshotted onto the value at contract creation so edits can be matched
//! without consulting the blueprint.

use crate::ids::{BlueprintId, FieldId, ValueId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Date,
    Signature,
    Checkbox,
}

impl FieldType {
    pub const ALL: [FieldType; 4] = [
        FieldType::Text,
        FieldType::Date,
        FieldType::Signature,
        FieldType::Checkbox,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Signature => "signature",
            FieldType::Checkbox => "checkbox",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized field type tag: {0:?}")]
pub struct ParseFieldTypeError(pub String);

impl FromStr for FieldType {
    type Err = ParseFieldTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "date" => Ok(FieldType::Date),
            "signature" => Ok(FieldType::Signature),
            "checkbox" => Ok(FieldType::Checkbox),
            _ => Err(ParseFieldTypeError(s.to_string())),
        }
    }
}

/// One slot definition owned by a blueprint. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub field_id: FieldId,
    pub blueprint_id: BlueprintId,
    pub label: String,
    pub field_type: FieldType,
    pub pos_x: i32,
    pub pos_y: i32,
    pub position_label: Option<String>,
}

/// The current answer for one slot on one contract.
///
/// Exactly one exists per (contract, schema) pair, created at contract
/// creation with an empty value. Only `value` mutates afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub value_id: ValueId,
    pub field_id: FieldId,
    pub label: String,
    pub value: String,
}

/// One (label, value) pair in a batch edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub label: String,
    pub value: String,
}

impl FieldUpdate {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_type_tags_case_insensitively() {
        assert_eq!("text".parse::<FieldType>().unwrap(), FieldType::Text);
        assert_eq!("Signature".parse::<FieldType>().unwrap(), FieldType::Signature);
        assert!("dropdown".parse::<FieldType>().is_err());
    }
}
