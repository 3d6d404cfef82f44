//! View types for the excluded presentation layer
//!
//! Shapes mirror what the display needs: a blueprint with its slot
//! definitions, a contract with per-field rows in schema order, and the
//! audit trail with printable digests. Transport encoding is the consumer's
//! concern; everything here is plain serde.

use crate::ids::{BlueprintId, ContractId, EntryId, UserId};
use crate::field::FieldType;
use crate::status::ContractStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintView {
    pub id: BlueprintId,
    pub title: String,
    pub description: String,
    pub body_text: String,
    pub created_at: DateTime<Utc>,
    pub fields: Vec<FieldSchemaView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchemaView {
    pub label: String,
    pub field_type: FieldType,
    pub pos_x: i32,
    pub pos_y: i32,
    pub position_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractView {
    pub id: ContractId,
    pub blueprint_id: BlueprintId,
    pub blueprint_title: String,
    pub body_text: String,
    pub status: ContractStatus,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub fields: Vec<ContractFieldView>,
}

/// One display row: schema attributes joined with the current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFieldView {
    pub label: String,
    pub field_type: FieldType,
    pub pos_x: i32,
    pub pos_y: i32,
    pub position_label: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntryView {
    pub entry_id: EntryId,
    pub previous_status: Option<ContractStatus>,
    pub new_status: ContractStatus,
    pub changed_by: Option<UserId>,
    pub recorded_at: DateTime<Utc>,
    pub hash: String,
}
