//! Blueprints: reusable contract templates
//!
//! A blueprint is immutable once created. Its field schemas are built in the
//! same atomic unit and are only reachable through the owning blueprint.

use crate::ids::BlueprintId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    pub blueprint_id: BlueprintId,
    pub title: String,
    pub description: String,
    pub body_text: String,
    pub created_at: DateTime<Utc>,
}

/// Creation payload for a blueprint plus its full ordered field set.
///
/// `field_type` arrives as a raw tag and is validated during creation; the
/// catalog rejects empty labels and unknown tags, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintSpec {
    pub title: String,
    pub description: String,
    pub body_text: String,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub label: String,
    pub field_type: String,
    pub pos_x: i32,
    pub pos_y: i32,
    pub position_label: Option<String>,
}

impl FieldSpec {
    pub fn new(label: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field_type: field_type.into(),
            pos_x: 0,
            pos_y: 0,
            position_label: None,
        }
    }

    pub fn at(mut self, pos_x: i32, pos_y: i32) -> Self {
        self.pos_x = pos_x;
        self.pos_y = pos_y;
        self
    }

    pub fn position_label(mut self, label: impl Into<String>) -> Self {
        self.position_label = Some(label.into());
        self
    }
}
