//! Data layer for the Vellum contract engine
//!
//! Identifiers, entity records, lifecycle states and the view types handed
//! to the presentation layer. No locking and no storage live here.

pub mod blueprint;
pub mod contract;
pub mod field;
pub mod history;
pub mod ids;
pub mod status;
pub mod views;

pub use blueprint::{Blueprint, BlueprintSpec, FieldSpec};
pub use contract::Contract;
pub use field::{FieldSchema, FieldType, FieldUpdate, FieldValue, ParseFieldTypeError};
pub use history::StatusHistoryEntry;
pub use ids::{BlueprintId, ContractId, EntryId, FieldId, UserId, ValueId};
pub use status::{ContractStatus, ParseStatusError};
pub use views::{
    BlueprintView, ContractFieldView, ContractView, FieldSchemaView, HistoryEntryView,
};
