//! Contract records
//!
//! A contract references exactly one blueprint (protected: the blueprint
//! cannot be deleted while the contract exists) and the creating user.
//! `status` is the single source of truth gating every field mutation;
//! `updated_at` advances on every successful transition or field edit.

use crate::ids::{BlueprintId, ContractId, UserId};
use crate::status::ContractStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub contract_id: ContractId,
    pub blueprint_id: BlueprintId,
    pub created_by: UserId,
    pub status: ContractStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
