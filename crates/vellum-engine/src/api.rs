//! Operational trait surface
//!
//! The excluded HTTP/presentation layer consumes these traits; the engine
//! consumes `UserDirectory` from the external identity collaborator. All
//! operations are synchronous: one call, one unit of work, one result.

use crate::error::EngineError;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashSet;
use vellum_model::{
    BlueprintId, BlueprintSpec, BlueprintView, ContractFieldView, ContractId, ContractStatus,
    ContractView, EntryId, FieldUpdate, HistoryEntryView, UserId,
};

/// Existence check for acting users. Identity issuance, authentication and
/// removal live with the collaborator behind this seam.
pub trait UserDirectory: Send + Sync {
    fn exists(&self, user_id: UserId) -> bool;
}

/// In-memory directory used by the binary, the simulator and the tests.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    users: RwLock<HashSet<UserId>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> UserId {
        let user_id = UserId::new();
        self.users.write().insert(user_id);
        user_id
    }

    pub fn remove(&self, user_id: UserId) -> bool {
        self.users.write().remove(&user_id)
    }
}

impl UserDirectory for StaticDirectory {
    fn exists(&self, user_id: UserId) -> bool {
        self.users.read().contains(&user_id)
    }
}

/// Proof of one applied transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionReceipt {
    pub contract_id: ContractId,
    pub previous_status: ContractStatus,
    pub new_status: ContractStatus,
    pub entry_id: EntryId,
    pub recorded_at: DateTime<Utc>,
}

/// Outcome of a ledger audit for one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub contract_id: ContractId,
    pub entries_checked: usize,
    pub chain_intact: bool,
    /// The newest entry's `new_status` equals the live contract status.
    pub head_matches_status: bool,
}

impl IntegrityReport {
    pub fn valid(&self) -> bool {
        self.chain_intact && self.head_matches_status
    }
}

pub trait BlueprintCatalog {
    fn create_blueprint(&self, spec: BlueprintSpec) -> Result<BlueprintView, EngineError>;
    fn get_blueprint(&self, blueprint_id: BlueprintId) -> Result<BlueprintView, EngineError>;
    fn list_blueprints(&self) -> Vec<BlueprintView>;

    /// Removes a blueprint and its owned field schemas. Blocked with
    /// `Conflict` while any contract references the blueprint.
    fn delete_blueprint(&self, blueprint_id: BlueprintId) -> Result<(), EngineError>;
}

pub trait ContractOperations {
    fn create_contract(
        &self,
        blueprint_id: BlueprintId,
        user_id: UserId,
    ) -> Result<ContractView, EngineError>;

    fn get_contract(&self, contract_id: ContractId) -> Result<ContractView, EngineError>;
    fn list_contracts(&self, status_filter: Option<ContractStatus>) -> Vec<ContractView>;
}

pub trait StateController {
    fn transition(
        &self,
        contract_id: ContractId,
        new_status: ContractStatus,
        user_id: UserId,
    ) -> Result<TransitionReceipt, EngineError>;

    fn current_status(&self, contract_id: ContractId) -> Result<ContractStatus, EngineError>;
    fn allowed_transitions(
        &self,
        contract_id: ContractId,
    ) -> Result<Vec<ContractStatus>, EngineError>;
}

pub trait FieldEditor {
    /// Applies the whole batch or nothing. Labels with no matching field
    /// value are skipped without error.
    fn update_fields(
        &self,
        contract_id: ContractId,
        updates: &[FieldUpdate],
    ) -> Result<(), EngineError>;

    fn read_fields(&self, contract_id: ContractId)
        -> Result<Vec<ContractFieldView>, EngineError>;
}

pub trait HistoryAuditor {
    fn history(&self, contract_id: ContractId) -> Result<Vec<HistoryEntryView>, EngineError>;
    fn verify_history(&self, contract_id: ContractId) -> Result<IntegrityReport, EngineError>;
}
