//! Error taxonomy for engine operations
//!
//! Every error is a synchronous, well-defined outcome of one call. Domain
//! errors (`NotFound`, `Validation`, `InvalidTransition`, `InvalidState`,
//! `Conflict`) report client-visible outcomes; `Ledger` is the storage-side
//! fault class and never overlaps with them.

use thiserror::Error;
use vellum_model::{BlueprintId, ContractId, ContractStatus, UserId};

/// A referenced entity is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotFound {
    #[error("blueprint {0:?} not found")]
    Blueprint(BlueprintId),
    #[error("contract {0:?} not found")]
    Contract(ContractId),
    #[error("user {0:?} not found")]
    User(UserId),
}

/// Malformed blueprint creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field at index {index} has an empty label")]
    EmptyLabel { index: usize },
    #[error("field {label:?} has unrecognized type tag {tag:?}")]
    UnknownFieldType { label: String, tag: String },
}

/// Hash-chain faults raised by the status ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("hash chain broken at entry index {index}")]
    IntegrityViolation { index: usize },
    #[error("entry does not extend the chain head")]
    NonContiguousEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested status is not reachable from the current one. A client
    /// error, not a fault: the contract is left untouched.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        from: ContractStatus,
        to: ContractStatus,
    },

    /// Field edit attempted while the contract sits in a terminal status.
    #[error("contract is {status} and can no longer be edited")]
    InvalidState { status: ContractStatus },

    /// Blueprint deletion blocked while contracts still reference it.
    #[error("blueprint {blueprint_id:?} is referenced by {contracts} contract(s)")]
    Conflict {
        blueprint_id: BlueprintId,
        contracts: usize,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
