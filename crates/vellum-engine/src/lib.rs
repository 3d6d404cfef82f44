//! Vellum contract lifecycle engine
//!
//! Blueprints define a body template plus positioned field schemas; a
//! contract instantiates one, carries a value per field, and advances
//! through a fixed approval lifecycle. The transition table lives in
//! [`lifecycle`], the append-only audit trail in [`ledger`], and the
//! registries plus operational surface in [`handle`].

pub mod api;
pub mod error;
pub mod handle;
pub mod ledger;
pub mod lifecycle;
pub mod test_harness;

pub use api::{
    BlueprintCatalog, ContractOperations, FieldEditor, HistoryAuditor, IntegrityReport,
    StateController, StaticDirectory, TransitionReceipt, UserDirectory,
};
pub use error::{EngineError, LedgerError, NotFound, ValidationError};
pub use handle::EngineHandle;
pub use ledger::StatusLedger;

/// Re-export test harness for external use
pub use test_harness::{run_simulator, SimReport, SimulatorConfig, TestHarness};
