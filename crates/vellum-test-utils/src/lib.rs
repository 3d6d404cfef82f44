//! Testing utilities for the Vellum workspace
//!
//! Shared fixtures: a directory with seeded users, blueprint specs of
//! varying shapes, and helpers for walking a contract through the
//! lifecycle.

use std::sync::Arc;
use vellum_engine::{
    BlueprintCatalog, ContractOperations, EngineHandle, StateController, StaticDirectory,
    TransitionReceipt,
};
use vellum_model::{BlueprintSpec, ContractId, ContractStatus, ContractView, FieldSpec, UserId};

/// Engine backed by a static directory with `users` registered identities.
pub fn engine_with_users(users: usize) -> (EngineHandle, Arc<StaticDirectory>, Vec<UserId>) {
    let directory = Arc::new(StaticDirectory::new());
    let ids = (0..users).map(|_| directory.register()).collect();
    (EngineHandle::new(directory.clone()), directory, ids)
}

/// A realistic two-party agreement: text, date and signature slots.
pub fn nda_blueprint_spec() -> BlueprintSpec {
    BlueprintSpec {
        title: "Mutual NDA".to_string(),
        description: "Two-party non-disclosure agreement".to_string(),
        body_text: "The parties agree to keep shared information confidential.".to_string(),
        fields: vec![
            FieldSpec::new("Name", "text").at(80, 120),
            FieldSpec::new("Effective date", "date").at(80, 160),
            FieldSpec::new("Signature", "signature")
                .at(80, 640)
                .position_label("bottom-left"),
        ],
    }
}

/// Minimal single-field blueprint.
pub fn name_only_spec() -> BlueprintSpec {
    BlueprintSpec {
        title: "Name only".to_string(),
        description: String::new(),
        body_text: String::new(),
        fields: vec![FieldSpec::new("Name", "text")],
    }
}

/// Create a contract from a fresh blueprint built from `spec`.
pub fn contract_from_spec(
    engine: &EngineHandle,
    spec: BlueprintSpec,
    user: UserId,
) -> ContractView {
    let blueprint = engine
        .create_blueprint(spec)
        .unwrap_or_else(|err| panic!("fixture blueprint rejected: {err}"));
    engine
        .create_contract(blueprint.id, user)
        .unwrap_or_else(|err| panic!("fixture contract rejected: {err}"))
}

/// Apply each transition in order, returning the receipts.
pub fn advance(
    engine: &EngineHandle,
    contract_id: ContractId,
    user: UserId,
    path: &[ContractStatus],
) -> Vec<TransitionReceipt> {
    path.iter()
        .map(|target| {
            engine
                .transition(contract_id, *target, user)
                .unwrap_or_else(|err| panic!("fixture transition to {target} rejected: {err}"))
        })
        .collect()
}

/// Walk a fresh contract all the way to `LOCKED`.
pub fn locked_contract(engine: &EngineHandle, user: UserId) -> ContractId {
    let contract = contract_from_spec(engine, nda_blueprint_spec(), user);
    advance(
        engine,
        contract.id,
        user,
        &[
            ContractStatus::Approved,
            ContractStatus::Sent,
            ContractStatus::Signed,
            ContractStatus::Locked,
        ],
    );
    contract.id
}
