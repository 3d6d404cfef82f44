use pretty_assertions::assert_eq;
use vellum_engine::{
    BlueprintCatalog, ContractOperations, FieldEditor, HistoryAuditor, StateController,
};
use vellum_model::{BlueprintSpec, ContractStatus, FieldSpec, FieldUpdate};
use vellum_test_utils::{advance, contract_from_spec, engine_with_users, nda_blueprint_spec,
    name_only_spec};

#[test]
fn full_lifecycle_scenario() {
    let (engine, _directory, users) = engine_with_users(1);
    let user = users[0];

    let contract = contract_from_spec(&engine, name_only_spec(), user);
    assert_eq!(contract.status, ContractStatus::Created);
    assert_eq!(contract.fields.len(), 1);
    assert_eq!(contract.fields[0].value, "");

    engine
        .update_fields(contract.id, &[FieldUpdate::new("Name", "Alice")])
        .unwrap();
    let fields = engine.read_fields(contract.id).unwrap();
    assert_eq!(fields[0].value, "Alice");

    advance(
        &engine,
        contract.id,
        user,
        &[
            ContractStatus::Approved,
            ContractStatus::Sent,
            ContractStatus::Signed,
        ],
    );

    // Signed is past the editable window.
    let refused = engine.update_fields(contract.id, &[FieldUpdate::new("Name", "Bob")]);
    assert!(refused.is_err(), "edit after signing must be refused");
    assert_eq!(engine.read_fields(contract.id).unwrap()[0].value, "Alice");

    advance(&engine, contract.id, user, &[ContractStatus::Locked]);
    let reopened = engine.transition(contract.id, ContractStatus::Approved, user);
    assert!(reopened.is_err(), "locked contract must stay locked");
    assert_eq!(
        engine.current_status(contract.id).unwrap(),
        ContractStatus::Locked
    );
}

#[test]
fn creation_snapshots_one_empty_value_per_schema() {
    let (engine, _directory, users) = engine_with_users(1);
    let contract = contract_from_spec(&engine, nda_blueprint_spec(), users[0]);

    let labels: Vec<_> = contract.fields.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, ["Name", "Effective date", "Signature"]);
    assert!(contract.fields.iter().all(|f| f.value.is_empty()));

    let history = engine.history(contract.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].previous_status, None);
    assert_eq!(history[0].new_status, ContractStatus::Created);
}

#[test]
fn read_follows_schema_order_not_edit_order() {
    let (engine, _directory, users) = engine_with_users(1);
    let contract = contract_from_spec(&engine, nda_blueprint_spec(), users[0]);

    engine
        .update_fields(
            contract.id,
            &[
                FieldUpdate::new("Signature", "A. Example"),
                FieldUpdate::new("Name", "Alice Example"),
            ],
        )
        .unwrap();

    let rows = engine.read_fields(contract.id).unwrap();
    assert_eq!(rows[0].label, "Name");
    assert_eq!(rows[0].value, "Alice Example");
    assert_eq!(rows[2].label, "Signature");
    assert_eq!(rows[2].value, "A. Example");
}

#[test]
fn receipts_carry_the_pre_transition_status() {
    let (engine, _directory, users) = engine_with_users(1);
    let user = users[0];
    let contract = contract_from_spec(&engine, name_only_spec(), user);

    let receipts = advance(
        &engine,
        contract.id,
        user,
        &[ContractStatus::Approved, ContractStatus::Sent],
    );
    assert_eq!(receipts[0].previous_status, ContractStatus::Created);
    assert_eq!(receipts[0].new_status, ContractStatus::Approved);
    assert_eq!(receipts[1].previous_status, ContractStatus::Approved);
    assert_eq!(receipts[1].new_status, ContractStatus::Sent);
}

#[test]
fn allowed_transitions_follow_the_table() {
    let (engine, _directory, users) = engine_with_users(1);
    let user = users[0];
    let contract = contract_from_spec(&engine, name_only_spec(), user);

    assert_eq!(
        engine.allowed_transitions(contract.id).unwrap(),
        vec![ContractStatus::Approved, ContractStatus::Revoked]
    );

    advance(&engine, contract.id, user, &[ContractStatus::Approved]);
    assert_eq!(
        engine.allowed_transitions(contract.id).unwrap(),
        vec![ContractStatus::Sent]
    );
}

#[test]
fn status_input_parses_case_insensitively_at_the_boundary() {
    let (engine, _directory, users) = engine_with_users(1);
    let user = users[0];
    let contract = contract_from_spec(&engine, name_only_spec(), user);

    // The presentation layer hands raw strings to the parser, never to the
    // engine; canonical form is all that crosses this seam.
    let target: ContractStatus = "approved".parse().unwrap();
    engine.transition(contract.id, target, user).unwrap();
    assert_eq!(
        engine.current_status(contract.id).unwrap(),
        ContractStatus::Approved
    );
}

#[test]
fn list_contracts_filters_by_status() {
    let (engine, _directory, users) = engine_with_users(1);
    let user = users[0];
    let blueprint = engine.create_blueprint(name_only_spec()).unwrap();

    let first = engine.create_contract(blueprint.id, user).unwrap();
    let second = engine.create_contract(blueprint.id, user).unwrap();
    engine
        .transition(second.id, ContractStatus::Revoked, user)
        .unwrap();

    let created = engine.list_contracts(Some(ContractStatus::Created));
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].id, first.id);

    let all = engine.list_contracts(None);
    assert_eq!(all.len(), 2);
}

#[test]
fn blueprint_round_trip_and_listing() {
    let (engine, _directory, _users) = engine_with_users(0);

    let spec = BlueprintSpec {
        title: "Lease".to_string(),
        description: "Twelve month lease".to_string(),
        body_text: "Tenant agrees to...".to_string(),
        fields: vec![FieldSpec::new("Tenant", "text").at(10, 20).position_label("top-left")],
    };
    let created = engine.create_blueprint(spec).unwrap();

    let fetched = engine.get_blueprint(created.id).unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.fields[0].position_label.as_deref(), Some("top-left"));

    assert_eq!(engine.list_blueprints(), vec![created]);
}

#[test]
fn transition_advances_updated_at() {
    let (engine, _directory, users) = engine_with_users(1);
    let user = users[0];
    let contract = contract_from_spec(&engine, name_only_spec(), user);
    assert_eq!(contract.created_at, contract.updated_at);

    advance(&engine, contract.id, user, &[ContractStatus::Approved]);
    let after = engine.get_contract(contract.id).unwrap();
    assert!(after.updated_at > after.created_at);
}
