use proptest::prelude::*;
use vellum_engine::lifecycle::{allowed_transitions, editable, validate_transition};
use vellum_engine::{FieldEditor, StateController};
use vellum_model::{ContractStatus, FieldUpdate};
use vellum_test_utils::{advance, contract_from_spec, engine_with_users, name_only_spec};

fn any_status() -> impl Strategy<Value = ContractStatus> {
    prop_oneof![
        Just(ContractStatus::Created),
        Just(ContractStatus::Approved),
        Just(ContractStatus::Sent),
        Just(ContractStatus::Signed),
        Just(ContractStatus::Locked),
        Just(ContractStatus::Revoked),
    ]
}

proptest! {
    #[test]
    fn prop_validation_agrees_with_the_table(from in any_status(), to in any_status()) {
        let allowed = allowed_transitions(from);
        let res = validate_transition(from, to);

        if res.is_ok() {
            prop_assert!(allowed.contains(&to));
        } else {
            prop_assert!(!allowed.contains(&to));
        }
    }
}

/// A shortest path from CREATED into each reachable state.
fn path_to(status: ContractStatus) -> &'static [ContractStatus] {
    use ContractStatus::*;
    match status {
        Created => &[],
        Approved => &[Approved],
        Sent => &[Approved, Sent],
        Signed => &[Approved, Sent, Signed],
        Locked => &[Approved, Sent, Signed, Locked],
        Revoked => &[Revoked],
    }
}

#[test]
fn edit_gate_matches_editable_in_every_state() {
    let (engine, _directory, users) = engine_with_users(1);
    let user = users[0];

    for status in ContractStatus::ALL {
        let contract = contract_from_spec(&engine, name_only_spec(), user);
        advance(&engine, contract.id, user, path_to(status));
        assert_eq!(engine.current_status(contract.id).unwrap(), status);

        let outcome = engine.update_fields(contract.id, &[FieldUpdate::new("Name", "x")]);
        assert_eq!(
            outcome.is_ok(),
            editable(status),
            "edit gate disagrees with editable() in {status}"
        );
    }
}

#[test]
fn every_state_is_reachable_and_the_engine_agrees_with_the_table() {
    let (engine, _directory, users) = engine_with_users(1);
    let user = users[0];

    for status in ContractStatus::ALL {
        let contract = contract_from_spec(&engine, name_only_spec(), user);
        advance(&engine, contract.id, user, path_to(status));

        let mut expected = allowed_transitions(status);
        let mut actual = engine.allowed_transitions(contract.id).unwrap();
        expected.sort_by_key(|s| s.as_str());
        actual.sort_by_key(|s| s.as_str());
        assert_eq!(actual, expected);
    }
}
