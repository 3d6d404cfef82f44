//! The lifecycle state machine
//!
//! The transition table below is the authoritative contract for status
//! changes; it is checked in exactly one place (`validate_transition`) and
//! nothing else in the workspace compares statuses to decide reachability.
//!
//! `CREATED` is the sole initial state. `LOCKED` and `REVOKED` are terminal
//! and are exactly the states in which field edits are refused.

use crate::error::EngineError;
use vellum_model::ContractStatus;

pub fn allowed_transitions(from: ContractStatus) -> Vec<ContractStatus> {
    use ContractStatus::*;
    match from {
        Created => vec![Approved, Revoked],
        Approved => vec![Sent],
        Sent => vec![Signed, Revoked],
        Signed => vec![Locked],
        Locked => vec![],
        Revoked => vec![],
    }
}

pub fn validate_transition(
    from: ContractStatus,
    to: ContractStatus,
) -> Result<(), EngineError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(EngineError::InvalidTransition { from, to })
    }
}

fn allowed(from: ContractStatus, to: ContractStatus) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}

/// Single gate for field mutation, kept in lockstep with the table's
/// terminal states.
pub fn editable(status: ContractStatus) -> bool {
    !matches!(status, ContractStatus::Locked | ContractStatus::Revoked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editable_is_false_exactly_on_terminal_states() {
        for status in ContractStatus::ALL {
            let terminal = allowed_transitions(status).is_empty();
            assert_eq!(
                editable(status),
                !terminal,
                "editable gate out of sync for {status}"
            );
        }
    }

    #[test]
    fn created_is_reachable_from_nowhere() {
        for status in ContractStatus::ALL {
            assert!(
                !allowed_transitions(status).contains(&ContractStatus::Created),
                "{status} must not transition back to CREATED"
            );
        }
    }

    #[test]
    fn happy_path_reaches_locked() {
        use ContractStatus::*;
        let mut current = Created;
        for next in [Approved, Sent, Signed, Locked] {
            validate_transition(current, next).unwrap();
            current = next;
        }
        assert!(allowed_transitions(current).is_empty());
    }
}
