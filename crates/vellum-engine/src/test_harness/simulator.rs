//! Seeded operation-stream simulator
//!
//! Generates a reproducible mix of well-formed and ill-formed operations,
//! classifies each one as should-succeed or should-fail before issuing it,
//! and records a violation whenever the engine disagrees or an audited
//! ledger stops matching the live status.

use crate::api::{
    BlueprintCatalog, ContractOperations, FieldEditor, HistoryAuditor, StateController,
    StaticDirectory,
};
use crate::error::EngineError;
use crate::handle::EngineHandle;
use crate::lifecycle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use vellum_model::{BlueprintId, BlueprintSpec, ContractId, ContractStatus, FieldSpec,
    FieldUpdate, UserId};

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    pub total_operations: u64,
    pub stop_on_first_violation: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            total_operations: 10_000,
            stop_on_first_violation: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExpectedResult {
    ShouldSucceed,
    ShouldFail,
}

/// One observed disagreement between expectation and outcome.
#[derive(Debug, Clone)]
pub struct Violation {
    pub operation_index: u64,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct SimReport {
    pub operations: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub violations: Vec<Violation>,
}

impl SimReport {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn generate_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Simulator Report\n");
        out.push_str("================\n");
        out.push_str(&format!("Operations: {}\n", self.operations));
        out.push_str(&format!("Succeeded:  {}\n", self.succeeded));
        out.push_str(&format!("Rejected:   {}\n", self.failed));
        out.push_str(&format!("Violations: {}\n", self.violations.len()));
        for violation in &self.violations {
            out.push_str(&format!(
                "  [op {}] {}\n",
                violation.operation_index, violation.description
            ));
        }
        out.push_str(if self.passed() { "RESULT: PASS\n" } else { "RESULT: FAIL\n" });
        out
    }
}

struct SimState {
    engine: EngineHandle,
    user: UserId,
    blueprints: Vec<BlueprintId>,
    contracts: Vec<ContractId>,
    rng: StdRng,
}

pub fn run_simulator(config: SimulatorConfig) -> SimReport {
    let directory = Arc::new(StaticDirectory::new());
    let user = directory.register();
    let mut state = SimState {
        engine: EngineHandle::new(directory),
        user,
        blueprints: Vec::new(),
        contracts: Vec::new(),
        rng: StdRng::seed_from_u64(config.seed),
    };
    let mut report = SimReport::default();

    for index in 0..config.total_operations {
        report.operations += 1;
        let outcome = step(&mut state, index);
        match outcome {
            StepOutcome::Ok { succeeded } => {
                if succeeded {
                    report.succeeded += 1;
                } else {
                    report.failed += 1;
                }
            }
            StepOutcome::Violation(description) => {
                report.violations.push(Violation {
                    operation_index: index,
                    description,
                });
                if config.stop_on_first_violation {
                    break;
                }
            }
        }
    }

    report
}

enum StepOutcome {
    Ok { succeeded: bool },
    Violation(String),
}

fn step(state: &mut SimState, index: u64) -> StepOutcome {
    let roll: f64 = state.rng.gen();
    if roll < 0.10 || state.blueprints.is_empty() {
        create_blueprint(state)
    } else if roll < 0.15 {
        create_invalid_blueprint(state)
    } else if roll < 0.35 || state.contracts.is_empty() {
        create_contract(state)
    } else if roll < 0.55 {
        valid_transition(state)
    } else if roll < 0.70 {
        invalid_transition(state)
    } else if roll < 0.85 {
        edit_fields(state, index)
    } else if roll < 0.95 {
        audit_contract(state)
    } else {
        missing_lookups(state)
    }
}

fn check(expected: ExpectedResult, actual: Result<(), EngineError>, what: &str) -> StepOutcome {
    match (expected, actual) {
        (ExpectedResult::ShouldSucceed, Ok(())) => StepOutcome::Ok { succeeded: true },
        (ExpectedResult::ShouldFail, Err(_)) => StepOutcome::Ok { succeeded: false },
        (ExpectedResult::ShouldSucceed, Err(err)) => {
            StepOutcome::Violation(format!("{what}: expected success, got {err}"))
        }
        (ExpectedResult::ShouldFail, Ok(())) => {
            StepOutcome::Violation(format!("{what}: expected rejection, succeeded"))
        }
    }
}

fn create_blueprint(state: &mut SimState) -> StepOutcome {
    let spec = BlueprintSpec {
        title: format!("Blueprint {}", state.blueprints.len()),
        description: String::new(),
        body_text: "Body".to_string(),
        fields: vec![
            FieldSpec::new("Name", "text").at(10, 10),
            FieldSpec::new("Signed on", "date").at(10, 40),
            FieldSpec::new("Signature", "signature").at(10, 70).position_label("bottom-left"),
        ],
    };
    let result = state.engine.create_blueprint(spec);
    match result {
        Ok(view) => {
            state.blueprints.push(view.id);
            StepOutcome::Ok { succeeded: true }
        }
        Err(err) => StepOutcome::Violation(format!("create_blueprint: {err}")),
    }
}

fn create_invalid_blueprint(state: &mut SimState) -> StepOutcome {
    let bad_tag = state.rng.gen_bool(0.5);
    let field = if bad_tag {
        FieldSpec::new("Name", "dropdown")
    } else {
        FieldSpec::new("", "text")
    };
    let spec = BlueprintSpec {
        title: "Broken".to_string(),
        description: String::new(),
        body_text: String::new(),
        fields: vec![field],
    };
    check(
        ExpectedResult::ShouldFail,
        state.engine.create_blueprint(spec).map(|_| ()),
        "create_blueprint(invalid)",
    )
}

fn create_contract(state: &mut SimState) -> StepOutcome {
    let blueprint_id = state.blueprints[state.rng.gen_range(0..state.blueprints.len())];
    match state.engine.create_contract(blueprint_id, state.user) {
        Ok(view) => {
            if view.status != ContractStatus::Created {
                return StepOutcome::Violation(format!(
                    "create_contract: initial status {}",
                    view.status
                ));
            }
            state.contracts.push(view.id);
            StepOutcome::Ok { succeeded: true }
        }
        Err(err) => StepOutcome::Violation(format!("create_contract: {err}")),
    }
}

fn pick_contract(state: &mut SimState) -> ContractId {
    state.contracts[state.rng.gen_range(0..state.contracts.len())]
}

fn valid_transition(state: &mut SimState) -> StepOutcome {
    let contract_id = pick_contract(state);
    let current = match state.engine.current_status(contract_id) {
        Ok(status) => status,
        Err(err) => return StepOutcome::Violation(format!("current_status: {err}")),
    };
    let allowed = lifecycle::allowed_transitions(current);
    if allowed.is_empty() {
        // Terminal contract: any target must be rejected.
        return check(
            ExpectedResult::ShouldFail,
            state
                .engine
                .transition(contract_id, ContractStatus::Approved, state.user)
                .map(|_| ()),
            "transition(terminal)",
        );
    }
    let target = allowed[state.rng.gen_range(0..allowed.len())];
    check(
        ExpectedResult::ShouldSucceed,
        state
            .engine
            .transition(contract_id, target, state.user)
            .map(|_| ()),
        "transition(valid)",
    )
}

fn invalid_transition(state: &mut SimState) -> StepOutcome {
    let contract_id = pick_contract(state);
    let current = match state.engine.current_status(contract_id) {
        Ok(status) => status,
        Err(err) => return StepOutcome::Violation(format!("current_status: {err}")),
    };
    let allowed = lifecycle::allowed_transitions(current);
    let target = ContractStatus::ALL
        .into_iter()
        .find(|s| !allowed.contains(s))
        .unwrap_or(ContractStatus::Created);
    check(
        ExpectedResult::ShouldFail,
        state
            .engine
            .transition(contract_id, target, state.user)
            .map(|_| ()),
        "transition(invalid)",
    )
}

fn edit_fields(state: &mut SimState, index: u64) -> StepOutcome {
    let contract_id = pick_contract(state);
    let current = match state.engine.current_status(contract_id) {
        Ok(status) => status,
        Err(err) => return StepOutcome::Violation(format!("current_status: {err}")),
    };
    let unknown_label = state.rng.gen_bool(0.2);
    let updates = if unknown_label {
        vec![FieldUpdate::new("No such field", "ignored")]
    } else {
        vec![FieldUpdate::new("Name", format!("Party {index}"))]
    };
    let expected = if lifecycle::editable(current) {
        // Unknown labels are skipped, not rejected.
        ExpectedResult::ShouldSucceed
    } else {
        ExpectedResult::ShouldFail
    };
    check(
        expected,
        state.engine.update_fields(contract_id, &updates),
        "update_fields",
    )
}

fn audit_contract(state: &mut SimState) -> StepOutcome {
    let contract_id = pick_contract(state);
    match state.engine.verify_history(contract_id) {
        Ok(report) if report.valid() => StepOutcome::Ok { succeeded: true },
        Ok(report) => StepOutcome::Violation(format!(
            "verify_history: chain_intact={} head_matches_status={}",
            report.chain_intact, report.head_matches_status
        )),
        Err(err) => StepOutcome::Violation(format!("verify_history: {err}")),
    }
}

fn missing_lookups(state: &mut SimState) -> StepOutcome {
    let which = state.rng.gen_range(0..3u8);
    let result = match which {
        0 => state
            .engine
            .create_contract(BlueprintId::new(), state.user)
            .map(|_| ()),
        1 => {
            let blueprint_id = state.blueprints[0];
            state
                .engine
                .create_contract(blueprint_id, UserId::new())
                .map(|_| ())
        }
        _ => state
            .engine
            .transition(ContractId::new(), ContractStatus::Approved, state.user)
            .map(|_| ()),
    };
    check(ExpectedResult::ShouldFail, result, "lookup(missing)")
}
