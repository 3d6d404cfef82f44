//! Randomized and concurrent harnesses for the engine
//!
//! The simulator replays a seeded stream of valid and invalid operations
//! against a live engine and checks every outcome against its expected
//! classification. The stress harness races transitions from many threads
//! to show that exactly one of two competing next states ever wins.

pub mod simulator;

pub use simulator::{run_simulator, SimReport, SimulatorConfig, Violation};

use crate::api::{BlueprintCatalog, ContractOperations, HistoryAuditor, StateController,
    StaticDirectory};
use crate::handle::EngineHandle;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vellum_model::{BlueprintSpec, ContractStatus, FieldSpec};

#[derive(Debug, Clone)]
pub struct StressReport {
    pub contracts: usize,
    pub threads: usize,
    pub violations: usize,
    pub success: bool,
}

pub struct TestHarness;

impl TestHarness {
    /// Race `threads` workers per contract, each trying to move the same
    /// freshly created contract to `APPROVED` and to `REVOKED`. Both targets
    /// are reachable from `CREATED` and mutually exclusive, so exactly one
    /// attempt per contract may succeed.
    pub fn run_stress_test(contracts: usize, threads: usize) -> StressReport {
        let directory = Arc::new(StaticDirectory::new());
        let user = directory.register();
        let engine = EngineHandle::new(directory);

        let blueprint = engine
            .create_blueprint(BlueprintSpec {
                title: "Stress".to_string(),
                description: String::new(),
                body_text: String::new(),
                fields: vec![FieldSpec::new("Name", "text")],
            })
            .map(|view| view.id);
        let blueprint_id = match blueprint {
            Ok(id) => id,
            Err(_) => {
                return StressReport {
                    contracts,
                    threads,
                    violations: contracts,
                    success: false,
                }
            }
        };

        let mut violations = 0usize;
        for _ in 0..contracts {
            let contract_id = match engine.create_contract(blueprint_id, user) {
                Ok(view) => view.id,
                Err(_) => {
                    violations += 1;
                    continue;
                }
            };

            let wins = AtomicUsize::new(0);
            std::thread::scope(|scope| {
                for worker in 0..threads {
                    let engine = &engine;
                    let wins = &wins;
                    scope.spawn(move || {
                        let target = if worker % 2 == 0 {
                            ContractStatus::Approved
                        } else {
                            ContractStatus::Revoked
                        };
                        if engine.transition(contract_id, target, user).is_ok() {
                            wins.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                }
            });

            if wins.load(Ordering::SeqCst) != 1 {
                violations += 1;
                continue;
            }
            match engine.verify_history(contract_id) {
                Ok(report) if report.valid() && report.entries_checked == 2 => {}
                _ => violations += 1,
            }
        }

        StressReport {
            contracts,
            threads,
            violations,
            success: violations == 0,
        }
    }
}
