use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vellum_engine::test_harness::{run_simulator, SimulatorConfig, TestHarness};
use vellum_engine::{
    BlueprintCatalog, ContractOperations, EngineHandle, FieldEditor, HistoryAuditor,
    StateController, StaticDirectory,
};
use vellum_model::{BlueprintSpec, ContractStatus, FieldSpec, FieldUpdate, UserId};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Command::new("vellum-engine")
        .version("0.1.0")
        .about("Blueprint-driven contract lifecycle engine")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("demo")
                .about("Run a scripted contract lifecycle end to end"),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run the seeded operation-stream simulator")
                .arg(
                    Arg::new("operations")
                        .long("ops")
                        .default_value("10000")
                        .value_parser(value_parser!(u64))
                        .help("Number of operations to simulate"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("stop-on-violation")
                        .long("stop-on-violation")
                        .action(ArgAction::SetTrue)
                        .help("Stop simulation on first violation"),
                ),
        )
        .subcommand(
            Command::new("stress")
                .about("Race concurrent transitions against shared contracts")
                .arg(
                    Arg::new("contracts")
                        .long("contracts")
                        .default_value("200")
                        .value_parser(value_parser!(usize))
                        .help("Number of contracts to race over"),
                )
                .arg(
                    Arg::new("threads")
                        .long("threads")
                        .default_value("8")
                        .value_parser(value_parser!(usize))
                        .help("Racing threads per contract"),
                ),
        )
        .subcommand(
            Command::new("verify-history")
                .about("Build demo data and audit every contract ledger"),
        );

    match cli.get_matches().subcommand() {
        Some(("demo", _)) => run_demo(),
        Some(("simulate", args)) => {
            let config = SimulatorConfig {
                seed: *args.get_one::<u64>("seed").context("seed")?,
                total_operations: *args.get_one::<u64>("operations").context("ops")?,
                stop_on_first_violation: args.get_flag("stop-on-violation"),
            };
            println!("Running simulator (seed={}, ops={})...", config.seed, config.total_operations);
            println!();
            let report = run_simulator(config);
            println!("{}", report.generate_text());
            std::process::exit(if report.passed() { 0 } else { 1 });
        }
        Some(("stress", args)) => {
            let contracts = *args.get_one::<usize>("contracts").context("contracts")?;
            let threads = *args.get_one::<usize>("threads").context("threads")?;
            println!("Racing {threads} threads over {contracts} contracts...");
            let report = TestHarness::run_stress_test(contracts, threads);
            println!("Stress Report:");
            println!("  Contracts:  {}", report.contracts);
            println!("  Threads:    {}", report.threads);
            println!("  Violations: {}", report.violations);
            println!("  Success:    {}", report.success);
            std::process::exit(if report.success { 0 } else { 1 });
        }
        Some(("verify-history", _)) => run_verify_history(),
        _ => Ok(()),
    }
}

fn demo_engine() -> (EngineHandle, UserId) {
    let directory = Arc::new(StaticDirectory::new());
    let user = directory.register();
    (EngineHandle::new(directory), user)
}

fn nda_spec() -> BlueprintSpec {
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

fn run_demo() -> anyhow::Result<()> {
    let (engine, user) = demo_engine();

    let blueprint = engine.create_blueprint(nda_spec())?;
    println!("Blueprint:");
    println!("{}", serde_json::to_string_pretty(&blueprint)?);

    let contract = engine.create_contract(blueprint.id, user)?;
    println!();
    println!("Contract created with status {}", contract.status);

    engine.update_fields(
        contract.id,
        &[FieldUpdate::new("Name", "Alice Example")],
    )?;

    for target in [
        ContractStatus::Approved,
        ContractStatus::Sent,
        ContractStatus::Signed,
    ] {
        let receipt = engine.transition(contract.id, target, user)?;
        println!(
            "{} -> {} at {}",
            receipt.previous_status, receipt.new_status, receipt.recorded_at
        );
    }

    // Edits are refused once the contract leaves the editable states.
    match engine.update_fields(contract.id, &[FieldUpdate::new("Name", "Mallory")]) {
        Err(err) => println!("Edit after signing: {err}"),
        Ok(()) => anyhow::bail!("edit unexpectedly succeeded after signing"),
    }

    let receipt = engine.transition(contract.id, ContractStatus::Locked, user)?;
    println!("{} -> {}", receipt.previous_status, receipt.new_status);

    match engine.transition(contract.id, ContractStatus::Approved, user) {
        Err(err) => println!("Reopen attempt: {err}"),
        Ok(_) => anyhow::bail!("locked contract unexpectedly transitioned"),
    }

    println!();
    println!("Final contract:");
    println!(
        "{}",
        serde_json::to_string_pretty(&engine.get_contract(contract.id)?)?
    );
    println!();
    println!("History:");
    println!(
        "{}",
        serde_json::to_string_pretty(&engine.history(contract.id)?)?
    );

    Ok(())
}

fn run_verify_history() -> anyhow::Result<()> {
    let (engine, user) = demo_engine();
    let blueprint = engine.create_blueprint(nda_spec())?;

    // A spread of contracts parked in different lifecycle stages.
    let stages: [&[ContractStatus]; 4] = [
        &[],
        &[ContractStatus::Approved, ContractStatus::Sent],
        &[
            ContractStatus::Approved,
            ContractStatus::Sent,
            ContractStatus::Signed,
            ContractStatus::Locked,
        ],
        &[ContractStatus::Revoked],
    ];
    for path in stages {
        let contract = engine.create_contract(blueprint.id, user)?;
        for target in path {
            engine.transition(contract.id, *target, user)?;
        }
    }

    let mut all_valid = true;
    for view in engine.list_contracts(None) {
        let report = engine.verify_history(view.id)?;
        println!(
            "contract {} status={} entries={} valid={}",
            view.id.0,
            view.status,
            report.entries_checked,
            report.valid()
        );
        all_valid &= report.valid();
    }

    println!();
    println!("Ledger integrity: {}", if all_valid { "VALID" } else { "INVALID" });
    std::process::exit(if all_valid { 0 } else { 1 });
}
