//! CareChain Health-Insurance Reference Runtime: Demo CLI
//!
//! Runs one or all of the health-insurance demo scenarios. Each scenario
//! builds a real chain (proof-of-work ledger, rule-based claim verifier,
//! loyalty token) and drives it with mock participants.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- claim-lifecycle
//!   cargo run -p demo -- --difficulty 3 tamper-detection
//!   cargo run -p demo -- --config carechain.toml analytics
//!   cargo run -p demo -- export

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use carechain_contracts::error::{CareChainError, CareChainResult};
use carechain_ref_insurance::{
    build_facade,
    scenarios::{analytics, background_sealing, claim_lifecycle, data_sharing, tamper_detection},
    RuntimeConfig,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// CareChain: a hash-linked health-insurance ledger demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "CareChain health-insurance reference runtime demo",
    long_about = "Runs CareChain demo scenarios showing policy issuance, claim verification,\n\
                  loyalty rewards, data sharing, and chain integrity checks."
)]
struct Cli {
    /// Runtime configuration file. Defaults to the embedded configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the proof-of-work difficulty from the configuration.
    #[arg(long, global = true)]
    difficulty: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all five scenarios in sequence.
    RunAll,
    /// Scenario 1: Claim Lifecycle (approve, reward, hard rejections).
    ClaimLifecycle,
    /// Scenario 2: Data Sharing (registered vs. unknown organizations).
    DataSharing,
    /// Scenario 3: Tamper Detection (edited export, first invalid block).
    TamperDetection,
    /// Scenario 4: Background Sealing (worker thread, cancellation).
    BackgroundSealing,
    /// Scenario 5: Chain Analytics (standard vs. strict rules).
    Analytics,
    /// Replay the claim lifecycle and print the chain as JSON.
    Export,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(2);
        }
    };

    let quiet = matches!(cli.command, Command::Export);
    if !quiet {
        print_banner(&config);
    }

    let result = match cli.command {
        Command::RunAll => run_all(&config),
        Command::ClaimLifecycle => claim_lifecycle::run_scenario(&config),
        Command::DataSharing => data_sharing::run_scenario(&config),
        Command::TamperDetection => tamper_detection::run_scenario(&config),
        Command::BackgroundSealing => background_sealing::run_scenario(&config),
        Command::Analytics => analytics::run_scenario(&config),
        Command::Export => run_export(&config),
    };

    match result {
        Ok(()) => {
            if !quiet {
                println!("All selected scenarios completed successfully.");
            }
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> CareChainResult<RuntimeConfig> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::from_file(path)?,
        None => RuntimeConfig::embedded()?,
    };
    if let Some(difficulty) = cli.difficulty {
        config.chain.difficulty = difficulty;
        config.validate()?;
    }
    debug!(difficulty = config.chain.difficulty, "runtime config loaded");
    Ok(config)
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all(config: &RuntimeConfig) -> CareChainResult<()> {
    claim_lifecycle::run_scenario(config)?;
    data_sharing::run_scenario(config)?;
    tamper_detection::run_scenario(config)?;
    background_sealing::run_scenario(config)?;
    analytics::run_scenario(config)?;
    Ok(())
}

fn run_export(config: &RuntimeConfig) -> CareChainResult<()> {
    let facade = build_facade(config)?;
    claim_lifecycle::submit_all(&facade)?;

    let json = serde_json::to_string_pretty(&facade.export_chain()).map_err(|e| {
        CareChainError::LedgerWriteFailed {
            reason: format!("failed to serialize chain export: {}", e),
        }
    })?;
    println!("{}", json);
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner(config: &RuntimeConfig) {
    println!();
    println!("CareChain: Health-Insurance Ledger");
    println!("Reference Demo");
    println!("==================================");
    println!();
    println!("CareChain pipeline per request:");
    println!("  [1] Request validated (positive amounts, unique ids, registered orgs)");
    println!("  [2] Claims: policy, coverage and document checks → score → status");
    println!("  [3] Payload sealed into a block (difficulty {})", config.chain.difficulty);
    println!("  [4] Block linked to the tip by SHA-256 and appended");
    println!(
        "  [5] Approved claims mint {} {} to the patient",
        config.chain.approval_reward, config.chain.token_symbol
    );
    println!();
}
