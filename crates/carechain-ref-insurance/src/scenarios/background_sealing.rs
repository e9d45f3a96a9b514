//! Scenario 4: Background Sealing and Cancellation
//!
//! Proof-of-work runs on a worker thread while the caller keeps control:
//!
//!   Sub-case A: a REWARD block is appended in the background at the
//!               configured difficulty and received once sealed.
//!   Sub-case B: an append at the maximum difficulty is cancelled. The
//!               worker reports `SealCancelled` and the chain is unchanged.

use std::sync::Arc;

use carechain_contracts::{
    block::{Payload, RewardEntry},
    config::MAX_DIFFICULTY,
    error::{CareChainError, CareChainResult},
};
use carechain_core::{traits::Ledger, CancellationToken};
use carechain_ledger::{InMemoryLedger, ProofOfWorkSealer};

use crate::runtime::RuntimeConfig;

fn reward(config: &RuntimeConfig, patient_id: &str) -> Payload {
    Payload::Reward(RewardEntry {
        patient_id: patient_id.to_string(),
        amount: config.chain.approval_reward,
        token_symbol: config.chain.token_symbol.clone(),
        claim_id: None,
    })
}

fn ledger(difficulty: u32, config: &RuntimeConfig) -> CareChainResult<Arc<InMemoryLedger>> {
    let sealer = ProofOfWorkSealer::new(difficulty)?;
    Ok(Arc::new(InMemoryLedger::new(
        Box::new(sealer),
        config.chain.genesis_message.clone(),
    )))
}

fn worker_gone() -> CareChainError {
    CareChainError::LedgerWriteFailed {
        reason: "sealing worker exited without reporting".to_string(),
    }
}

/// Append one block in the background and wait for it.
pub fn append_and_wait(config: &RuntimeConfig) -> CareChainResult<Arc<InMemoryLedger>> {
    let ledger = ledger(config.chain.difficulty, config)?;
    let rx = ledger.append_in_background(reward(config, "PAT001"), CancellationToken::new());
    rx.recv().map_err(|_| worker_gone())??;
    Ok(ledger)
}

/// Start an append at `MAX_DIFFICULTY`, cancel it, and return the worker's
/// result together with the ledger.
pub fn append_and_cancel(
    config: &RuntimeConfig,
) -> CareChainResult<(Arc<InMemoryLedger>, CareChainResult<u64>)> {
    let ledger = ledger(MAX_DIFFICULTY, config)?;
    let cancel = CancellationToken::new();
    let rx = ledger.append_in_background(reward(config, "PAT002"), cancel.clone());
    cancel.cancel();
    let result = rx.recv().map_err(|_| worker_gone())?.map(|block| block.index);
    Ok((ledger, result))
}

pub fn run_scenario(config: &RuntimeConfig) -> CareChainResult<()> {
    println!("=== Scenario 4: Background Sealing ===");
    println!();

    // ── Sub-case A: seal and receive ──────────────────────────────────────────

    println!("  ── Sub-case A: background append at difficulty {} ──", config.chain.difficulty);
    let ledger = append_and_wait(config)?;
    let tip = ledger.tip();
    println!("  Sealed block:   #{}", tip.index);
    println!("  Nonce:          {}", tip.nonce);
    println!("  Hash:           {}", tip.hash);
    println!(
        "  Chain integrity: {}",
        if ledger.verify() { "VERIFIED" } else { "FAILED" }
    );
    println!();

    // ── Sub-case B: cancel mid-seal ───────────────────────────────────────────

    println!("  ── Sub-case B: background append at difficulty {}, cancelled ──", MAX_DIFFICULTY);
    let (ledger, result) = append_and_cancel(config)?;
    match result {
        Ok(index) => println!("  Sealed block #{} before cancellation took effect", index),
        Err(e) => println!("  Worker result:  {}", e),
    }
    println!("  Chain length:   {} block(s)", ledger.block_count());
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
