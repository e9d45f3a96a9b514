//! Scenario 1: Claim Lifecycle
//!
//! Two policies are issued, then four claims are submitted against them:
//!
//!   CLM001 → APPROVED (score 100)   → CLAIM block + REWARD block
//!   CLM002 → cost above coverage    → rejected, nothing written
//!   CLM003 → prescription missing   → rejected, nothing written
//!   CLM004 → APPROVED (score 85)    → CLAIM block + REWARD block
//!
//! The patient then redeems part of the reward at the pharmacy, and a
//! separate high-value claim (CLM005) is committed and archived off-chain.

use carechain_contracts::{error::CareChainResult, query::ClaimOutcome};
use carechain_core::ChainFacade;

use crate::{
    mock_data,
    runtime::{build_facade, RuntimeConfig},
};

/// Tokens PAT001 spends at PHARM001 at the end of the scenario.
const REDEMPTION: u64 = 40;

fn print_outcome(outcome: &ClaimOutcome) {
    let claim = outcome.claim();
    println!("  Claim {} ({} against {})", claim.claim_id, claim.treatment_cost, claim.policy_id);
    match outcome {
        ClaimOutcome::Committed {
            block_index,
            reward_block_index,
            ..
        } => {
            println!("  Status:         {}", claim.status);
            println!("  Score:          {}", claim.verification_score);
            println!("  CLAIM block:    #{}", block_index);
            match reward_block_index {
                Some(index) => println!("  REWARD block:   #{}", index),
                None => println!("  REWARD block:   none"),
            }
        }
        ClaimOutcome::Rejected { .. } => {
            println!("  Status:         {}", claim.status);
            println!(
                "  Reason:         {}",
                claim.rejection_reason.as_deref().unwrap_or("unspecified")
            );
            println!("  Ledger:         unchanged");
        }
    }
    println!();
}

/// Issue both mock policies and submit the four mock claims.
///
/// Returns the outcomes in submission order.
pub fn submit_all(facade: &ChainFacade) -> CareChainResult<Vec<ClaimOutcome>> {
    facade.issue_policy(mock_data::primary_policy())?;
    facade.issue_policy(mock_data::secondary_policy())?;

    let claims = [
        mock_data::approvable_claim(),
        mock_data::over_coverage_claim(),
        mock_data::undocumented_claim(),
        mock_data::high_ratio_claim(),
    ];

    claims
        .into_iter()
        .map(|request| facade.submit_claim(request))
        .collect()
}

pub fn run_scenario(config: &RuntimeConfig) -> CareChainResult<()> {
    println!("=== Scenario 1: Claim Lifecycle ===");
    println!();

    let facade = build_facade(config)?;

    println!("  Difficulty:     {}", config.chain.difficulty);
    println!(
        "  Reward:         {} {} ({})",
        config.chain.approval_reward,
        config.chain.token_symbol,
        facade.token_name()
    );
    println!();

    let outcomes = submit_all(&facade)?;

    for policy_id in ["POL001", "POL002"] {
        if let Some(policy) = facade.get_policy(policy_id) {
            println!(
                "  Policy {} for {}: coverage {}, premium {}",
                policy.policy_id, policy.patient_id, policy.coverage, policy.premium
            );
            println!("    hash {}", policy.policy_hash);
        }
    }
    println!();

    for outcome in &outcomes {
        print_outcome(outcome);
    }

    // ── Archive a large claim ─────────────────────────────────────────────────

    facade.issue_policy(mock_data::premium_policy())?;
    let large = facade.submit_claim(mock_data::large_claim())?;
    print_outcome(&large);
    match facade.archive_large_claim(large.claim())? {
        Some(record) => {
            println!(
                "  Archived {} ({} > {})",
                record.claim_id, record.amount, config.chain.large_claim_threshold
            );
            println!("    anchored to {}", record.anchor_hash);
        }
        None => println!("  {} not archived", large.claim().claim_id),
    }
    println!();

    // ── Redeem tokens ─────────────────────────────────────────────────────────

    let redeemed = facade.transfer_tokens("PAT001", "PHARM001", REDEMPTION)?;
    println!(
        "  Redeem {} {} at PHARM001: {}",
        REDEMPTION,
        config.chain.token_symbol,
        if redeemed { "OK" } else { "INSUFFICIENT BALANCE" }
    );

    let record = facade.get_patient_record("PAT001");
    println!(
        "  PAT001: {} policy, {} claim(s), {} reward(s), balance {}",
        record.policies.len(),
        record.claims.len(),
        record.rewards.len(),
        record.token_balance
    );
    println!();

    println!(
        "  Chain integrity: {} ({} block(s))",
        if facade.is_chain_valid() { "VERIFIED" } else { "FAILED" },
        facade.block_count()
    );
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
