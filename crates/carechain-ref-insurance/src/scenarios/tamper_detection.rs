//! Scenario 3: Tamper Detection
//!
//! The claim lifecycle is replayed, the chain is exported, and the export
//! is then altered two ways:
//!
//!   Sub-case A: CLM001's treatment cost is inflated in place.
//!               The block's own hash no longer matches → detected at CLM001.
//!   Sub-case B: the attacker also recomputes CLM001's hash.
//!               The next block's `previous_hash` no longer matches → detected
//!               at the block after CLM001.
//!
//! The live chain is never modified; only the exported copy is.

use carechain_contracts::{
    block::{HashBlock, Payload},
    error::CareChainResult,
};
use carechain_ledger::{compute_hash, find_first_invalid, verify_chain};

use crate::{
    runtime::{build_facade, RuntimeConfig},
    scenarios::claim_lifecycle,
};

/// Amount the attacker writes into the claim.
const INFLATED_COST: u64 = 74_999;

/// Position of the first CLAIM block in `blocks`.
fn first_claim_position(blocks: &[HashBlock]) -> Option<usize> {
    blocks
        .iter()
        .position(|b| matches!(b.payload, Payload::Claim(_)))
}

/// Overwrite the treatment cost of the CLAIM block at `position`.
pub fn inflate_claim(blocks: &mut [HashBlock], position: usize, cost: u64) {
    if let Some(Payload::Claim(entry)) = blocks.get_mut(position).map(|b| &mut b.payload) {
        entry.treatment_cost = cost;
    }
}

fn describe(blocks: &[HashBlock]) -> String {
    match find_first_invalid(blocks) {
        Some(index) => format!("FAILED (first invalid block: #{})", index),
        None => "VERIFIED".to_string(),
    }
}

pub fn run_scenario(config: &RuntimeConfig) -> CareChainResult<()> {
    println!("=== Scenario 3: Tamper Detection ===");
    println!();

    let facade = build_facade(config)?;
    claim_lifecycle::submit_all(&facade)?;

    let snapshot = facade.export_chain();
    println!("  Exported {} block(s), tip {}", snapshot.blocks.len(), snapshot.tip_hash);
    println!("  Export integrity: {}", describe(&snapshot.blocks));
    println!();

    let Some(position) = first_claim_position(&snapshot.blocks) else {
        println!("  No CLAIM block to tamper with.");
        return Ok(());
    };

    // ── Sub-case A: payload edited, hash left alone ───────────────────────────

    println!("  ── Sub-case A: inflate CLM001 to {} ──", INFLATED_COST);
    let mut edited = snapshot.blocks.clone();
    inflate_claim(&mut edited, position, INFLATED_COST);
    println!("  Export integrity: {}", describe(&edited));
    println!();

    // ── Sub-case B: payload edited and hash recomputed ────────────────────────

    println!("  ── Sub-case B: inflate CLM001 and recompute its hash ──");
    let mut rehashed = snapshot.blocks.clone();
    inflate_claim(&mut rehashed, position, INFLATED_COST);
    rehashed[position].hash = compute_hash(&rehashed[position]);
    println!("  Export integrity: {}", describe(&rehashed));
    println!();

    println!(
        "  Live chain integrity: {} ({} block(s))",
        if facade.is_chain_valid() { "VERIFIED" } else { "FAILED" },
        facade.block_count()
    );
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn exported_blocks() -> Vec<HashBlock> {
        let mut config = RuntimeConfig::default();
        config.chain.difficulty = 1;
        let facade = build_facade(&config).unwrap();
        claim_lifecycle::submit_all(&facade).unwrap();
        facade.export_chain().blocks
    }

    #[test]
    fn test_untouched_export_verifies() {
        let blocks = exported_blocks();
        assert!(verify_chain(&blocks));
        assert_eq!(find_first_invalid(&blocks), None);
    }

    #[test]
    fn test_edited_payload_detected_at_that_block() {
        let mut blocks = exported_blocks();
        let position = first_claim_position(&blocks).unwrap();
        inflate_claim(&mut blocks, position, INFLATED_COST);

        assert!(!verify_chain(&blocks));
        assert_eq!(find_first_invalid(&blocks), Some(position as u64));
    }

    #[test]
    fn test_rehashed_block_breaks_next_link() {
        let mut blocks = exported_blocks();
        let position = first_claim_position(&blocks).unwrap();
        inflate_claim(&mut blocks, position, INFLATED_COST);
        blocks[position].hash = compute_hash(&blocks[position]);

        assert_eq!(find_first_invalid(&blocks), Some(position as u64 + 1));
    }

    #[test]
    fn test_run_scenario_succeeds() {
        let mut config = RuntimeConfig::default();
        config.chain.difficulty = 0;
        assert!(run_scenario(&config).is_ok());
    }
}
