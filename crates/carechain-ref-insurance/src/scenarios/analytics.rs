//! Scenario 5: Chain Analytics
//!
//! The claim lifecycle and the data-sharing transfer are replayed under two
//! rule sets and the resulting chain analytics are compared:
//!
//!   Standard rules: both scored claims approve → approval rate 100.00%.
//!   Strict rules:   base score lowered to 30, so CLM004 (ratio 0.9) lands
//!                   in manual review → approval rate 50.00%.

use carechain_contracts::{error::CareChainResult, query::ChainAnalytics};

use crate::{
    mock_data,
    runtime::{build_facade, RuntimeConfig},
    scenarios::claim_lifecycle,
};

/// Base score of the strict rule set.
const STRICT_BASE_SCORE: u32 = 30;

/// Replay the mock workload under `config` and return the analytics.
pub fn collect(config: &RuntimeConfig) -> CareChainResult<ChainAnalytics> {
    let facade = build_facade(config)?;
    claim_lifecycle::submit_all(&facade)?;
    facade.share_data_between_orgs(mock_data::lab_results_share())?;
    Ok(facade.get_chain_analytics())
}

/// `config` with the strict verification rules applied.
pub fn strict(config: &RuntimeConfig) -> RuntimeConfig {
    let mut strict = config.clone();
    strict.verification.base_score = STRICT_BASE_SCORE;
    strict
}

fn print_analytics(label: &str, analytics: &ChainAnalytics) {
    println!("  ── {} ──", label);
    println!("  Total blocks:   {}", analytics.total_blocks);
    println!("  Policies:       {}", analytics.total_policies);
    println!(
        "  Claims:         {} ({} approved)",
        analytics.total_claims, analytics.approved_claims
    );
    println!("  Approval rate:  {}", analytics.approval_rate_display());
    println!("  Rewards issued: {}", analytics.total_rewards_issued);
    println!(
        "  Chain valid:    {}",
        if analytics.is_chain_valid { "YES" } else { "NO" }
    );
    println!();
}

pub fn run_scenario(config: &RuntimeConfig) -> CareChainResult<()> {
    println!("=== Scenario 5: Chain Analytics ===");
    println!();

    let standard = collect(config)?;
    print_analytics("Standard rules", &standard);

    let strict = collect(&strict(config))?;
    print_analytics(
        &format!("Strict rules (base score {})", STRICT_BASE_SCORE),
        &strict,
    );

    println!("  Scenario 5 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
