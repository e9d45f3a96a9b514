//! Scenario 2: Inter-Organization Data Sharing
//!
//! The lab sends PAT001's lab results to the hospital. Both organizations
//! are registered with the right permissions, so a DATA_SHARING block is
//! appended. A transfer to an unregistered broker and a transfer from the
//! pharmacy (which holds `data:receive` but not `data:share`) are both
//! refused and leave the ledger untouched.

use carechain_contracts::{block::Payload, error::CareChainResult, request::ShareDataRequest};
use carechain_core::ChainFacade;

use crate::{
    mock_data,
    runtime::{build_facade, RuntimeConfig},
};

fn print_refusal(facade: &ChainFacade, request: ShareDataRequest) -> CareChainResult<()> {
    let before = facade.block_count();
    let shared = facade.share_data_between_orgs(request)?;
    println!("  Authorized:     {}", if shared { "YES" } else { "NO" });
    println!("  Blocks added:   {}", facade.block_count() - before);
    println!();
    Ok(())
}

pub fn run_scenario(config: &RuntimeConfig) -> CareChainResult<()> {
    println!("=== Scenario 2: Inter-Organization Data Sharing ===");
    println!();

    let facade = build_facade(config)?;

    println!("  Registered organizations:");
    for org in facade.organizations() {
        let permissions: Vec<&str> = org.permissions.iter().map(String::as_str).collect();
        println!("    {:<9} {:<26} [{}]", org.id, org.name, permissions.join(", "));
    }
    println!();

    // ── Sub-case A: both parties registered ───────────────────────────────────

    let request = mock_data::lab_results_share();
    println!("  ── Sub-case A: {} → {} ({}) ──", request.from_org, request.to_org, request.data_type);
    let shared = facade.share_data_between_orgs(request)?;
    println!("  Authorized:     {}", if shared { "YES" } else { "NO" });

    if let Some(block) = facade.export_chain().blocks.last() {
        if let Payload::DataSharing(entry) = &block.payload {
            println!("  Share id:       {}", entry.share_id);
            println!("  Block:          #{} {}", block.index, block.hash);
        }
    }
    println!();

    // ── Sub-case B: recipient not registered ──────────────────────────────────

    let request = mock_data::unregistered_share();
    println!("  ── Sub-case B: {} → {} ({}) ──", request.from_org, request.to_org, request.data_type);
    print_refusal(&facade, request)?;

    // ── Sub-case C: sender lacks data:share ───────────────────────────────────

    let request = mock_data::unpermitted_share();
    println!("  ── Sub-case C: {} → {} ({}) ──", request.from_org, request.to_org, request.data_type);
    print_refusal(&facade, request)?;

    println!(
        "  Chain integrity: {} ({} block(s))",
        if facade.is_chain_valid() { "VERIFIED" } else { "FAILED" },
        facade.block_count()
    );
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
