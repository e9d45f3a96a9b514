//! Result and projection types returned by the chain facade.
//!
//! `PolicyOutcome` and `ClaimOutcome` are what `issue_policy` and
//! `submit_claim` hand back. `PatientRecord` and
//! `ChainAnalytics` are read-only projections over the ledger, and
//! `ChainSnapshot` is an exported copy of the whole chain. `ArchiveRecord`
//! is the off-chain summary kept for high-value claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    block::{ClaimEntry, HashBlock, PolicyEntry, RewardEntry},
    records::{Claim, ClaimStatus, Policy},
};

/// The outcome of issuing a policy.
///
/// `Refused` covers well-typed requests the facade will not record: a zero
/// coverage or premium, or a policy id that is already registered. Nothing
/// is written in that case.
#[derive(Debug, Clone)]
pub enum PolicyOutcome {
    Issued {
        policy: Policy,
        /// Index of the POLICY block.
        block_index: u64,
    },
    Refused {
        policy_id: String,
        reason: String,
    },
}

impl PolicyOutcome {
    /// The content hash of the issued policy, or `None` if it was refused.
    pub fn policy_hash(&self) -> Option<&str> {
        match self {
            PolicyOutcome::Issued { policy, .. } => Some(&policy.policy_hash),
            PolicyOutcome::Refused { .. } => None,
        }
    }

    pub fn is_issued(&self) -> bool {
        matches!(self, PolicyOutcome::Issued { .. })
    }
}

/// The outcome of submitting a claim.
///
/// Callers branch on the variant:
/// - `Committed` → the claim reached scoring and a CLAIM block was appended
///   (its status may still be `ManualReview` or `Rejected` on score)
/// - `Rejected` → a hard rule failed (non-positive cost, duplicate id, policy,
///   coverage or documents); nothing
///   was written to the ledger, but `claim` carries the rejection for the
///   caller's own bookkeeping
#[derive(Debug, Clone)]
pub enum ClaimOutcome {
    Committed {
        claim: Claim,
        /// Index of the CLAIM block.
        block_index: u64,
        /// Index of the REWARD block, present only for approved claims.
        reward_block_index: Option<u64>,
    },
    Rejected {
        claim: Claim,
    },
}

impl ClaimOutcome {
    /// The claim as evaluated, whichever way it went.
    pub fn claim(&self) -> &Claim {
        match self {
            ClaimOutcome::Committed { claim, .. } | ClaimOutcome::Rejected { claim } => claim,
        }
    }

    /// The committed claim, or `None` when nothing reached the ledger.
    pub fn committed(self) -> Option<Claim> {
        match self {
            ClaimOutcome::Committed { claim, .. } => Some(claim),
            ClaimOutcome::Rejected { .. } => None,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, ClaimOutcome::Committed { .. })
    }
}

/// Everything the ledger records about one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient_id: String,
    pub policies: Vec<PolicyEntry>,
    pub claims: Vec<ClaimEntry>,
    pub rewards: Vec<RewardEntry>,
    pub token_balance: u64,
}

/// Aggregate counters over the whole chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainAnalytics {
    /// All blocks, genesis included.
    pub total_blocks: usize,
    pub total_policies: usize,
    pub total_claims: usize,
    pub approved_claims: usize,
    /// Percentage of committed claims that were approved (0.0 with no claims).
    pub approval_rate: f64,
    /// Sum of all REWARD grants.
    pub total_rewards_issued: u64,
    pub is_chain_valid: bool,
}

impl ChainAnalytics {
    /// Render `approval_rate` as a two-decimal percentage, e.g. "66.67%".
    pub fn approval_rate_display(&self) -> String {
        format!("{:.2}%", self.approval_rate)
    }
}

/// A point-in-time export of the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// All blocks in index order (genesis first).
    pub blocks: Vec<HashBlock>,
    pub exported_at: DateTime<Utc>,
    /// The hash of the tip block at export time.
    pub tip_hash: String,
}

/// Summary of a high-value claim kept outside the chain.
///
/// `anchor_hash` is the chain tip at archive time, so the record can later be
/// matched against an exported chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub claim_id: String,
    pub patient_id: String,
    pub amount: u64,
    pub status: ClaimStatus,
    pub anchor_hash: String,
    pub archived_at: DateTime<Utc>,
}
