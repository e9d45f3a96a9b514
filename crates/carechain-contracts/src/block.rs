//! Block and payload types.
//!
//! A `HashBlock` is one entry in the chain. Its `payload` is a tagged union
//! with one variant per event kind; every consumer matches on it
//! exhaustively. Hashing and sealing live in `carechain-ledger`; this module
//! only defines the shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::records::{ClaimDocument, ClaimStatus};

/// One sealed entry in the chain.
///
/// After sealing, only external tampering can change any field. The ledger
/// itself never mutates a block once it is pushed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashBlock {
    /// Position in the chain. Genesis is 0; each append adds exactly 1.
    pub index: u64,

    /// Creation time (UTC), hashed in RFC 3339 form.
    pub timestamp: DateTime<Utc>,

    /// The event recorded by this block.
    pub payload: Payload,

    /// `hash` of the preceding block, or `GENESIS_PREVIOUS_HASH` for genesis.
    pub previous_hash: String,

    /// Lowercase hex SHA-256 over (index, timestamp, payload, previous_hash, nonce).
    pub hash: String,

    /// Proof-of-work counter. Starts at 0 and only changes while sealing.
    pub nonce: u64,
}

impl HashBlock {
    /// The `previous_hash` carried by the genesis block.
    pub const GENESIS_PREVIOUS_HASH: &'static str = "0";

    /// Creation time of every genesis block, 2024-01-01T00:00:00Z.
    pub const GENESIS_TIMESTAMP_SECS: i64 = 1_704_067_200;

    /// The fixed genesis creation time.
    pub fn genesis_timestamp() -> DateTime<Utc> {
        DateTime::from_timestamp(Self::GENESIS_TIMESTAMP_SECS, 0).unwrap_or_default()
    }

    /// Build the unsealed genesis block for `message`.
    ///
    /// Index, timestamp, previous hash and nonce are all fixed, so two chains
    /// started with the same message share a genesis hash.
    pub fn genesis(message: impl Into<String>) -> Self {
        Self::unsealed(
            0,
            Self::genesis_timestamp(),
            Payload::Genesis { message: message.into() },
            Self::GENESIS_PREVIOUS_HASH,
        )
    }

    /// Build an unsealed block. `hash` is empty until a sealer fills it in.
    pub fn unsealed(
        index: u64,
        timestamp: DateTime<Utc>,
        payload: Payload,
        previous_hash: impl Into<String>,
    ) -> Self {
        Self {
            index,
            timestamp,
            payload,
            previous_hash: previous_hash.into(),
            hash: String::new(),
            nonce: 0,
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

/// Discriminator for `Payload`, useful for filtering without borrowing the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadKind {
    Genesis,
    Policy,
    Claim,
    Reward,
    DataSharing,
}

/// The event carried by a block, tagged by `kind` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Payload {
    Genesis { message: String },
    Policy(PolicyEntry),
    Claim(ClaimEntry),
    Reward(RewardEntry),
    DataSharing(DataSharingEntry),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Genesis { .. } => PayloadKind::Genesis,
            Payload::Policy(_) => PayloadKind::Policy,
            Payload::Claim(_) => PayloadKind::Claim,
            Payload::Reward(_) => PayloadKind::Reward,
            Payload::DataSharing(_) => PayloadKind::DataSharing,
        }
    }

    /// The patient this event concerns, if any.
    ///
    /// Data-sharing grants are organization-to-organization and only carry a
    /// patient id when the request named one.
    pub fn patient_id(&self) -> Option<&str> {
        match self {
            Payload::Genesis { .. } => None,
            Payload::Policy(entry) => Some(&entry.patient_id),
            Payload::Claim(entry) => Some(&entry.patient_id),
            Payload::Reward(entry) => Some(&entry.patient_id),
            Payload::DataSharing(entry) => entry.patient_id.as_deref(),
        }
    }
}

/// Ledger record of an issued policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub policy_id: String,
    pub patient_id: String,
    pub insurance_company: String,
    pub coverage: u64,
    pub premium: u64,
    pub conditions: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub policy_hash: String,
}

/// Ledger record of a claim that reached scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimEntry {
    pub claim_id: String,
    pub policy_id: String,
    pub patient_id: String,
    pub hospital_id: String,
    pub diagnosis: String,
    pub treatment_cost: u64,
    pub documents: Vec<ClaimDocument>,
    pub status: ClaimStatus,
    /// Set only for claims rejected on score.
    pub rejection_reason: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub verification_score: u8,
}

/// Ledger record of a loyalty token grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEntry {
    pub patient_id: String,
    pub amount: u64,
    pub token_symbol: String,
    /// The approved claim that triggered this grant, when there was one.
    pub claim_id: Option<String>,
}

/// Ledger record of an authorized data transfer between organizations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSharingEntry {
    pub share_id: Uuid,
    pub from_org: String,
    pub to_org: String,
    pub data_type: String,
    pub data_hash: String,
    pub patient_id: Option<String>,
    pub authorized: bool,
}
