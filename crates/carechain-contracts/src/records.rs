//! Domain records owned by the chain facade.
//!
//! `Policy` and `Claim` are created once from a request and kept in the
//! facade's registries. `Organization` entries form a static registry built
//! when the facade is constructed.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An issued insurance policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub policy_id: String,
    pub patient_id: String,
    pub insurance_company: String,
    /// Maximum amount a single claim may request, in whole currency units.
    pub coverage: u64,
    pub premium: u64,
    pub conditions: Vec<String>,
    /// Claims against an inactive policy are rejected outright.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Hex SHA-256 over (policy_id, patient_id, coverage, premium).
    pub policy_hash: String,
}

/// Lifecycle status of a claim.
///
/// A claim starts `Pending` and the verification engine moves it to exactly
/// one terminal status. It is never revised afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    #[default]
    Pending,
    Approved,
    ManualReview,
    Rejected,
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ClaimStatus::Pending => "PENDING",
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::ManualReview => "MANUAL_REVIEW",
            ClaimStatus::Rejected => "REJECTED",
        };
        f.write_str(label)
    }
}

/// A supporting document attached to a claim, identified by type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimDocument {
    /// Document category, e.g. "medical_report", "bills", "prescription".
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Digest of the document contents, supplied by the submitter.
    pub hash: String,
}

impl ClaimDocument {
    pub fn new(doc_type: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            hash: hash.into(),
        }
    }
}

/// A submitted insurance claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: String,
    pub policy_id: String,
    pub patient_id: String,
    pub hospital_id: String,
    pub diagnosis: String,
    pub treatment_cost: u64,
    pub documents: Vec<ClaimDocument>,
    pub status: ClaimStatus,
    pub rejection_reason: Option<String>,
    pub submitted_at: DateTime<Utc>,
    /// 0–100, set once by the verification engine.
    pub verification_score: u8,
}

/// A participant registered with the chain (insurer, hospital, lab, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub org_type: String,
    pub permissions: BTreeSet<String>,
    /// Opaque identity token. Never used for signature checks.
    pub public_key: String,
}

impl Organization {
    /// Return true if the organization holds the named permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}
