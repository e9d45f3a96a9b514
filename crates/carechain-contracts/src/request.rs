//! Request shapes accepted by the chain facade.

use serde::{Deserialize, Serialize};

use crate::records::ClaimDocument;

/// Issue a new policy and record it on the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuePolicyRequest {
    pub policy_id: String,
    pub patient_id: String,
    pub insurance_company: String,
    pub coverage: u64,
    pub premium: u64,
    #[serde(default)]
    pub conditions: Vec<String>,
}

/// Submit a claim against an existing policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitClaimRequest {
    pub claim_id: String,
    pub policy_id: String,
    pub patient_id: String,
    pub hospital_id: String,
    pub diagnosis: String,
    pub treatment_cost: u64,
    #[serde(default)]
    pub documents: Vec<ClaimDocument>,
}

/// Record that one organization shared a data set with another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareDataRequest {
    pub from_org: String,
    pub to_org: String,
    pub data_type: String,
    pub data_hash: String,
    /// Optional subject of the shared data, indexed for patient queries.
    #[serde(default)]
    pub patient_id: Option<String>,
}
