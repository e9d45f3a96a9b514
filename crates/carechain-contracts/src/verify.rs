//! Claim assessment types produced by the verification engine.

use serde::{Deserialize, Serialize};

use crate::records::ClaimStatus;

/// Why a claim was rejected.
///
/// Every variant except `FailedAutomatedVerification` is a *hard* rejection:
/// the claim never reaches scoring and is never committed to the ledger.
/// `FailedAutomatedVerification` is a score-based rejection of a claim that
/// was scored and committed. `NonPositiveCost` and `DuplicateClaim` are
/// decided by the facade before the verifier runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    NonPositiveCost,
    DuplicateClaim,
    InvalidPolicy,
    ExceedsCoverage,
    MissingDocuments { missing: Vec<String> },
    FailedAutomatedVerification,
}

impl RejectionReason {
    pub fn is_hard(&self) -> bool {
        !matches!(self, RejectionReason::FailedAutomatedVerification)
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            RejectionReason::NonPositiveCost => "Treatment cost must be positive",
            RejectionReason::DuplicateClaim => "Claim id already submitted",
            RejectionReason::InvalidPolicy => "Invalid or inactive policy",
            RejectionReason::ExceedsCoverage => "Claim amount exceeds coverage",
            RejectionReason::MissingDocuments { .. } => "Missing required documents",
            RejectionReason::FailedAutomatedVerification => "Failed automated verification",
        };
        f.write_str(message)
    }
}

/// The verdict of the claim verification engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimAssessment {
    /// Never `Pending`.
    pub status: ClaimStatus,
    /// 0–100. Hard rejections score 0.
    pub score: u8,
    /// Present exactly when `status` is `Rejected`.
    pub rejection: Option<RejectionReason>,
}

impl ClaimAssessment {
    /// A rejection decided before scoring.
    pub fn hard_reject(reason: RejectionReason) -> Self {
        Self {
            status: ClaimStatus::Rejected,
            score: 0,
            rejection: Some(reason),
        }
    }

    /// True if the claim was rejected before reaching scoring.
    pub fn is_hard_rejection(&self) -> bool {
        self.rejection.as_ref().is_some_and(RejectionReason::is_hard)
    }
}
