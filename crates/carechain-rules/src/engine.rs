//! Rule-based claim verification engine.
//!
//! `RuleBasedClaimVerifier` implements the `ClaimVerifier` trait from
//! carechain-core.
//!
//! Evaluation algorithm:
//!
//! 1. No policy, or an inactive one → hard reject ("Invalid or inactive policy").
//! 2. Treatment cost above coverage → hard reject ("Claim amount exceeds coverage").
//! 3. Any required document type absent → hard reject ("Missing required documents").
//! 4. Score = base + min(weight, docs / required × weight) + amount tier bonus,
//!    clamped to 0–100.
//! 5. Score ≥ approve threshold → Approved; ≥ review threshold → ManualReview;
//!    otherwise Rejected ("Failed automated verification").

use std::path::Path;

use tracing::{debug, warn};

use carechain_contracts::{
    error::{CareChainError, CareChainResult},
    records::{Claim, ClaimStatus, Policy},
    verify::{ClaimAssessment, RejectionReason},
};
use carechain_core::traits::ClaimVerifier;

use crate::rule::VerificationRules;

/// A `ClaimVerifier` driven by a `VerificationRules` document.
///
/// ```rust,ignore
/// use carechain_rules::RuleBasedClaimVerifier;
///
/// let verifier = RuleBasedClaimVerifier::from_file(Path::new("config/rules.toml"))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleBasedClaimVerifier {
    rules: VerificationRules,
}

impl RuleBasedClaimVerifier {
    /// Build a verifier from an already-parsed rule set.
    pub fn new(rules: VerificationRules) -> CareChainResult<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    /// Parse `s` as TOML and build a verifier.
    ///
    /// Returns `CareChainError::ConfigError` if the TOML is malformed, does
    /// not match `VerificationRules`, or fails validation.
    pub fn from_toml_str(s: &str) -> CareChainResult<Self> {
        let rules: VerificationRules = toml::from_str(s).map_err(|e| CareChainError::ConfigError {
            reason: format!("failed to parse verification rules TOML: {}", e),
        })?;
        Self::new(rules)
    }

    /// Read the file at `path` and parse it as TOML rules.
    pub fn from_file(path: &Path) -> CareChainResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CareChainError::ConfigError {
            reason: format!("failed to read rules file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn rules(&self) -> &VerificationRules {
        &self.rules
    }

    /// Score a claim that already passed the hard checks.
    fn score(&self, claim: &Claim, policy: &Policy) -> u8 {
        let rules = &self.rules;
        let weight = f64::from(rules.document_weight);

        let document_bonus = if rules.required_documents.is_empty() {
            weight
        } else {
            let ratio = claim.documents.len() as f64 / rules.required_documents.len() as f64;
            (ratio * weight).min(weight)
        };

        let cost_ratio = claim.treatment_cost as f64 / policy.coverage as f64;
        let amount_bonus = f64::from(rules.amount_bonus(cost_ratio));

        let raw = f64::from(rules.base_score) + document_bonus + amount_bonus;
        raw.round().clamp(0.0, 100.0) as u8
    }
}

impl ClaimVerifier for RuleBasedClaimVerifier {
    fn evaluate(&self, claim: &Claim, policy: Option<&Policy>) -> ClaimAssessment {
        debug!(
            claim_id = %claim.claim_id,
            policy_id = %claim.policy_id,
            treatment_cost = claim.treatment_cost,
            documents = claim.documents.len(),
            "evaluating claim"
        );

        let policy = match policy {
            Some(policy) if policy.is_active => policy,
            _ => {
                warn!(claim_id = %claim.claim_id, policy_id = %claim.policy_id, "invalid or inactive policy");
                return ClaimAssessment::hard_reject(RejectionReason::InvalidPolicy);
            }
        };

        if claim.treatment_cost > policy.coverage {
            warn!(
                claim_id = %claim.claim_id,
                treatment_cost = claim.treatment_cost,
                coverage = policy.coverage,
                "claim exceeds coverage"
            );
            return ClaimAssessment::hard_reject(RejectionReason::ExceedsCoverage);
        }

        let missing: Vec<String> = self
            .rules
            .required_documents
            .iter()
            .filter(|required| !claim.documents.iter().any(|doc| &doc.doc_type == *required))
            .cloned()
            .collect();
        if !missing.is_empty() {
            warn!(claim_id = %claim.claim_id, missing = ?missing, "required documents missing");
            return ClaimAssessment::hard_reject(RejectionReason::MissingDocuments { missing });
        }

        let score = self.score(claim, policy);
        let score_value = u32::from(score);

        let assessment = if score_value >= self.rules.approve_threshold {
            ClaimAssessment { status: ClaimStatus::Approved, score, rejection: None }
        } else if score_value >= self.rules.review_threshold {
            ClaimAssessment { status: ClaimStatus::ManualReview, score, rejection: None }
        } else {
            ClaimAssessment {
                status: ClaimStatus::Rejected,
                score,
                rejection: Some(RejectionReason::FailedAutomatedVerification),
            }
        };

        debug!(
            claim_id = %claim.claim_id,
            score,
            status = %assessment.status,
            "claim scored"
        );

        assessment
    }
}
