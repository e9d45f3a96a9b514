//! Verification rule types and configuration schema.
//!
//! `VerificationRules` is deserialized from TOML. Every field has a default
//! matching the standard scoring model, so an empty document is valid.
//!
//! Example in TOML:
//! ```toml
//! required_documents = ["medical_report", "bills", "prescription"]
//! base_score = 50
//! document_weight = 30
//! default_amount_bonus = 5
//! approve_threshold = 80
//! review_threshold = 60
//!
//! [[amount_tiers]]
//! max_ratio = 0.5
//! bonus = 20
//!
//! [[amount_tiers]]
//! max_ratio = 0.8
//! bonus = 15
//! ```

use serde::{Deserialize, Serialize};

use carechain_contracts::error::{CareChainError, CareChainResult};

/// A bonus awarded when treatment cost / coverage is at most `max_ratio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountTier {
    pub max_ratio: f64,
    pub bonus: u32,
}

/// The scoring model applied to claims that pass the hard checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationRules {
    /// Document types every claim must carry. Extra documents are allowed.
    pub required_documents: Vec<String>,

    /// Starting score for every claim that reaches scoring.
    pub base_score: u32,

    /// Maximum score contributed by supporting documents.
    pub document_weight: u32,

    /// Tiers in ascending `max_ratio` order; the first match wins.
    pub amount_tiers: Vec<AmountTier>,

    /// Bonus when the cost ratio exceeds every tier.
    pub default_amount_bonus: u32,

    /// Scores at or above this are approved.
    pub approve_threshold: u32,

    /// Scores at or above this (and below `approve_threshold`) go to manual review.
    pub review_threshold: u32,
}

impl Default for VerificationRules {
    fn default() -> Self {
        Self {
            required_documents: vec![
                "medical_report".to_string(),
                "bills".to_string(),
                "prescription".to_string(),
            ],
            base_score: 50,
            document_weight: 30,
            amount_tiers: vec![
                AmountTier { max_ratio: 0.5, bonus: 20 },
                AmountTier { max_ratio: 0.8, bonus: 15 },
            ],
            default_amount_bonus: 5,
            approve_threshold: 80,
            review_threshold: 60,
        }
    }
}

impl VerificationRules {
    /// Check the rule set for internal consistency.
    pub fn validate(&self) -> CareChainResult<()> {
        if self.approve_threshold > 100 {
            return Err(config_error(format!(
                "approve_threshold {} is above 100",
                self.approve_threshold
            )));
        }
        if self.review_threshold > self.approve_threshold {
            return Err(config_error(format!(
                "review_threshold {} is above approve_threshold {}",
                self.review_threshold, self.approve_threshold
            )));
        }

        let mut previous = 0.0;
        for tier in &self.amount_tiers {
            if !tier.max_ratio.is_finite() || tier.max_ratio <= previous {
                return Err(config_error(format!(
                    "amount tiers must have increasing positive max_ratio values (got {})",
                    tier.max_ratio
                )));
            }
            previous = tier.max_ratio;
        }

        for (i, doc) in self.required_documents.iter().enumerate() {
            if self.required_documents[..i].contains(doc) {
                return Err(config_error(format!("required document '{doc}' is listed twice")));
            }
        }

        Ok(())
    }

    /// Bonus for a given cost / coverage ratio.
    pub fn amount_bonus(&self, ratio: f64) -> u32 {
        self.amount_tiers
            .iter()
            .find(|tier| ratio <= tier.max_ratio)
            .map_or(self.default_amount_bonus, |tier| tier.bonus)
    }
}

fn config_error(reason: String) -> CareChainError {
    CareChainError::ConfigError { reason }
}
