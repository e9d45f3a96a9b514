//! Chain-level configuration.
//!
//! `ChainConfig` is deserialized from the `[chain]` table of the runtime TOML
//! file. Every field has a default so an empty table is valid.

use serde::{Deserialize, Serialize};

use crate::error::{CareChainError, CareChainResult};

/// Highest accepted proof-of-work difficulty.
///
/// Each extra leading zero multiplies expected sealing work by 16; beyond
/// this the seal loop no longer finishes in practical time.
pub const MAX_DIFFICULTY: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Required leading hex zeros on every sealed block hash.
    pub difficulty: u32,

    /// Tokens minted to the patient when a claim is approved.
    pub approval_reward: u64,

    pub token_name: String,
    pub token_symbol: String,

    /// Message stored in the genesis payload.
    pub genesis_message: String,

    /// Committed claims costing more than this are copied to the archive.
    pub large_claim_threshold: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: 2,
            approval_reward: 100,
            token_name: "CareCoin".to_string(),
            token_symbol: "CARE".to_string(),
            genesis_message: "Genesis Block - Health Insurance Chain".to_string(),
            large_claim_threshold: 50_000,
        }
    }
}

impl ChainConfig {
    /// Reject values the runtime cannot honour.
    pub fn validate(&self) -> CareChainResult<()> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(CareChainError::ConfigError {
                reason: format!(
                    "difficulty {} exceeds the maximum of {}",
                    self.difficulty, MAX_DIFFICULTY
                ),
            });
        }
        if self.token_symbol.trim().is_empty() {
            return Err(CareChainError::ConfigError {
                reason: "token_symbol must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
