//! Runtime configuration and facade wiring.
//!
//! `RuntimeConfig` is one TOML document with a `[chain]` table
//! (`ChainConfig`) and a `[verification]` table (`VerificationRules`).
//! `build_facade` turns it into a ready `ChainFacade` backed by the
//! in-memory ledger, the rule-based verifier and the loyalty token.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use carechain_contracts::{
    config::ChainConfig,
    error::{CareChainError, CareChainResult},
};
use carechain_core::ChainFacade;
use carechain_ledger::{InMemoryLedger, ProofOfWorkSealer};
use carechain_rules::{RuleBasedClaimVerifier, VerificationRules};
use carechain_token::FungibleLedger;

use crate::mock_data::organizations;

/// The configuration shipped with the reference runtime.
pub const DEFAULT_CONFIG: &str = include_str!("../config/carechain.toml");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub chain: ChainConfig,
    pub verification: VerificationRules,
}

impl RuntimeConfig {
    /// Parse and validate a runtime configuration document.
    pub fn from_toml_str(s: &str) -> CareChainResult<Self> {
        let config: RuntimeConfig = toml::from_str(s).map_err(|e| CareChainError::ConfigError {
            reason: format!("failed to parse runtime config TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> CareChainResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CareChainError::ConfigError {
            reason: format!("failed to read runtime config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The embedded `config/carechain.toml`.
    pub fn embedded() -> CareChainResult<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    pub fn validate(&self) -> CareChainResult<()> {
        self.chain.validate()?;
        self.verification.validate()
    }
}

/// Build a facade with the reference organization registry.
pub fn build_facade(config: &RuntimeConfig) -> CareChainResult<ChainFacade> {
    config.validate()?;

    let sealer = ProofOfWorkSealer::new(config.chain.difficulty)?;
    let ledger = InMemoryLedger::new(Box::new(sealer), config.chain.genesis_message.clone());
    let verifier = RuleBasedClaimVerifier::new(config.verification.clone())?;
    let tokens = FungibleLedger::new(
        config.chain.token_name.clone(),
        config.chain.token_symbol.clone(),
    );

    let facade = ChainFacade::new(
        Box::new(ledger),
        Box::new(verifier),
        Box::new(tokens),
        organizations(),
        config.chain.clone(),
    )?;

    info!(
        difficulty = config.chain.difficulty,
        organizations = facade.organizations().len(),
        "reference runtime ready"
    );

    Ok(facade)
}

#[cfg(test)]
mod tests {
    use carechain_contracts::{config::MAX_DIFFICULTY, error::CareChainError};

    use super::{build_facade, RuntimeConfig};

    #[test]
    fn embedded_config_matches_defaults() {
        let config = RuntimeConfig::embedded().unwrap();
        let defaults = RuntimeConfig::default();
        assert_eq!(config.chain, defaults.chain);
        assert_eq!(config.verification, defaults.verification);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = RuntimeConfig::from_toml_str("").unwrap();
        assert_eq!(config.chain.difficulty, 2);
        assert_eq!(config.verification.base_score, 50);
    }

    #[test]
    fn excessive_difficulty_rejected_at_load() {
        let toml = format!("[chain]\ndifficulty = {}\n", MAX_DIFFICULTY + 1);
        assert!(matches!(
            RuntimeConfig::from_toml_str(&toml),
            Err(CareChainError::ConfigError { .. })
        ));
    }

    #[test]
    fn missing_file_is_config_error() {
        let result = RuntimeConfig::from_file(std::path::Path::new("/nonexistent/carechain.toml"));
        match result {
            Err(CareChainError::ConfigError { reason }) => assert!(reason.contains("failed to read")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn built_facade_starts_with_genesis() {
        let mut config = RuntimeConfig::default();
        config.chain.difficulty = 0;
        let facade = build_facade(&config).unwrap();

        assert_eq!(facade.block_count(), 1);
        assert!(facade.is_chain_valid());
        assert!(facade.organization("HOSP001").is_some());
    }
}
