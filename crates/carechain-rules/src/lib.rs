//! # carechain-rules
//!
//! A TOML-driven claim verification engine for the CareChain ledger.
//!
//! ## Overview
//!
//! This crate provides [`RuleBasedClaimVerifier`], which implements the
//! [`ClaimVerifier`](carechain_core::traits::ClaimVerifier) trait. Three hard
//! checks (policy, coverage, documents) run first; a claim that passes them
//! is scored and classified against the configured thresholds.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use carechain_rules::RuleBasedClaimVerifier;
//!
//! let verifier = RuleBasedClaimVerifier::default();
//! let assessment = verifier.evaluate(&claim, Some(&policy));
//! ```

pub mod engine;
pub mod rule;

pub use engine::RuleBasedClaimVerifier;
pub use rule::{AmountTier, VerificationRules};

// ── Tests ─────────────────────────────────────────────────────────────────────
