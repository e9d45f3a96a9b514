//! # carechain-core
//!
//! The orchestration layer of the CareChain ledger.
//!
//! This crate provides:
//! - The four seam traits (`Sealer`, `Ledger`, `ClaimVerifier`, `TokenLedger`)
//! - `CancellationToken` for aborting long seals
//! - The `ChainFacade` that turns domain requests into ledger writes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use carechain_core::{ChainFacade, traits::{Ledger, ClaimVerifier, TokenLedger}};
//! ```

pub mod cancel;
pub mod facade;
pub mod traits;

pub use cancel::CancellationToken;
pub use facade::ChainFacade;
