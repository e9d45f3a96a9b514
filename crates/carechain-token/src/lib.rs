//! # carechain-token
//!
//! The loyalty token ledger behind CareChain rewards.
//!
//! [`FungibleLedger`] implements the
//! [`TokenLedger`](carechain_core::traits::TokenLedger) trait: minting grows
//! the total supply, transfers move balances without changing it, and
//! unknown addresses read as zero.

pub mod ledger;

pub use ledger::FungibleLedger;
