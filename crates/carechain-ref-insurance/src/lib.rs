//! # carechain-ref-insurance
//!
//! Health-insurance reference runtime for the CareChain ledger.
//!
//! Demonstrates five scenarios using mock data:
//!
//! 1. **Claim Lifecycle**: policies issued, claims approved with loyalty
//!    rewards, hard rejections that never reach the ledger.
//! 2. **Data Sharing**: authorized transfers between registered
//!    organizations, and a refused transfer to an unknown one.
//! 3. **Tamper Detection**: an exported chain is edited and the first
//!    invalid block is located.
//! 4. **Background Sealing**: proof-of-work on a worker thread, including
//!    cancellation.
//! 5. **Chain Analytics**: aggregate counters under standard and strict
//!    verification rules.
//!
//! All data is hardcoded and fictional. Nothing is persisted.

pub mod mock_data;
pub mod runtime;
pub mod scenarios;

pub use runtime::{build_facade, RuntimeConfig, DEFAULT_CONFIG};
