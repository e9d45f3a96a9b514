//! # carechain-ledger
//!
//! Append-only, SHA-256 hash-linked block ledger with proof-of-work sealing.
//!
//! ## Overview
//!
//! Every block commits to its predecessor through `previous_hash` and is
//! sealed by a `Sealer` before it is pushed. Tampering with any hashed
//! field of a committed block breaks its own hash; rewriting a link breaks
//! the linkage check. Both are detected by `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use carechain_ledger::{InMemoryLedger, ProofOfWorkSealer};
//! use carechain_core::traits::Ledger;
//!
//! let ledger = InMemoryLedger::new(Box::new(ProofOfWorkSealer::new(2)?), "genesis");
//! ledger.append(payload)?;
//! assert!(ledger.verify());
//! ```

pub mod chain;
pub mod memory;
pub mod seal;

pub use chain::{compute_hash, find_first_invalid, meets_difficulty, verify_chain};
pub use memory::InMemoryLedger;
pub use seal::{seal_in_background, NoopSealer, ProofOfWorkSealer};

// ── Tests ─────────────────────────────────────────────────────────────────────
