//! Runtime error types for the CareChain ledger.
//!
//! All fallible operations return `CareChainResult<T>`. Domain rejections
//! (a refused policy, a claim failing verification, an unknown organization
//! in a sharing request, an underfunded transfer) are NOT errors; they are
//! modelled as data in the returned values. Error variants cover broken
//! invariants on the write path and configuration problems.

use thiserror::Error;

/// The unified error type for the CareChain runtime.
#[derive(Debug, Error)]
pub enum CareChainError {
    /// The ledger could not append a block.
    #[error("ledger write failed: {reason}")]
    LedgerWriteFailed { reason: String },

    /// Sealing was cancelled before a valid nonce was found; nothing was appended.
    #[error("sealing of block {index} was cancelled")]
    SealCancelled { index: u64 },

    /// The token ledger rejected a mutation (overflow or poisoned state).
    #[error("token ledger error: {reason}")]
    TokenError { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the CareChain crates.
pub type CareChainResult<T> = Result<T, CareChainError>;
