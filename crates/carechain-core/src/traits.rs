//! Core trait definitions for the CareChain ledger.
//!
//! These four traits are the seams the facade is wired through:
//!
//! - `Sealer`       : proof-of-work (or no-op) sealing of a candidate block
//! - `Ledger`       : the append-only block sequence and its integrity check
//! - `ClaimVerifier`: the deterministic claim decision function
//! - `TokenLedger`  : loyalty token balances
//!
//! The facade only ever talks to these traits, so each component can be
//! swapped for a test double.

use carechain_contracts::{
    block::{HashBlock, Payload},
    error::CareChainResult,
    query::ChainSnapshot,
    records::{Claim, Policy},
    verify::ClaimAssessment,
};

use crate::cancel::CancellationToken;

/// Finds a nonce that makes a block's hash satisfy the difficulty target.
///
/// Implementations must only mutate `nonce` and `hash`. On success,
/// `block.hash` equals the digest recomputed from the block's fields and
/// starts with `difficulty()` `'0'` characters.
pub trait Sealer: Send + Sync {
    /// Number of required leading zero hex characters.
    fn difficulty(&self) -> u32;

    /// Seal `block` in place.
    ///
    /// Returns `CareChainError::SealCancelled` if `cancel` fires before a
    /// valid nonce is found. The block is then left in an unspecified,
    /// unsealed state and must not be appended.
    fn seal(&self, block: &mut HashBlock, cancel: &CancellationToken) -> CareChainResult<()>;
}

/// The append-only chain of sealed blocks.
///
/// The sequence starts with a trusted genesis block. `append` is the only
/// mutator and must run as a single critical section: read tip, build,
/// seal, push.
pub trait Ledger: Send + Sync {
    /// Seal `payload` into a new block after the current tip and push it.
    fn append(&self, payload: Payload) -> CareChainResult<HashBlock>;

    /// Like `append`, aborting the seal when `cancel` fires.
    fn append_with_cancel(
        &self,
        payload: Payload,
        cancel: &CancellationToken,
    ) -> CareChainResult<HashBlock>;

    /// True if every block after genesis hashes correctly and links to its
    /// predecessor.
    fn verify(&self) -> bool;

    /// The first index that fails verification, scanning in index order.
    fn first_invalid_block(&self) -> Option<u64>;

    /// A copy of every block, genesis first.
    fn blocks(&self) -> Vec<HashBlock>;

    /// The most recently appended block.
    fn tip(&self) -> HashBlock;

    /// Number of blocks including genesis. Never zero.
    fn block_count(&self) -> usize;

    /// Export the chain with its tip hash.
    fn export(&self) -> ChainSnapshot;
}

/// The claim verification engine.
///
/// Implementations must be pure: identical inputs give identical output,
/// with no I/O and no randomness.
pub trait ClaimVerifier: Send + Sync {
    /// Decide the claim. `policy` is `None` when the claim references an
    /// unknown policy id.
    fn evaluate(&self, claim: &Claim, policy: Option<&Policy>) -> ClaimAssessment;
}

/// A fungible token balance ledger.
pub trait TokenLedger: Send + Sync {
    /// Credit `amount` to `address`, growing the total supply by the same amount.
    fn mint(&self, address: &str, amount: u64) -> CareChainResult<()>;

    /// Move `amount` from `from` to `to`.
    ///
    /// Returns `Ok(false)` without mutating anything when `from` holds less
    /// than `amount`.
    fn transfer(&self, from: &str, to: &str, amount: u64) -> CareChainResult<bool>;

    /// Balance of `address`; 0 for addresses never seen.
    fn balance_of(&self, address: &str) -> u64;

    fn total_supply(&self) -> u64;

    /// Display name, e.g. "CareCoin".
    fn name(&self) -> &str;

    fn symbol(&self) -> &str;
}
