//! Block sealers.
//!
//! `ProofOfWorkSealer` searches nonces until the block hash carries the
//! configured number of leading zero hex characters. `NoopSealer` only
//! computes the hash, which keeps tests deterministic and instant.
//!
//! Expected work for difficulty `d` is about `16^d` hash evaluations. The
//! loop is CPU-bound and single-threaded; `seal_in_background` moves it to a
//! worker thread and reports the result over a channel.

use std::{sync::mpsc, sync::Arc, thread};

use tracing::debug;

use carechain_contracts::{
    block::HashBlock,
    config::MAX_DIFFICULTY,
    error::{CareChainError, CareChainResult},
};
use carechain_core::{traits::Sealer, CancellationToken};

use crate::chain::{compute_hash, meets_difficulty};

/// Nonce attempts between cancellation checks.
const CANCEL_POLL_INTERVAL: u64 = 1024;

/// Proof-of-work sealer with a fixed difficulty.
#[derive(Debug, Clone, Copy)]
pub struct ProofOfWorkSealer {
    difficulty: u32,
}

impl ProofOfWorkSealer {
    /// Build a sealer, rejecting difficulties above `MAX_DIFFICULTY`.
    pub fn new(difficulty: u32) -> CareChainResult<Self> {
        if difficulty > MAX_DIFFICULTY {
            return Err(CareChainError::ConfigError {
                reason: format!(
                    "proof-of-work difficulty {} exceeds the maximum of {}",
                    difficulty, MAX_DIFFICULTY
                ),
            });
        }
        Ok(Self { difficulty })
    }
}

impl Sealer for ProofOfWorkSealer {
    fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Hash at the current nonce, then bump the nonce until the target is met.
    fn seal(&self, block: &mut HashBlock, cancel: &CancellationToken) -> CareChainResult<()> {
        block.hash = compute_hash(block);
        let mut attempts: u64 = 0;

        while !meets_difficulty(&block.hash, self.difficulty) {
            attempts += 1;
            if attempts % CANCEL_POLL_INTERVAL == 0 && cancel.is_cancelled() {
                debug!(index = block.index, attempts, "seal cancelled");
                return Err(CareChainError::SealCancelled { index: block.index });
            }
            block.nonce = block.nonce.wrapping_add(1);
            block.hash = compute_hash(block);
        }

        debug!(
            index = block.index,
            nonce = block.nonce,
            attempts,
            difficulty = self.difficulty,
            "block sealed"
        );
        Ok(())
    }
}

/// A sealer that performs no work: difficulty 0, hash computed once.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSealer;

impl Sealer for NoopSealer {
    fn difficulty(&self) -> u32 {
        0
    }

    fn seal(&self, block: &mut HashBlock, _cancel: &CancellationToken) -> CareChainResult<()> {
        block.hash = compute_hash(block);
        Ok(())
    }
}

/// Seal `block` on a worker thread.
///
/// The receiver yields exactly one message: the sealed block, or the error
/// (e.g. `SealCancelled` after `cancel` fires).
pub fn seal_in_background(
    sealer: Arc<dyn Sealer>,
    mut block: HashBlock,
    cancel: CancellationToken,
) -> mpsc::Receiver<CareChainResult<HashBlock>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = sealer.seal(&mut block, &cancel).map(|()| block);
        // The caller may have dropped the receiver; nothing to do then.
        let _ = tx.send(result);
    });
    rx
}
