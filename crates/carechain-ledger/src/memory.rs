//! In-memory implementation of `Ledger`.
//!
//! `InMemoryLedger` keeps every block in a `Vec` behind a `Mutex`. The lock
//! is held for the whole read-tip → build → seal → push sequence, so two
//! appends can never interleave and both link to the same tip.

use std::{
    sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError},
    thread,
};

use chrono::Utc;
use tracing::{info, warn};

use carechain_contracts::{
    block::{HashBlock, Payload},
    error::{CareChainError, CareChainResult},
    query::ChainSnapshot,
};
use carechain_core::{
    traits::{Ledger, Sealer},
    CancellationToken,
};

use crate::chain::{compute_hash, find_first_invalid};

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of an `InMemoryLedger`.
pub(crate) struct LedgerState {
    /// All blocks in append order; never empty (genesis is always first).
    pub(crate) blocks: Vec<HashBlock>,
}

// ── Public ledger ─────────────────────────────────────────────────────────────

/// An in-memory, append-only ledger sealed by a pluggable `Sealer`.
pub struct InMemoryLedger {
    sealer: Box<dyn Sealer>,
    pub(crate) state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    /// Create a ledger holding only the genesis block.
    ///
    /// Genesis is hashed at nonce 0 but not sealed: it is created once and
    /// trusted, so it need not meet the difficulty target. Its timestamp is
    /// fixed, so the genesis hash depends only on the message.
    pub fn new(sealer: Box<dyn Sealer>, genesis_message: impl Into<String>) -> Self {
        let mut genesis = HashBlock::genesis(genesis_message);
        genesis.hash = compute_hash(&genesis);

        Self {
            sealer,
            state: Mutex::new(LedgerState { blocks: vec![genesis] }),
        }
    }

    pub fn difficulty(&self) -> u32 {
        self.sealer.difficulty()
    }

    /// The block at `index`, if the chain is that long.
    pub fn block(&self, index: u64) -> Option<HashBlock> {
        let state = self.read_state();
        usize::try_from(index).ok().and_then(|i| state.blocks.get(i).cloned())
    }

    /// Append on a worker thread.
    ///
    /// The worker takes the same lock as `append`, so ordering with other
    /// writers is preserved. The receiver yields the sealed block, or
    /// `SealCancelled` if `cancel` fires first.
    pub fn append_in_background(
        self: &Arc<Self>,
        payload: Payload,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<CareChainResult<HashBlock>> {
        let (tx, rx) = mpsc::channel();
        let ledger = Arc::clone(self);
        thread::spawn(move || {
            let result = ledger.append_with_cancel(payload, &cancel);
            let _ = tx.send(result);
        });
        rx
    }

    fn read_state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Ledger impl ───────────────────────────────────────────────────────────────

impl Ledger for InMemoryLedger {
    fn append(&self, payload: Payload) -> CareChainResult<HashBlock> {
        self.append_with_cancel(payload, &CancellationToken::new())
    }

    /// Build a block on top of the tip, seal it and push it.
    ///
    /// Returns `Err(LedgerWriteFailed)` only if the internal mutex is
    /// poisoned, and `Err(SealCancelled)` if sealing is cancelled; in both
    /// cases the chain is unchanged.
    fn append_with_cancel(
        &self,
        payload: Payload,
        cancel: &CancellationToken,
    ) -> CareChainResult<HashBlock> {
        let mut state = self.state.lock().map_err(|e| CareChainError::LedgerWriteFailed {
            reason: format!("ledger state lock poisoned: {}", e),
        })?;

        let (index, previous_hash) = match state.blocks.last() {
            Some(tip) => (tip.index + 1, tip.hash.clone()),
            None => {
                return Err(CareChainError::LedgerWriteFailed {
                    reason: "ledger has no genesis block".to_string(),
                })
            }
        };

        let kind = payload.kind();
        let mut block = HashBlock::unsealed(index, Utc::now(), payload, previous_hash);
        self.sealer.seal(&mut block, cancel)?;

        info!(
            index = block.index,
            kind = ?kind,
            nonce = block.nonce,
            hash = %block.hash,
            "block appended"
        );

        state.blocks.push(block.clone());
        Ok(block)
    }

    fn verify(&self) -> bool {
        self.first_invalid_block().is_none()
    }

    fn first_invalid_block(&self) -> Option<u64> {
        let state = self.read_state();
        let invalid = find_first_invalid(&state.blocks);
        if let Some(index) = invalid {
            warn!(index, "chain integrity check failed");
        }
        invalid
    }

    fn blocks(&self) -> Vec<HashBlock> {
        self.read_state().blocks.clone()
    }

    fn tip(&self) -> HashBlock {
        let state = self.read_state();
        // `new` always seeds genesis and nothing removes blocks.
        state.blocks[state.blocks.len() - 1].clone()
    }

    fn block_count(&self) -> usize {
        self.read_state().blocks.len()
    }

    fn export(&self) -> ChainSnapshot {
        let state = self.read_state();
        ChainSnapshot {
            blocks: state.blocks.clone(),
            exported_at: Utc::now(),
            tip_hash: state.blocks.last().map(|b| b.hash.clone()).unwrap_or_default(),
        }
    }
}
