//! Cooperative cancellation for long-running seals.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// A cloneable flag that a sealer polls between nonce attempts.
///
/// All clones share the same flag, so one handle can be given to a worker
/// thread while the caller keeps another to cancel it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::CancellationToken;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let worker = token.clone();
        assert!(!worker.is_cancelled());

        token.cancel();
        assert!(worker.is_cancelled());
    }
}
