//! Hash-chain primitives: block hashing and chain integrity verification.
//!
//! Hash input layout (bytes, in order):
//!   1. index as 8-byte little-endian
//!   2. timestamp as RFC 3339 UTF-8 (nanosecond precision, `Z` suffix)
//!   3. canonical JSON of payload (serde_json, no pretty-printing)
//!   4. previous_hash as UTF-8 bytes
//!   5. nonce as 8-byte little-endian

use chrono::SecondsFormat;
use sha2::{Digest, Sha256};

use carechain_contracts::block::HashBlock;

/// Compute the SHA-256 hash of a block from its five hashed fields.
///
/// The stored `hash` field is not an input, so the result is stable across
/// calls as long as index, timestamp, payload, previous_hash and nonce are
/// unchanged. Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if the payload cannot be serialized to JSON, which cannot happen
/// for the `Payload` type (string keys, no maps with non-string keys).
pub fn compute_hash(block: &HashBlock) -> String {
    let payload_json =
        serde_json::to_vec(&block.payload).expect("Payload must always be serializable to JSON");
    let timestamp = block.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true);

    let mut hasher = Sha256::new();
    hasher.update(block.index.to_le_bytes());
    hasher.update(timestamp.as_bytes());
    hasher.update(&payload_json);
    hasher.update(block.previous_hash.as_bytes());
    hasher.update(block.nonce.to_le_bytes());

    hex::encode(hasher.finalize())
}

/// True if `hash` starts with `difficulty` `'0'` characters.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let prefix = difficulty as usize;
    hash.len() >= prefix && hash.bytes().take(prefix).all(|b| b == b'0')
}

/// Return the index of the first block that breaks the chain, if any.
///
/// Genesis (position 0) is trusted and skipped. For every later block:
///
/// 1. **Hash correctness**: the stored `hash` must equal the value
///    recomputed from the block's own fields.
/// 2. **Linkage**: `previous_hash` must equal the preceding block's `hash`.
///
/// Blocks are scanned in order and the first violation wins. The returned
/// value is the block's position in `blocks`, which equals its index in an
/// untampered chain.
pub fn find_first_invalid(blocks: &[HashBlock]) -> Option<u64> {
    for (position, pair) in blocks.windows(2).enumerate() {
        let (previous, block) = (&pair[0], &pair[1]);
        let position = position as u64 + 1;

        if block.hash != compute_hash(block) {
            return Some(position);
        }

        if block.previous_hash != previous.hash {
            return Some(position);
        }
    }

    None
}

/// Verify the integrity of a chain. An empty or genesis-only chain is valid.
pub fn verify_chain(blocks: &[HashBlock]) -> bool {
    find_first_invalid(blocks).is_none()
}
