//! Health-insurance reference scenarios.
//!
//! Each scenario builds its own chain from a `RuntimeConfig`, drives it with
//! the mock participants in `mock_data`, and prints what the ledger recorded.

pub mod analytics;
pub mod background_sealing;
pub mod claim_lifecycle;
pub mod data_sharing;
pub mod tamper_detection;
