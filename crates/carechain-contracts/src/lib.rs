//! # carechain-contracts
//!
//! Shared types for the CareChain health-insurance ledger.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions, configuration and error types.

pub mod block;
pub mod config;
pub mod error;
pub mod query;
pub mod records;
pub mod request;
pub mod verify;
