//! Shared submission relay domain primitives.
//!
//! This crate owns the event and record contracts, the error taxonomy, object
//! and staging name derivation, and notification email composition. It
//! intentionally excludes AWS SDK, HTTP client and Lambda runtime concerns.

pub mod contract;
pub mod error;
pub mod message;
pub mod storage_keys;
