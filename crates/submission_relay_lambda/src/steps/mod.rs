//! The three workflow steps: stage the artifact, relocate it, tell the submitter.

pub mod fetcher;
pub mod notifier;
pub mod relocator;
