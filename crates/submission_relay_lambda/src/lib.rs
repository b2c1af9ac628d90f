//! AWS-oriented adapters and handlers for the submission relay.
//!
//! This crate owns runtime integration details (Lambda trigger decoding, the
//! HTTP, S3, DynamoDB and Mailgun adapters, and the workflow steps that drive
//! them). Contracts, naming and email composition live in
//! `submission_relay_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod steps;
pub mod telemetry;
