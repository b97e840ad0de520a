//! Shared test utilities for the agentops-pack workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`repo`]: [`TestRepo`](repo::TestRepo), a temporary target or pack tree
//! - [`markers`]: builders for managed-section marker text

pub mod markers;
pub mod repo;
