//! Reviewer assignment and review lifecycle.
//!
//! This module selects reviewers for new pull requests, replaces reviewers on
//! request or when they become inactive, merges pull requests idempotently,
//! and cascades team deactivation into reviewer reassignment. It follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
