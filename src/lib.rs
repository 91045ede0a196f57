//! Reviewer rota: reviewer assignment for team pull requests.
//!
//! The crate picks reviewers for new pull requests, replaces reviewers on
//! request or when they leave the active roster, merges pull requests
//! idempotently, and cascades team deactivation into reviewer reassignment.
//!
//! # Architecture
//!
//! The review core follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Reviewer selection, caching and lifecycle orchestration
//!
//! # Modules
//!
//! - [`review`]: Reviewer assignment and pull request lifecycle
//! - [`http`]: JSON HTTP surface over the review services
//! - [`config`]: Environment-driven server configuration
//! - [`telemetry`]: `tracing` subscriber setup

pub mod config;
pub mod http;
pub mod review;
pub mod telemetry;
