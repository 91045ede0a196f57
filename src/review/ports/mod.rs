//! Port contracts for reviewer assignment.
//!
//! Ports define infrastructure-agnostic interfaces used by review services.

pub mod repository;

#[cfg(test)]
pub use repository::MockReviewRepository;
pub use repository::{
    MergeOutcome, ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult,
};
