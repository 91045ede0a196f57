//! Error types for review domain validation and state checks.

use super::{PullRequestId, UserId};
use thiserror::Error;

/// Errors returned while constructing or mutating review domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewDomainError {
    /// The team name is empty after trimming.
    #[error("team name must not be empty")]
    EmptyTeamName,

    /// The user name is empty after trimming.
    #[error("user name must not be empty")]
    EmptyUserName,

    /// The pull request title is empty after trimming.
    #[error("pull request title must not be empty")]
    EmptyTitle,

    /// A text value exceeds the 255-character storage limit.
    #[error("{0} exceeds 255 character limit")]
    TextTooLong(&'static str),

    /// The author was proposed as their own reviewer.
    #[error("user {0} cannot review their own pull request")]
    ReviewerIsAuthor(UserId),

    /// The same reviewer was proposed for both slots.
    #[error("user {0} cannot occupy both reviewer slots")]
    DuplicateReviewer(UserId),

    /// Slot 2 was populated while slot 1 is empty.
    #[error("second reviewer slot cannot be filled while the first is empty")]
    SlotOrderViolated,

    /// The operation requires an open pull request.
    #[error("cannot reassign merged pull request {0}")]
    PullRequestMerged(PullRequestId),

    /// The reviewer does not occupy either slot on the pull request.
    #[error("reviewer {reviewer} is not assigned to pull request {pull_request}")]
    ReviewerNotAssigned {
        /// Pull request that was inspected.
        pull_request: PullRequestId,
        /// Reviewer that was expected in a slot.
        reviewer: UserId,
    },
}

/// Error returned while parsing pull request status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown pull request status: {0}")]
pub struct ParsePullRequestStatusError(pub String);
