//! Service-level errors and their classification.

use crate::review::{
    domain::{PullRequestId, ReviewDomainError, TeamId, UserId},
    ports::ReviewRepositoryError,
};
use thiserror::Error;

/// Coarse classification used by boundary layers to pick a response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A team, user, pull request or reviewer-in-pull-request is missing.
    NotFound,
    /// The operation is not valid for the pull request's current status.
    InvalidState,
    /// Reassignment found no eligible replacement.
    NoAvailableReviewer,
    /// A unique field is taken or a concurrent writer won the race.
    Conflict,
    /// Caller-supplied input failed validation.
    InvalidInput,
    /// The persistence layer failed.
    Upstream,
}

impl ErrorKind {
    /// Returns a stable machine-readable code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidState => "invalid_state",
            Self::NoAvailableReviewer => "no_available_reviewer",
            Self::Conflict => "conflict",
            Self::InvalidInput => "invalid_input",
            Self::Upstream => "upstream",
        }
    }
}

/// Errors returned by review services.
#[derive(Debug, Clone, Error)]
pub enum ReviewServiceError {
    /// Domain validation or a state check failed.
    #[error(transparent)]
    Domain(#[from] ReviewDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ReviewRepositoryError),

    /// No team exists with the given identifier.
    #[error("team {0} not found")]
    TeamNotFound(TeamId),

    /// No user exists with the given identifier.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// No pull request exists with the given identifier.
    #[error("pull request {0} not found")]
    PullRequestNotFound(PullRequestId),

    /// Every active candidate of the team is already assigned or absent.
    #[error("no available reviewer in team {team} for pull request {pull_request}")]
    NoAvailableReviewer {
        /// Pull request left one reviewer short.
        pull_request: PullRequestId,
        /// Team whose pool was exhausted.
        team: TeamId,
    },
}

impl ReviewServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => match err {
                ReviewDomainError::EmptyTeamName
                | ReviewDomainError::EmptyUserName
                | ReviewDomainError::EmptyTitle
                | ReviewDomainError::TextTooLong(_) => ErrorKind::InvalidInput,
                ReviewDomainError::ReviewerNotAssigned { .. } => ErrorKind::NotFound,
                ReviewDomainError::PullRequestMerged(_)
                | ReviewDomainError::ReviewerIsAuthor(_)
                | ReviewDomainError::DuplicateReviewer(_)
                | ReviewDomainError::SlotOrderViolated => ErrorKind::InvalidState,
            },
            Self::Repository(err) => match err {
                ReviewRepositoryError::TeamNotFound(_)
                | ReviewRepositoryError::UserNotFound(_)
                | ReviewRepositoryError::PullRequestNotFound(_) => ErrorKind::NotFound,
                ReviewRepositoryError::DuplicateTeamName(_)
                | ReviewRepositoryError::DuplicateUserName(_)
                | ReviewRepositoryError::ReviewersChanged(_) => ErrorKind::Conflict,
                ReviewRepositoryError::PullRequestNotOpen(_) => ErrorKind::InvalidState,
                ReviewRepositoryError::Persistence(_) => ErrorKind::Upstream,
            },
            Self::TeamNotFound(_) | Self::UserNotFound(_) | Self::PullRequestNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::NoAvailableReviewer { .. } => ErrorKind::NoAvailableReviewer,
        }
    }
}

/// Result type for review service operations.
pub type ReviewServiceResult<T> = Result<T, ReviewServiceError>;
