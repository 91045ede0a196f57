//! Repository port for teams, users and pull requests.
//!
//! This is the persistence gateway consumed by the review services. Adapters
//! must make [`ReviewRepository::replace_reviewers`] and
//! [`ReviewRepository::merge_pull_request`] atomic with respect to concurrent
//! callers; the services rely on them instead of holding locks.

use crate::review::domain::{
    PullRequest, PullRequestId, ReviewerSlots, Team, TeamId, TeamName, User, UserId, UserName,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for review repository operations.
pub type ReviewRepositoryResult<T> = Result<T, ReviewRepositoryError>;

/// Outcome of a merge request against storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The pull request was open and is now merged.
    Merged(PullRequest),
    /// The pull request had already been merged; it is returned unchanged.
    AlreadyMerged(PullRequest),
}

/// Review persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Stores a new team.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::DuplicateTeamName`] when the name is
    /// taken.
    async fn create_team(&self, team: &Team) -> ReviewRepositoryResult<()>;

    /// Finds a team by identifier.
    async fn find_team(&self, id: TeamId) -> ReviewRepositoryResult<Option<Team>>;

    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::TeamNotFound`] when the team does not
    /// exist or [`ReviewRepositoryError::DuplicateUserName`] when the name is
    /// taken.
    async fn create_user(&self, user: &User) -> ReviewRepositoryResult<()>;

    /// Finds a user by identifier.
    async fn find_user(&self, id: UserId) -> ReviewRepositoryResult<Option<User>>;

    /// Returns the active members of a team.
    async fn active_team_members(&self, team_id: TeamId) -> ReviewRepositoryResult<Vec<User>>;

    /// Returns every member of a team, active or not.
    async fn team_members(&self, team_id: TeamId) -> ReviewRepositoryResult<Vec<User>>;

    /// Marks a user inactive.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::UserNotFound`] when the user does not
    /// exist.
    async fn deactivate_user(&self, id: UserId) -> ReviewRepositoryResult<()>;

    /// Marks a user active.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::UserNotFound`] when the user does not
    /// exist.
    async fn activate_user(&self, id: UserId) -> ReviewRepositoryResult<()>;

    /// Stores a new open pull request.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::UserNotFound`] when the author does
    /// not exist.
    async fn create_pull_request(&self, pull_request: &PullRequest) -> ReviewRepositoryResult<()>;

    /// Finds a pull request by identifier.
    async fn find_pull_request(
        &self,
        id: PullRequestId,
    ) -> ReviewRepositoryResult<Option<PullRequest>>;

    /// Atomically swaps the reviewer slots of an open pull request.
    ///
    /// The write only happens while the stored slots still equal `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::PullRequestNotFound`] when the pull
    /// request does not exist, [`ReviewRepositoryError::PullRequestNotOpen`]
    /// when it has been merged, or [`ReviewRepositoryError::ReviewersChanged`]
    /// when another writer changed the slots first.
    async fn replace_reviewers(
        &self,
        id: PullRequestId,
        expected: ReviewerSlots,
        replacement: ReviewerSlots,
    ) -> ReviewRepositoryResult<PullRequest>;

    /// Merges an open pull request at `merged_at`.
    ///
    /// Already merged pull requests are reported as
    /// [`MergeOutcome::AlreadyMerged`] and keep their original timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::PullRequestNotFound`] when the pull
    /// request does not exist.
    async fn merge_pull_request(
        &self,
        id: PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> ReviewRepositoryResult<MergeOutcome>;

    /// Returns pull requests where `reviewer` holds either slot, oldest first.
    async fn pull_requests_by_reviewer(
        &self,
        reviewer: UserId,
    ) -> ReviewRepositoryResult<Vec<PullRequest>>;

    /// Returns open pull requests authored by members of a team, oldest first.
    async fn open_pull_requests_by_team(
        &self,
        team_id: TeamId,
    ) -> ReviewRepositoryResult<Vec<PullRequest>>;

    /// Counts review assignments per reviewer across all pull requests.
    async fn review_load_stats(&self) -> ReviewRepositoryResult<HashMap<UserId, u64>>;
}

/// Errors returned by review repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReviewRepositoryError {
    /// The team was not found.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    /// The user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The pull request was not found.
    #[error("pull request not found: {0}")]
    PullRequestNotFound(PullRequestId),

    /// A team with the same name already exists.
    #[error("duplicate team name: {0}")]
    DuplicateTeamName(TeamName),

    /// A user with the same name already exists.
    #[error("duplicate user name: {0}")]
    DuplicateUserName(UserName),

    /// The pull request is no longer open.
    #[error("pull request {0} is not open")]
    PullRequestNotOpen(PullRequestId),

    /// The reviewer slots changed between read and write.
    #[error("reviewers of pull request {0} were modified concurrently")]
    ReviewersChanged(PullRequestId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReviewRepositoryError {
    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
