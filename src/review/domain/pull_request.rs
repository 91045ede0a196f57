//! Pull request aggregate and review lifecycle state.

use super::{
    ParsePullRequestStatusError, PullRequestId, PullRequestTitle, ReviewDomainError,
    ReviewerSlot, ReviewerSlots, UserId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review lifecycle state. `Merged` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestStatus {
    /// Awaiting review.
    Open,
    /// Merged; no further reviewer changes are accepted.
    Merged,
}

impl PullRequestStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
        }
    }
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PullRequestStatus {
    type Error = ParsePullRequestStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "MERGED" => Ok(Self::Merged),
            _ => Err(ParsePullRequestStatusError(value.to_owned())),
        }
    }
}

/// Pull request aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    id: PullRequestId,
    title: PullRequestTitle,
    author_id: UserId,
    status: PullRequestStatus,
    reviewers: ReviewerSlots,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPullRequestData {
    /// Persisted identifier.
    pub id: PullRequestId,
    /// Persisted title.
    pub title: PullRequestTitle,
    /// Persisted author.
    pub author_id: UserId,
    /// Persisted lifecycle state.
    pub status: PullRequestStatus,
    /// Persisted reviewer slots.
    pub reviewers: ReviewerSlots,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted merge timestamp.
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Creates an open pull request with no reviewers.
    #[must_use]
    pub fn open(title: PullRequestTitle, author_id: UserId, clock: &impl Clock) -> Self {
        Self {
            id: PullRequestId::new(),
            title,
            author_id,
            status: PullRequestStatus::Open,
            reviewers: ReviewerSlots::empty(),
            created_at: clock.utc(),
            merged_at: None,
        }
    }

    /// Reconstructs a pull request from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPullRequestData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            author_id: data.author_id,
            status: data.status,
            reviewers: data.reviewers,
            created_at: data.created_at,
            merged_at: data.merged_at,
        }
    }

    /// Returns the pull request identifier.
    #[must_use]
    pub const fn id(&self) -> PullRequestId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &PullRequestTitle {
        &self.title
    }

    /// Returns the author.
    #[must_use]
    pub const fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn status(&self) -> PullRequestStatus {
        self.status
    }

    /// Returns the reviewer slots.
    #[must_use]
    pub const fn reviewers(&self) -> &ReviewerSlots {
        &self.reviewers
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the merge timestamp, set once the pull request is merged.
    #[must_use]
    pub const fn merged_at(&self) -> Option<DateTime<Utc>> {
        self.merged_at
    }

    /// Returns whether the pull request is still open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.status, PullRequestStatus::Open)
    }

    /// Checks that reviewer changes are still permitted.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::PullRequestMerged`] when merged.
    pub const fn ensure_open(&self) -> Result<(), ReviewDomainError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ReviewDomainError::PullRequestMerged(self.id))
        }
    }

    /// Locates the slot held by `reviewer`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::ReviewerNotAssigned`] when the reviewer
    /// occupies neither slot.
    pub fn slot_of_reviewer(&self, reviewer: UserId) -> Result<ReviewerSlot, ReviewDomainError> {
        self.reviewers
            .slot_of(reviewer)
            .ok_or(ReviewDomainError::ReviewerNotAssigned {
                pull_request: self.id,
                reviewer,
            })
    }

    /// Overwrites the reviewer slots.
    pub const fn set_reviewers(&mut self, reviewers: ReviewerSlots) {
        self.reviewers = reviewers;
    }

    /// Transitions an open pull request to merged at `merged_at`.
    ///
    /// Returns `false` and leaves the aggregate untouched when it is already
    /// merged, so the first merge timestamp is kept.
    pub fn mark_merged(&mut self, merged_at: DateTime<Utc>) -> bool {
        if !self.is_open() {
            return false;
        }
        self.status = PullRequestStatus::Merged;
        self.merged_at = Some(merged_at);
        true
    }
}
