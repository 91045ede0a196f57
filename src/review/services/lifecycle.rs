//! Pull request creation, reviewer reassignment and merge.
//!
//! Reviewer writes go through the repository's compare-and-swap primitive, so
//! two requests racing on the same pull request cannot corrupt its slots: the
//! loser receives a conflict and may retry. Operations are plain futures;
//! dropping one cancels it at its next persistence call, while writes that
//! already committed stay committed.

use super::{
    ActiveMemberCache, ReviewServiceError, ReviewServiceResult, ReviewerSelector,
};
use crate::review::{
    domain::{
        PullRequest, PullRequestId, PullRequestTitle, ReviewerSlots, User, UserId,
    },
    ports::{MergeOutcome, ReviewRepository},
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request payload for opening a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePullRequestRequest {
    title: String,
    author_id: UserId,
}

impl CreatePullRequestRequest {
    /// Creates a request for a pull request authored by `author_id`.
    #[must_use]
    pub fn new(title: impl Into<String>, author_id: UserId) -> Self {
        Self {
            title: title.into(),
            author_id,
        }
    }
}

/// A reviewer swapped out of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerReplacement {
    /// Pull request after the swap.
    pub pull_request: PullRequest,
    /// Reviewer that was removed.
    pub replaced: UserId,
    /// Reviewer that took the vacated slot.
    pub replacement: UserId,
}

/// Pull request lifecycle orchestration service.
#[derive(Clone)]
pub struct PullRequestLifecycleService<R, C>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    cache: Arc<ActiveMemberCache>,
    selector: ReviewerSelector,
    clock: Arc<C>,
}

impl<R, C> PullRequestLifecycleService<R, C>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, cache: Arc<ActiveMemberCache>, clock: Arc<C>) -> Self {
        Self {
            repository,
            cache,
            selector: ReviewerSelector::new(),
            clock,
        }
    }

    async fn find_pull_request_or_error(
        &self,
        id: PullRequestId,
    ) -> ReviewServiceResult<PullRequest> {
        self.repository
            .find_pull_request(id)
            .await?
            .ok_or(ReviewServiceError::PullRequestNotFound(id))
    }

    async fn find_user_or_error(&self, id: UserId) -> ReviewServiceResult<User> {
        self.repository
            .find_user(id)
            .await?
            .ok_or(ReviewServiceError::UserNotFound(id))
    }

    /// Opens a pull request and assigns up to two reviewers from the author's
    /// team.
    ///
    /// The author is resolved before anything is written, so an unknown
    /// author never leaves an orphan pull request behind. An empty candidate
    /// pool is not an error; the pull request is returned unreviewed.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::UserNotFound`] when the author does not
    /// exist, domain errors for an invalid title, or repository failures.
    pub async fn create_pull_request(
        &self,
        request: CreatePullRequestRequest,
    ) -> ReviewServiceResult<PullRequest> {
        let title = PullRequestTitle::new(request.title)?;
        let author = self.find_user_or_error(request.author_id).await?;

        let pull_request = PullRequest::open(title, author.id(), &*self.clock);
        self.repository.create_pull_request(&pull_request).await?;

        let candidates = self
            .cache
            .get(&*self.repository, author.team_id(), author.id())
            .await?;
        let selected: Vec<UserId> = self
            .selector
            .select(candidates)
            .iter()
            .map(User::id)
            .collect();
        let reviewers = ReviewerSlots::from_selection(&selected, author.id())?;

        if reviewers.is_empty() {
            info!(pull_request = %pull_request.id(), "pull request opened without eligible reviewers");
            return Ok(pull_request);
        }

        let assigned = self
            .repository
            .replace_reviewers(pull_request.id(), ReviewerSlots::empty(), reviewers)
            .await?;
        info!(
            pull_request = %assigned.id(),
            reviewers = assigned.reviewers().len(),
            "pull request opened"
        );
        Ok(assigned)
    }

    /// Looks up a pull request.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::PullRequestNotFound`] when it does not
    /// exist.
    pub async fn find_pull_request(&self, id: PullRequestId) -> ReviewServiceResult<PullRequest> {
        self.find_pull_request_or_error(id).await
    }

    /// Replaces `reviewer` on an open pull request.
    ///
    /// # Errors
    ///
    /// See [`PullRequestLifecycleService::replace_reviewer`].
    pub async fn reassign_reviewer(
        &self,
        pull_request_id: PullRequestId,
        reviewer: UserId,
    ) -> ReviewServiceResult<PullRequest> {
        self.replace_reviewer(pull_request_id, reviewer)
            .await
            .map(|replacement| replacement.pull_request)
    }

    /// Replaces `reviewer` and reports who took the slot.
    ///
    /// The replacement is drawn from the active members of the *replaced
    /// reviewer's* team, excluding the author and anyone already assigned.
    /// The vacated slot is refilled in place; the other slot is untouched.
    ///
    /// When no candidate remains the reviewer is still removed and the pull
    /// request is left one reviewer short. This is the one case where the
    /// other slot moves: vacating slot 1 shifts a remaining second reviewer
    /// up to slot 1, since slot 2 is never filled while slot 1 is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::PullRequestNotFound`] or
    /// [`ReviewServiceError::UserNotFound`] for missing entities, a
    /// [`ReviewServiceError::Domain`] error when the pull request is merged
    /// or the reviewer is not assigned to it,
    /// [`ReviewServiceError::NoAvailableReviewer`] when the pool is
    /// exhausted, and repository conflicts or failures.
    pub async fn replace_reviewer(
        &self,
        pull_request_id: PullRequestId,
        reviewer: UserId,
    ) -> ReviewServiceResult<ReviewerReplacement> {
        let pull_request = self.find_pull_request_or_error(pull_request_id).await?;
        pull_request.ensure_open()?;
        let slot = pull_request.slot_of_reviewer(reviewer)?;

        let replaced = self.find_user_or_error(reviewer).await?;
        let candidates = self
            .cache
            .get(&*self.repository, replaced.team_id(), pull_request.author_id())
            .await?;

        let current = *pull_request.reviewers();
        let next = self
            .selector
            .shuffled(candidates)
            .into_iter()
            .map(|candidate| candidate.id())
            .find(|candidate| !current.contains(*candidate));

        let Some(replacement) = next else {
            self.repository
                .replace_reviewers(pull_request_id, current, current.vacate(slot))
                .await?;
            warn!(
                pull_request = %pull_request_id,
                reviewer = %reviewer,
                team = %replaced.team_id(),
                "reviewer removed without replacement"
            );
            return Err(ReviewServiceError::NoAvailableReviewer {
                pull_request: pull_request_id,
                team: replaced.team_id(),
            });
        };

        let reviewers = current.replace(slot, replacement, pull_request.author_id())?;
        let updated = self
            .repository
            .replace_reviewers(pull_request_id, current, reviewers)
            .await?;
        info!(
            pull_request = %pull_request_id,
            replaced = %reviewer,
            replacement = %replacement,
            "reviewer reassigned"
        );
        Ok(ReviewerReplacement {
            pull_request: updated,
            replaced: reviewer,
            replacement,
        })
    }

    /// Merges a pull request. Merging an already merged pull request returns
    /// it unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::PullRequestNotFound`] when it does not
    /// exist, or repository failures.
    pub async fn merge_pull_request(&self, id: PullRequestId) -> ReviewServiceResult<PullRequest> {
        let pull_request = self.find_pull_request_or_error(id).await?;
        if !pull_request.is_open() {
            debug!(pull_request = %id, "pull request already merged");
            return Ok(pull_request);
        }

        match self.repository.merge_pull_request(id, self.clock.utc()).await? {
            MergeOutcome::Merged(merged) => {
                info!(pull_request = %id, "pull request merged");
                Ok(merged)
            }
            MergeOutcome::AlreadyMerged(merged) => {
                debug!(pull_request = %id, "pull request merged concurrently");
                Ok(merged)
            }
        }
    }

    /// Returns the pull requests `reviewer` is assigned to, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::UserNotFound`] when the user does not
    /// exist, or repository failures.
    pub async fn pull_requests_for_reviewer(
        &self,
        reviewer: UserId,
    ) -> ReviewServiceResult<Vec<PullRequest>> {
        self.find_user_or_error(reviewer).await?;
        Ok(self.repository.pull_requests_by_reviewer(reviewer).await?)
    }

    /// Counts review assignments per reviewer across all pull requests.
    ///
    /// # Errors
    ///
    /// Returns repository failures.
    pub async fn review_load_stats(&self) -> ReviewServiceResult<HashMap<UserId, u64>> {
        Ok(self.repository.review_load_stats().await?)
    }
}
