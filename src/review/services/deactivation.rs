//! Team deactivation with cascading reviewer reassignment.

use super::{
    ActiveMemberCache, PullRequestLifecycleService, ReviewServiceError, ReviewServiceResult,
};
use crate::review::{
    domain::{PullRequestId, TeamId, UserId},
    ports::ReviewRepository,
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// A reviewer that was swapped out during the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeReassignment {
    /// Affected pull request.
    pub pull_request: PullRequestId,
    /// Deactivated reviewer.
    pub replaced: UserId,
    /// Reviewer that took over the slot.
    pub replacement: UserId,
}

/// A reviewer that could not be replaced during the cascade.
#[derive(Debug, Clone)]
pub struct CascadeFailure {
    /// Affected pull request.
    pub pull_request: PullRequestId,
    /// Inactive reviewer that was being replaced.
    pub reviewer: UserId,
    /// Why the replacement failed.
    pub error: ReviewServiceError,
}

/// Outcome of a team deactivation.
///
/// User deactivations are committed before any reassignment starts; each
/// reassignment then succeeds or fails on its own.
#[derive(Debug, Clone)]
pub struct TeamDeactivationReport {
    /// Deactivated team.
    pub team_id: TeamId,
    /// Users switched from active to inactive by this call.
    pub deactivated: Vec<UserId>,
    /// Reviewers replaced on open pull requests.
    pub reassigned: Vec<CascadeReassignment>,
    /// Reviewers that could not be replaced.
    pub failures: Vec<CascadeFailure>,
}

impl TeamDeactivationReport {
    /// Returns whether every inactive reviewer was replaced.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(
        &mut self,
        pull_request: PullRequestId,
        reviewer: UserId,
        error: ReviewServiceError,
    ) {
        warn!(
            pull_request = %pull_request,
            reviewer = %reviewer,
            error = %error,
            "cascade reassignment failed"
        );
        self.failures.push(CascadeFailure {
            pull_request,
            reviewer,
            error,
        });
    }
}

/// Bulk team deactivation service.
#[derive(Clone)]
pub struct TeamDeactivationService<R, C>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    cache: Arc<ActiveMemberCache>,
    lifecycle: PullRequestLifecycleService<R, C>,
}

impl<R, C> TeamDeactivationService<R, C>
where
    R: ReviewRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new deactivation service.
    #[must_use]
    pub fn new(repository: Arc<R>, cache: Arc<ActiveMemberCache>, clock: Arc<C>) -> Self {
        let lifecycle =
            PullRequestLifecycleService::new(Arc::clone(&repository), Arc::clone(&cache), clock);
        Self {
            repository,
            cache,
            lifecycle,
        }
    }

    /// Deactivates every active member of a team, then replaces inactive
    /// reviewers on the team's open pull requests.
    ///
    /// Reassignment is best effort: failures are collected into the report
    /// and later pull requests are still processed.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::TeamNotFound`] when the team does not
    /// exist, or repository failures while loading members, deactivating
    /// them, or loading open pull requests. Users deactivated before such a
    /// failure stay deactivated.
    pub async fn deactivate_team(
        &self,
        team_id: TeamId,
    ) -> ReviewServiceResult<TeamDeactivationReport> {
        self.repository
            .find_team(team_id)
            .await?
            .ok_or(ReviewServiceError::TeamNotFound(team_id))?;

        let mut deactivated = Vec::new();
        for member in self.repository.team_members(team_id).await? {
            if !member.is_active() {
                continue;
            }
            self.repository.deactivate_user(member.id()).await?;
            self.cache.invalidate(team_id);
            deactivated.push(member.id());
        }

        let mut report = TeamDeactivationReport {
            team_id,
            deactivated,
            reassigned: Vec::new(),
            failures: Vec::new(),
        };
        let mut activity: HashMap<UserId, bool> = HashMap::new();

        for pull_request in self.repository.open_pull_requests_by_team(team_id).await? {
            let reviewers: Vec<UserId> = pull_request.reviewers().iter().collect();
            for reviewer in reviewers {
                match self.is_active(&mut activity, reviewer).await {
                    Ok(true) => continue,
                    Ok(false) => {}
                    Err(error) => {
                        report.record_failure(pull_request.id(), reviewer, error);
                        continue;
                    }
                }

                match self.lifecycle.replace_reviewer(pull_request.id(), reviewer).await {
                    Ok(replacement) => report.reassigned.push(CascadeReassignment {
                        pull_request: pull_request.id(),
                        replaced: replacement.replaced,
                        replacement: replacement.replacement,
                    }),
                    Err(error) => report.record_failure(pull_request.id(), reviewer, error),
                }
            }
        }

        info!(
            team = %team_id,
            deactivated = report.deactivated.len(),
            reassigned = report.reassigned.len(),
            failed = report.failures.len(),
            "team deactivated"
        );
        Ok(report)
    }

    async fn is_active(
        &self,
        activity: &mut HashMap<UserId, bool>,
        user_id: UserId,
    ) -> ReviewServiceResult<bool> {
        if let Some(active) = activity.get(&user_id) {
            return Ok(*active);
        }
        let user = self
            .repository
            .find_user(user_id)
            .await?
            .ok_or(ReviewServiceError::UserNotFound(user_id))?;
        activity.insert(user_id, user.is_active());
        Ok(user.is_active())
    }
}
