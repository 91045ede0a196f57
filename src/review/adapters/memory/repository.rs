//! Thread-safe in-memory review repository.
//!
//! Backs the test suites and the server's default mode. A single `RwLock`
//! guards all tables, so compare-and-swap and merge are atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::review::{
    domain::{
        PullRequest, PullRequestId, ReviewerSlots, Team, TeamId, TeamName, User, UserId, UserName,
    },
    ports::{MergeOutcome, ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult},
};

/// Thread-safe in-memory review repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewRepository {
    state: Arc<RwLock<InMemoryReviewState>>,
}

#[derive(Debug, Default)]
struct InMemoryReviewState {
    teams: HashMap<TeamId, Team>,
    team_names: HashSet<TeamName>,
    users: HashMap<UserId, User>,
    user_names: HashSet<UserName>,
    members_index: HashMap<TeamId, Vec<UserId>>,
    pull_requests: HashMap<PullRequestId, PullRequest>,
}

impl InMemoryReviewRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ReviewRepositoryResult<RwLockReadGuard<'_, InMemoryReviewState>> {
        self.state.read().map_err(|err| {
            ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> ReviewRepositoryResult<RwLockWriteGuard<'_, InMemoryReviewState>> {
        self.state.write().map_err(|err| {
            ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Returns team members in insertion order, optionally only active ones.
fn members_of(state: &InMemoryReviewState, team_id: TeamId, active_only: bool) -> Vec<User> {
    state
        .members_index
        .get(&team_id)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| state.users.get(id))
                .filter(|user| !active_only || user.is_active())
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Collects matching pull requests ordered by creation time, then id.
fn collect_sorted<'a>(prs: impl Iterator<Item = &'a PullRequest>) -> Vec<PullRequest> {
    let mut found: Vec<PullRequest> = prs.cloned().collect();
    found.sort_by_key(|pr| (pr.created_at(), pr.id()));
    found
}

fn set_activity(
    state: &mut InMemoryReviewState,
    id: UserId,
    active: bool,
) -> ReviewRepositoryResult<()> {
    let user = state
        .users
        .get_mut(&id)
        .ok_or(ReviewRepositoryError::UserNotFound(id))?;
    if active {
        user.activate();
    } else {
        user.deactivate();
    }
    Ok(())
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn create_team(&self, team: &Team) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        if state.team_names.contains(team.name()) {
            return Err(ReviewRepositoryError::DuplicateTeamName(team.name().clone()));
        }
        state.team_names.insert(team.name().clone());
        state.teams.insert(team.id(), team.clone());
        Ok(())
    }

    async fn find_team(&self, id: TeamId) -> ReviewRepositoryResult<Option<Team>> {
        Ok(self.read()?.teams.get(&id).cloned())
    }

    async fn create_user(&self, user: &User) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.teams.contains_key(&user.team_id()) {
            return Err(ReviewRepositoryError::TeamNotFound(user.team_id()));
        }
        if state.user_names.contains(user.name()) {
            return Err(ReviewRepositoryError::DuplicateUserName(user.name().clone()));
        }
        state.user_names.insert(user.name().clone());
        state
            .members_index
            .entry(user.team_id())
            .or_default()
            .push(user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> ReviewRepositoryResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn active_team_members(&self, team_id: TeamId) -> ReviewRepositoryResult<Vec<User>> {
        Ok(members_of(&*self.read()?, team_id, true))
    }

    async fn team_members(&self, team_id: TeamId) -> ReviewRepositoryResult<Vec<User>> {
        Ok(members_of(&*self.read()?, team_id, false))
    }

    async fn deactivate_user(&self, id: UserId) -> ReviewRepositoryResult<()> {
        set_activity(&mut *self.write()?, id, false)
    }

    async fn activate_user(&self, id: UserId) -> ReviewRepositoryResult<()> {
        set_activity(&mut *self.write()?, id, true)
    }

    async fn create_pull_request(&self, pull_request: &PullRequest) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.users.contains_key(&pull_request.author_id()) {
            return Err(ReviewRepositoryError::UserNotFound(pull_request.author_id()));
        }
        state
            .pull_requests
            .insert(pull_request.id(), pull_request.clone());
        Ok(())
    }

    async fn find_pull_request(
        &self,
        id: PullRequestId,
    ) -> ReviewRepositoryResult<Option<PullRequest>> {
        Ok(self.read()?.pull_requests.get(&id).cloned())
    }

    async fn replace_reviewers(
        &self,
        id: PullRequestId,
        expected: ReviewerSlots,
        replacement: ReviewerSlots,
    ) -> ReviewRepositoryResult<PullRequest> {
        let mut state = self.write()?;
        let pr = state
            .pull_requests
            .get_mut(&id)
            .ok_or(ReviewRepositoryError::PullRequestNotFound(id))?;
        if !pr.is_open() {
            return Err(ReviewRepositoryError::PullRequestNotOpen(id));
        }
        if *pr.reviewers() != expected {
            return Err(ReviewRepositoryError::ReviewersChanged(id));
        }
        pr.set_reviewers(replacement);
        Ok(pr.clone())
    }

    async fn merge_pull_request(
        &self,
        id: PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> ReviewRepositoryResult<MergeOutcome> {
        let mut state = self.write()?;
        let pr = state
            .pull_requests
            .get_mut(&id)
            .ok_or(ReviewRepositoryError::PullRequestNotFound(id))?;
        if pr.mark_merged(merged_at) {
            Ok(MergeOutcome::Merged(pr.clone()))
        } else {
            Ok(MergeOutcome::AlreadyMerged(pr.clone()))
        }
    }

    async fn pull_requests_by_reviewer(
        &self,
        reviewer: UserId,
    ) -> ReviewRepositoryResult<Vec<PullRequest>> {
        let state = self.read()?;
        Ok(collect_sorted(
            state
                .pull_requests
                .values()
                .filter(|pr| pr.reviewers().contains(reviewer)),
        ))
    }

    async fn open_pull_requests_by_team(
        &self,
        team_id: TeamId,
    ) -> ReviewRepositoryResult<Vec<PullRequest>> {
        let state = self.read()?;
        Ok(collect_sorted(state.pull_requests.values().filter(|pr| {
            pr.is_open()
                && state
                    .users
                    .get(&pr.author_id())
                    .is_some_and(|author| author.team_id() == team_id)
        })))
    }

    async fn review_load_stats(&self) -> ReviewRepositoryResult<HashMap<UserId, u64>> {
        let state = self.read()?;
        let mut stats: HashMap<UserId, u64> = HashMap::new();
        for reviewer in state
            .pull_requests
            .values()
            .flat_map(|pr| pr.reviewers().iter().collect::<Vec<_>>())
        {
            *stats.entry(reviewer).or_default() += 1;
        }
        Ok(stats)
    }
}
