//! Team and user administration.

use super::{ActiveMemberCache, ReviewServiceError, ReviewServiceResult};
use crate::review::{
    domain::{Team, TeamId, TeamName, User, UserId, UserName},
    ports::ReviewRepository,
};
use std::sync::Arc;
use tracing::info;

/// Request payload for adding a user to a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    name: String,
    team_id: TeamId,
}

impl CreateUserRequest {
    /// Creates a request for a new user in `team_id`.
    #[must_use]
    pub fn new(name: impl Into<String>, team_id: TeamId) -> Self {
        Self {
            name: name.into(),
            team_id,
        }
    }
}

/// Team and user administration service.
///
/// Every mutation that can change a team's active roster invalidates the
/// shared [`ActiveMemberCache`] entry for that team.
#[derive(Clone)]
pub struct TeamMembershipService<R>
where
    R: ReviewRepository,
{
    repository: Arc<R>,
    cache: Arc<ActiveMemberCache>,
}

impl<R> TeamMembershipService<R>
where
    R: ReviewRepository,
{
    /// Creates a new membership service.
    #[must_use]
    pub const fn new(repository: Arc<R>, cache: Arc<ActiveMemberCache>) -> Self {
        Self { repository, cache }
    }

    /// Creates a team.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::Domain`] for an invalid name or
    /// [`ReviewServiceError::Repository`] when the name is taken or storage
    /// fails.
    pub async fn create_team(&self, name: impl Into<String>) -> ReviewServiceResult<Team> {
        let team = Team::new(TeamName::new(name)?);
        self.repository.create_team(&team).await?;
        info!(team = %team.id(), name = %team.name(), "team created");
        Ok(team)
    }

    /// Looks up a team.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::TeamNotFound`] when the team does not
    /// exist.
    pub async fn find_team(&self, id: TeamId) -> ReviewServiceResult<Team> {
        self.repository
            .find_team(id)
            .await?
            .ok_or(ReviewServiceError::TeamNotFound(id))
    }

    /// Adds an active user to a team.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::Domain`] for an invalid name or
    /// [`ReviewServiceError::Repository`] when the team is missing, the name
    /// is taken, or storage fails.
    pub async fn create_user(&self, request: CreateUserRequest) -> ReviewServiceResult<User> {
        let user = User::new(UserName::new(request.name)?, request.team_id);
        self.repository.create_user(&user).await?;
        self.cache.invalidate(user.team_id());
        info!(user = %user.id(), team = %user.team_id(), "user created");
        Ok(user)
    }

    /// Looks up a user.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::UserNotFound`] when the user does not
    /// exist.
    pub async fn find_user(&self, id: UserId) -> ReviewServiceResult<User> {
        self.repository
            .find_user(id)
            .await?
            .ok_or(ReviewServiceError::UserNotFound(id))
    }

    /// Removes a user from the reviewer pool of their team.
    ///
    /// Open pull requests the user reviews are left untouched; use team
    /// deactivation to cascade reassignment.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::UserNotFound`] when the user does not
    /// exist, or repository failures.
    pub async fn deactivate_user(&self, id: UserId) -> ReviewServiceResult<User> {
        let mut user = self.find_user(id).await?;
        self.repository.deactivate_user(id).await?;
        self.cache.invalidate(user.team_id());
        user.deactivate();
        info!(user = %id, "user deactivated");
        Ok(user)
    }

    /// Returns a user to the reviewer pool of their team.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::UserNotFound`] when the user does not
    /// exist, or repository failures.
    pub async fn activate_user(&self, id: UserId) -> ReviewServiceResult<User> {
        let mut user = self.find_user(id).await?;
        self.repository.activate_user(id).await?;
        self.cache.invalidate(user.team_id());
        user.activate();
        info!(user = %id, "user activated");
        Ok(user)
    }
}
