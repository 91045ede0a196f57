//! Team and user entities.

use super::{TeamId, TeamName, UserId, UserName};

/// A named group of users sharing a reviewer pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    id: TeamId,
    name: TeamName,
}

impl Team {
    /// Creates a new team with a fresh identifier.
    #[must_use]
    pub fn new(name: TeamName) -> Self {
        Self {
            id: TeamId::new(),
            name,
        }
    }

    /// Reconstructs a team from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: TeamId, name: TeamName) -> Self {
        Self { id, name }
    }

    /// Returns the team identifier.
    #[must_use]
    pub const fn id(&self) -> TeamId {
        self.id
    }

    /// Returns the team name.
    #[must_use]
    pub const fn name(&self) -> &TeamName {
        &self.name
    }
}

/// A team member who may author or review pull requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    team_id: TeamId,
    is_active: bool,
}

impl User {
    /// Creates a new, active user belonging to `team_id`.
    #[must_use]
    pub fn new(name: UserName, team_id: TeamId) -> Self {
        Self {
            id: UserId::new(),
            name,
            team_id,
            is_active: true,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: UserId,
        name: UserName,
        team_id: TeamId,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            name,
            team_id,
            is_active,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user name.
    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Returns the team the user belongs to.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns whether the user is eligible for review assignment.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Marks the user inactive.
    pub const fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Marks the user active.
    pub const fn activate(&mut self) {
        self.is_active = true;
    }
}
