//! Shared world state for pull request review BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use reviewer_rota::review::{
    adapters::memory::InMemoryReviewRepository,
    domain::{PullRequest, Team, User, UserId},
    services::{ReviewEngine, ReviewServiceError, TeamDeactivationReport},
};
use rstest::fixture;

/// Engine type used by the BDD world.
pub type TestEngine = ReviewEngine<InMemoryReviewRepository, DefaultClock>;

/// Scenario world for pull request review behaviour tests.
pub struct ReviewWorld {
    pub engine: TestEngine,
    pub teams: HashMap<String, Team>,
    pub users: HashMap<String, User>,
    pub opened: Option<PullRequest>,
    pub current: Option<PullRequest>,
    pub merges: Vec<PullRequest>,
    pub last_reassignment: Option<Result<PullRequest, ReviewServiceError>>,
    pub report: Option<TeamDeactivationReport>,
}

impl ReviewWorld {
    /// Creates a world over empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: ReviewEngine::new(
                Arc::new(InMemoryReviewRepository::new()),
                Arc::new(DefaultClock),
            ),
            teams: HashMap::new(),
            users: HashMap::new(),
            opened: None,
            current: None,
            merges: Vec::new(),
            last_reassignment: None,
            report: None,
        }
    }

    /// Looks up a user created by an earlier step.
    pub fn user(&self, name: &str) -> Result<&User, eyre::Report> {
        self.users
            .get(name)
            .ok_or_else(|| eyre::eyre!("unknown user {name} in scenario world"))
    }

    /// Looks up a team created by an earlier step.
    pub fn team(&self, name: &str) -> Result<&Team, eyre::Report> {
        self.teams
            .get(name)
            .ok_or_else(|| eyre::eyre!("unknown team {name} in scenario world"))
    }

    /// Returns the pull request under test as last observed.
    pub fn current(&self) -> Result<&PullRequest, eyre::Report> {
        self.current
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no pull request in scenario world"))
    }

    /// Returns the pull request as it was when opened.
    pub fn opened(&self) -> Result<&PullRequest, eyre::Report> {
        self.opened
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no opened pull request in scenario world"))
    }

    /// Resolves a comma-separated list of user names to identifiers.
    pub fn user_ids(&self, names: &str) -> Result<Vec<UserId>, eyre::Report> {
        names
            .split(',')
            .map(|name| self.user(name.trim()).map(User::id))
            .collect()
    }
}

impl Default for ReviewWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReviewWorld {
    ReviewWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
