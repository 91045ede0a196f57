//! Database lifecycle helpers for `PostgreSQL` integration tests.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use pg_embedded_setup_unpriv::TestCluster;
use reviewer_rota::review::{
    adapters::postgres::{PostgresReviewRepository, run_migrations},
    domain::{PullRequest, PullRequestTitle, Team, TeamName, User, UserId, UserName},
    ports::ReviewRepository,
};
use tokio::runtime::Runtime;

/// Template database holding the migrated schema.
pub const TEMPLATE_DB: &str = "reviewer_rota_test_template";

/// Creates a runtime for driving the async repository from sync tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built.
pub fn test_runtime() -> Result<Runtime, eyre::Report> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Ensures the template database exists with migrations applied.
///
/// # Errors
///
/// Returns an error if the template cannot be created or migrated.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), eyre::Report> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut connection =
                PgConnection::establish(&url).map_err(|err| eyre::eyre!("{err}"))?;
            run_migrations(&mut connection).map_err(|err| eyre::eyre!("{err}"))?;
            Ok(())
        })?;
    Ok(())
}

/// A database cloned from the template, dropped when the value goes away.
pub struct TestDatabase<'a> {
    cluster: &'a TestCluster,
    name: String,
}

impl<'a> TestDatabase<'a> {
    /// Clones the template into a uniquely named database.
    ///
    /// # Errors
    ///
    /// Returns an error if the template or the clone cannot be created.
    pub fn create(cluster: &'a TestCluster, prefix: &str) -> Result<Self, eyre::Report> {
        ensure_template(cluster)?;
        let name = format!("{prefix}_{}", uuid::Uuid::new_v4().simple());
        cluster.create_database_from_template(name.as_str(), TEMPLATE_DB)?;
        Ok(Self { cluster, name })
    }

    /// Returns the connection URL of this database.
    #[must_use]
    pub fn url(&self) -> String {
        self.cluster.connection().database_url(&self.name)
    }

    /// Builds a repository over a single-connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built.
    pub fn repository(&self) -> Result<PostgresReviewRepository, eyre::Report> {
        let manager = ConnectionManager::<PgConnection>::new(self.url());
        let pool = Pool::builder().max_size(1).build(manager)?;
        Ok(PostgresReviewRepository::new(pool))
    }
}

impl Drop for TestDatabase<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {err}", self.name);
        }
    }
}

/// Stores a team named `name`.
///
/// # Errors
///
/// Returns an error if the name is invalid or the store rejects it.
pub async fn seed_team(repo: &PostgresReviewRepository, name: &str) -> Result<Team, eyre::Report> {
    let team = Team::new(TeamName::new(name)?);
    repo.create_team(&team).await?;
    Ok(team)
}

/// Stores an active user named `name` in `team`.
///
/// # Errors
///
/// Returns an error if the name is invalid or the store rejects it.
pub async fn seed_user(
    repo: &PostgresReviewRepository,
    name: &str,
    team: &Team,
) -> Result<User, eyre::Report> {
    let user = User::new(UserName::new(name)?, team.id());
    repo.create_user(&user).await?;
    Ok(user)
}

/// Stores an unreviewed open pull request by `author`.
///
/// # Errors
///
/// Returns an error if the title is invalid or the store rejects it.
pub async fn seed_pull_request(
    repo: &PostgresReviewRepository,
    title: &str,
    author: UserId,
) -> Result<PullRequest, eyre::Report> {
    let pull_request = PullRequest::open(
        PullRequestTitle::new(title)?,
        author,
        &mockable::DefaultClock,
    );
    repo.create_pull_request(&pull_request).await?;
    Ok(pull_request)
}
