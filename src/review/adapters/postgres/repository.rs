//! `PostgreSQL` repository implementation for review storage.

use super::{
    models::{PullRequestRow, ReviewLoadRow, TeamRow, UserRow},
    schema::{pull_requests, teams, users},
};
use crate::review::{
    domain::{
        PersistedPullRequestData, PullRequest, PullRequestId, PullRequestStatus,
        PullRequestTitle, ReviewerSlots, Team, TeamId, TeamName, User, UserId, UserName,
    },
    ports::{MergeOutcome, ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;

/// `PostgreSQL` connection pool type used by review adapters.
pub type ReviewPgPool = Pool<ConnectionManager<PgConnection>>;

const OPEN: &str = "OPEN";

/// `PostgreSQL`-backed review repository.
#[derive(Debug, Clone)]
pub struct PostgresReviewRepository {
    pool: ReviewPgPool,
}

impl PostgresReviewRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ReviewPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReviewRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReviewRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ReviewRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ReviewRepositoryError::persistence)?
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn create_team(&self, team: &Team) -> ReviewRepositoryResult<()> {
        let name = team.name().clone();
        let row = TeamRow {
            id: team.id().into_inner(),
            name: name.as_str().to_owned(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(teams::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReviewRepositoryError::DuplicateTeamName(name.clone())
                    }
                    _ => ReviewRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_team(&self, id: TeamId) -> ReviewRepositoryResult<Option<Team>> {
        self.run_blocking(move |connection| {
            let row = teams::table
                .filter(teams::id.eq(id.into_inner()))
                .select(TeamRow::as_select())
                .first::<TeamRow>(connection)
                .optional()
                .map_err(ReviewRepositoryError::persistence)?;
            row.map(row_to_team).transpose()
        })
        .await
    }

    async fn create_user(&self, user: &User) -> ReviewRepositoryResult<()> {
        let name = user.name().clone();
        let team_id = user.team_id();
        let row = UserRow {
            id: user.id().into_inner(),
            username: name.as_str().to_owned(),
            team_id: team_id.into_inner(),
            is_active: user.is_active(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReviewRepositoryError::DuplicateUserName(name.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        ReviewRepositoryError::TeamNotFound(team_id)
                    }
                    _ => ReviewRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_user(&self, id: UserId) -> ReviewRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(ReviewRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn active_team_members(&self, team_id: TeamId) -> ReviewRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::team_id.eq(team_id.into_inner()))
                .filter(users::is_active.eq(true))
                .order(users::username.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(ReviewRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn team_members(&self, team_id: TeamId) -> ReviewRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::team_id.eq(team_id.into_inner()))
                .order(users::username.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(ReviewRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn deactivate_user(&self, id: UserId) -> ReviewRepositoryResult<()> {
        self.run_blocking(move |connection| set_activity(connection, id, false))
            .await
    }

    async fn activate_user(&self, id: UserId) -> ReviewRepositoryResult<()> {
        self.run_blocking(move |connection| set_activity(connection, id, true))
            .await
    }

    async fn create_pull_request(&self, pull_request: &PullRequest) -> ReviewRepositoryResult<()> {
        let author_id = pull_request.author_id();
        let row = to_row(pull_request);
        self.run_blocking(move |connection| {
            diesel::insert_into(pull_requests::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        ReviewRepositoryError::UserNotFound(author_id)
                    }
                    _ => ReviewRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_pull_request(
        &self,
        id: PullRequestId,
    ) -> ReviewRepositoryResult<Option<PullRequest>> {
        self.run_blocking(move |connection| {
            find_pull_request_row(connection, id)?
                .map(row_to_pull_request)
                .transpose()
        })
        .await
    }

    async fn replace_reviewers(
        &self,
        id: PullRequestId,
        expected: ReviewerSlots,
        replacement: ReviewerSlots,
    ) -> ReviewRepositoryResult<PullRequest> {
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                pull_requests::table
                    .filter(pull_requests::id.eq(id.into_inner()))
                    .filter(pull_requests::status.eq(OPEN))
                    .filter(
                        pull_requests::reviewer1_id
                            .is_not_distinct_from(expected.first().map(UserId::into_inner)),
                    )
                    .filter(
                        pull_requests::reviewer2_id
                            .is_not_distinct_from(expected.second().map(UserId::into_inner)),
                    ),
            )
            .set((
                pull_requests::reviewer1_id.eq(replacement.first().map(UserId::into_inner)),
                pull_requests::reviewer2_id.eq(replacement.second().map(UserId::into_inner)),
            ))
            .returning(PullRequestRow::as_returning())
            .get_result::<PullRequestRow>(connection)
            .optional()
            .map_err(ReviewRepositoryError::persistence)?;

            if let Some(row) = updated {
                return row_to_pull_request(row);
            }

            // Zero rows matched: work out which guard rejected the write.
            match find_pull_request_row(connection, id)? {
                None => Err(ReviewRepositoryError::PullRequestNotFound(id)),
                Some(row) if row.status != OPEN => {
                    Err(ReviewRepositoryError::PullRequestNotOpen(id))
                }
                Some(_) => Err(ReviewRepositoryError::ReviewersChanged(id)),
            }
        })
        .await
    }

    async fn merge_pull_request(
        &self,
        id: PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> ReviewRepositoryResult<MergeOutcome> {
        self.run_blocking(move |connection| {
            let merged = diesel::update(
                pull_requests::table
                    .filter(pull_requests::id.eq(id.into_inner()))
                    .filter(pull_requests::status.eq(OPEN)),
            )
            .set((
                pull_requests::status.eq(PullRequestStatus::Merged.as_str()),
                pull_requests::merged_at.eq(Some(merged_at)),
            ))
            .returning(PullRequestRow::as_returning())
            .get_result::<PullRequestRow>(connection)
            .optional()
            .map_err(ReviewRepositoryError::persistence)?;

            if let Some(row) = merged {
                return row_to_pull_request(row).map(MergeOutcome::Merged);
            }

            let current = find_pull_request_row(connection, id)?
                .ok_or(ReviewRepositoryError::PullRequestNotFound(id))?;
            row_to_pull_request(current).map(MergeOutcome::AlreadyMerged)
        })
        .await
    }

    async fn pull_requests_by_reviewer(
        &self,
        reviewer: UserId,
    ) -> ReviewRepositoryResult<Vec<PullRequest>> {
        self.run_blocking(move |connection| {
            let reviewer_id = reviewer.into_inner();
            let rows = pull_requests::table
                .filter(
                    pull_requests::reviewer1_id
                        .eq(reviewer_id)
                        .or(pull_requests::reviewer2_id.eq(reviewer_id)),
                )
                .order((pull_requests::created_at.asc(), pull_requests::id.asc()))
                .select(PullRequestRow::as_select())
                .load::<PullRequestRow>(connection)
                .map_err(ReviewRepositoryError::persistence)?;
            rows.into_iter().map(row_to_pull_request).collect()
        })
        .await
    }

    async fn open_pull_requests_by_team(
        &self,
        team_id: TeamId,
    ) -> ReviewRepositoryResult<Vec<PullRequest>> {
        self.run_blocking(move |connection| {
            let team_members = users::table
                .filter(users::team_id.eq(team_id.into_inner()))
                .select(users::id);
            let rows = pull_requests::table
                .filter(pull_requests::status.eq(OPEN))
                .filter(pull_requests::author_id.eq_any(team_members))
                .order((pull_requests::created_at.asc(), pull_requests::id.asc()))
                .select(PullRequestRow::as_select())
                .load::<PullRequestRow>(connection)
                .map_err(ReviewRepositoryError::persistence)?;
            rows.into_iter().map(row_to_pull_request).collect()
        })
        .await
    }

    async fn review_load_stats(&self) -> ReviewRepositoryResult<HashMap<UserId, u64>> {
        self.run_blocking(move |connection| {
            let rows = diesel::sql_query(concat!(
                "SELECT reviewer_id, COUNT(*) AS assignments FROM (",
                "SELECT reviewer1_id AS reviewer_id FROM pull_requests ",
                "WHERE reviewer1_id IS NOT NULL ",
                "UNION ALL ",
                "SELECT reviewer2_id AS reviewer_id FROM pull_requests ",
                "WHERE reviewer2_id IS NOT NULL",
                ") AS reviews GROUP BY reviewer_id",
            ))
            .load::<ReviewLoadRow>(connection)
            .map_err(ReviewRepositoryError::persistence)?;

            rows.into_iter()
                .map(|row| {
                    let count =
                        u64::try_from(row.assignments).map_err(ReviewRepositoryError::persistence)?;
                    Ok((UserId::from_uuid(row.reviewer_id), count))
                })
                .collect()
        })
        .await
    }
}

fn set_activity(
    connection: &mut PgConnection,
    id: UserId,
    active: bool,
) -> ReviewRepositoryResult<()> {
    let affected = diesel::update(users::table.filter(users::id.eq(id.into_inner())))
        .set(users::is_active.eq(active))
        .execute(connection)
        .map_err(ReviewRepositoryError::persistence)?;
    if affected == 0 {
        return Err(ReviewRepositoryError::UserNotFound(id));
    }
    Ok(())
}

fn find_pull_request_row(
    connection: &mut PgConnection,
    id: PullRequestId,
) -> ReviewRepositoryResult<Option<PullRequestRow>> {
    pull_requests::table
        .filter(pull_requests::id.eq(id.into_inner()))
        .select(PullRequestRow::as_select())
        .first::<PullRequestRow>(connection)
        .optional()
        .map_err(ReviewRepositoryError::persistence)
}

fn to_row(pull_request: &PullRequest) -> PullRequestRow {
    PullRequestRow {
        id: pull_request.id().into_inner(),
        title: pull_request.title().as_str().to_owned(),
        author_id: pull_request.author_id().into_inner(),
        status: pull_request.status().as_str().to_owned(),
        reviewer1_id: pull_request.reviewers().first().map(UserId::into_inner),
        reviewer2_id: pull_request.reviewers().second().map(UserId::into_inner),
        created_at: pull_request.created_at(),
        merged_at: pull_request.merged_at(),
    }
}

fn row_to_team(row: TeamRow) -> ReviewRepositoryResult<Team> {
    let name = TeamName::new(row.name).map_err(ReviewRepositoryError::persistence)?;
    Ok(Team::from_persisted(TeamId::from_uuid(row.id), name))
}

fn row_to_user(row: UserRow) -> ReviewRepositoryResult<User> {
    let name = UserName::new(row.username).map_err(ReviewRepositoryError::persistence)?;
    Ok(User::from_persisted(
        UserId::from_uuid(row.id),
        name,
        TeamId::from_uuid(row.team_id),
        row.is_active,
    ))
}

fn row_to_pull_request(row: PullRequestRow) -> ReviewRepositoryResult<PullRequest> {
    let PullRequestRow {
        id,
        title,
        author_id,
        status,
        reviewer1_id,
        reviewer2_id,
        created_at,
        merged_at,
    } = row;

    let author = UserId::from_uuid(author_id);
    let reviewers = ReviewerSlots::new(
        reviewer1_id.map(UserId::from_uuid),
        reviewer2_id.map(UserId::from_uuid),
        author,
    )
    .map_err(ReviewRepositoryError::persistence)?;

    let data = PersistedPullRequestData {
        id: PullRequestId::from_uuid(id),
        title: PullRequestTitle::new(title).map_err(ReviewRepositoryError::persistence)?,
        author_id: author,
        status: PullRequestStatus::try_from(status.as_str())
            .map_err(ReviewRepositoryError::persistence)?,
        reviewers,
        created_at,
        merged_at,
    };
    Ok(PullRequest::from_persisted(data))
}
