//! Diesel row models for review persistence.

use super::schema::{pull_requests, teams, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for team records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamRow {
    /// Team identifier.
    pub id: uuid::Uuid,
    /// Team name.
    pub name: String,
}

/// Row model for user records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Login name.
    pub username: String,
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Activity flag.
    pub is_active: bool,
}

/// Row model for pull request records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = pull_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PullRequestRow {
    /// Pull request identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Author.
    pub author_id: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// Reviewer slot 1.
    pub reviewer1_id: Option<uuid::Uuid>,
    /// Reviewer slot 2.
    pub reviewer2_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Merge timestamp.
    pub merged_at: Option<DateTime<Utc>>,
}

/// Aggregated review count per reviewer.
#[derive(Debug, Clone, QueryableByName)]
pub struct ReviewLoadRow {
    /// Reviewer identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub reviewer_id: uuid::Uuid,
    /// Number of assignments.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub assignments: i64,
}
