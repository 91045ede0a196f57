//! Request and response bodies.

use crate::review::{
    domain::{PullRequest, PullRequestId, PullRequestStatus, Team, TeamId, User, UserId},
    services::TeamDeactivationReport,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /teams`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamBody {
    /// Team name.
    pub name: String,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserBody {
    /// Login name.
    pub username: String,
    /// Team the user joins.
    pub team_id: TeamId,
}

/// Body of `POST /pull-requests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePullRequestBody {
    /// Pull request title.
    pub title: String,
    /// Author of the pull request.
    pub author_id: UserId,
}

/// Body of `PATCH /pull-requests/{id}/reassign`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignBody {
    /// Reviewer to swap out.
    pub reviewer_id: UserId,
}

/// A team as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResponse {
    /// Team identifier.
    pub id: TeamId,
    /// Team name.
    pub name: String,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id(),
            name: team.name().as_str().to_owned(),
        }
    }
}

/// A user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    /// User identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Owning team.
    pub team_id: TeamId,
    /// Whether the user is eligible for review.
    pub is_active: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            username: user.name().as_str().to_owned(),
            team_id: user.team_id(),
            is_active: user.is_active(),
        }
    }
}

/// A pull request as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestResponse {
    /// Pull request identifier.
    pub id: PullRequestId,
    /// Title.
    pub title: String,
    /// Author.
    pub author_id: UserId,
    /// `OPEN` or `MERGED`.
    pub status: PullRequestStatus,
    /// First reviewer slot.
    pub reviewer1_id: Option<UserId>,
    /// Second reviewer slot.
    pub reviewer2_id: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Merge timestamp, set once.
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<&PullRequest> for PullRequestResponse {
    fn from(pull_request: &PullRequest) -> Self {
        Self {
            id: pull_request.id(),
            title: pull_request.title().as_str().to_owned(),
            author_id: pull_request.author_id(),
            status: pull_request.status(),
            reviewer1_id: pull_request.reviewers().first(),
            reviewer2_id: pull_request.reviewers().second(),
            created_at: pull_request.created_at(),
            merged_at: pull_request.merged_at(),
        }
    }
}

/// A completed cascade swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignmentResponse {
    /// Pull request that changed.
    pub pull_request_id: PullRequestId,
    /// Deactivated reviewer.
    pub replaced_id: UserId,
    /// Reviewer that took the slot.
    pub replacement_id: UserId,
}

/// A cascade swap that did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignmentFailureResponse {
    /// Pull request that was being updated.
    pub pull_request_id: PullRequestId,
    /// Reviewer that could not be replaced.
    pub reviewer_id: UserId,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

/// Result of `PATCH /teams/{id}/deactivate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivationResponse {
    /// Team that was deactivated.
    pub team_id: TeamId,
    /// Users switched to inactive.
    pub deactivated: Vec<UserId>,
    /// Reviewer swaps that succeeded.
    pub reassigned: Vec<ReassignmentResponse>,
    /// Reviewer swaps that failed.
    pub failures: Vec<ReassignmentFailureResponse>,
}

impl From<TeamDeactivationReport> for DeactivationResponse {
    fn from(report: TeamDeactivationReport) -> Self {
        Self {
            team_id: report.team_id,
            deactivated: report.deactivated,
            reassigned: report
                .reassigned
                .into_iter()
                .map(|swap| ReassignmentResponse {
                    pull_request_id: swap.pull_request,
                    replaced_id: swap.replaced,
                    replacement_id: swap.replacement,
                })
                .collect(),
            failures: report
                .failures
                .into_iter()
                .map(|failure| ReassignmentFailureResponse {
                    pull_request_id: failure.pull_request,
                    reviewer_id: failure.reviewer,
                    error: failure.error.kind().as_str().to_owned(),
                    message: failure.error.to_string(),
                })
                .collect(),
        }
    }
}

/// Assignment counts keyed by reviewer, ordered by identifier.
pub type ReviewStatsResponse = BTreeMap<UserId, u64>;

