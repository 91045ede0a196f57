//! Domain model for reviewer assignment.
//!
//! Teams own users, users author pull requests, and every pull request holds
//! up to two reviewers drawn from its author's team. All infrastructure
//! concerns stay outside of this module.

mod error;
mod ids;
mod names;
mod pull_request;
mod reviewers;
mod team;

pub use error::{ParsePullRequestStatusError, ReviewDomainError};
pub use ids::{PullRequestId, TeamId, UserId};
pub use names::{PullRequestTitle, TeamName, UserName};
pub use pull_request::{PersistedPullRequestData, PullRequest, PullRequestStatus};
pub use reviewers::{ReviewerSlot, ReviewerSlots};
pub use team::{Team, User};
