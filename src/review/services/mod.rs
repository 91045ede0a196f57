//! Application services for reviewer assignment.

mod cache;
mod deactivation;
mod engine;
mod error;
mod lifecycle;
mod membership;
mod selector;

pub use cache::ActiveMemberCache;
pub use deactivation::{
    CascadeFailure, CascadeReassignment, TeamDeactivationReport, TeamDeactivationService,
};
pub use engine::ReviewEngine;
pub use error::{ErrorKind, ReviewServiceError, ReviewServiceResult};
pub use lifecycle::{CreatePullRequestRequest, PullRequestLifecycleService, ReviewerReplacement};
pub use membership::{CreateUserRequest, TeamMembershipService};
pub use selector::{MAX_REVIEWERS, ReviewerSelector};
