//! JSON HTTP surface over the review services.
//!
//! Handlers are generic over the repository and clock so the same router
//! serves the in-memory and `PostgreSQL` back ends.

pub mod dto;
mod error;
mod extract;
mod handlers;

pub use error::ApiError;

use crate::review::{ports::ReviewRepository, services::ReviewEngine};
use axum::{
    Router,
    routing::{get, patch, post},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Builds the application router.
///
/// Requests exceeding `request_timeout` are answered with
/// `408 Request Timeout`; the in-flight operation is dropped at that point.
pub fn router<R, C>(engine: Arc<ReviewEngine<R, C>>, request_timeout: Duration) -> Router
where
    R: ReviewRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(handlers::health))
        .route("/teams", post(handlers::create_team::<R, C>))
        .route(
            "/teams/:team_id/deactivate",
            patch(handlers::deactivate_team::<R, C>),
        )
        .route("/users", post(handlers::create_user::<R, C>))
        .route(
            "/users/:user_id/pull-requests",
            get(handlers::reviewer_pull_requests::<R, C>),
        )
        .route(
            "/pull-requests",
            post(handlers::create_pull_request::<R, C>),
        )
        .route(
            "/pull-requests/:pull_request_id",
            get(handlers::get_pull_request::<R, C>),
        )
        .route(
            "/pull-requests/:pull_request_id/reassign",
            patch(handlers::reassign_reviewer::<R, C>),
        )
        .route(
            "/pull-requests/:pull_request_id/merge",
            patch(handlers::merge_pull_request::<R, C>),
        )
        .route("/stats/reviewers", get(handlers::review_stats::<R, C>))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}
