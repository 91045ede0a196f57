use super::{
    ApiError,
    dto::{
        CreatePullRequestBody, CreateTeamBody, CreateUserBody, DeactivationResponse,
        PullRequestResponse, ReassignBody, ReviewStatsResponse, TeamResponse, UserResponse,
    },
    extract::{ApiJson, ApiPath},
};
use crate::review::{
    domain::{PullRequestId, TeamId, UserId},
    ports::ReviewRepository,
    services::{CreatePullRequestRequest, CreateUserRequest, ReviewEngine},
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use mockable::Clock;
use serde_json::{Value, json};
use std::sync::Arc;

type EngineState<R, C> = State<Arc<ReviewEngine<R, C>>>;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn create_team<R, C>(
    State(engine): EngineState<R, C>,
    ApiJson(body): ApiJson<CreateTeamBody>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError>
where
    R: ReviewRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let team = engine.membership.create_team(body.name).await?;
    Ok((StatusCode::CREATED, Json(TeamResponse::from(&team))))
}

pub async fn create_user<R, C>(
    State(engine): EngineState<R, C>,
    ApiJson(body): ApiJson<CreateUserBody>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError>
where
    R: ReviewRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let request = CreateUserRequest::new(body.username, body.team_id);
    let user = engine.membership.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

pub async fn create_pull_request<R, C>(
    State(engine): EngineState<R, C>,
    ApiJson(body): ApiJson<CreatePullRequestBody>,
) -> Result<(StatusCode, Json<PullRequestResponse>), ApiError>
where
    R: ReviewRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let request = CreatePullRequestRequest::new(body.title, body.author_id);
    let pull_request = engine.lifecycle.create_pull_request(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(PullRequestResponse::from(&pull_request)),
    ))
}

pub async fn get_pull_request<R, C>(
    State(engine): EngineState<R, C>,
    ApiPath(pull_request_id): ApiPath<PullRequestId>,
) -> Result<Json<PullRequestResponse>, ApiError>
where
    R: ReviewRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let pull_request = engine.lifecycle.find_pull_request(pull_request_id).await?;
    Ok(Json(PullRequestResponse::from(&pull_request)))
}

pub async fn reassign_reviewer<R, C>(
    State(engine): EngineState<R, C>,
    ApiPath(pull_request_id): ApiPath<PullRequestId>,
    ApiJson(body): ApiJson<ReassignBody>,
) -> Result<Json<PullRequestResponse>, ApiError>
where
    R: ReviewRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let pull_request = engine
        .lifecycle
        .reassign_reviewer(pull_request_id, body.reviewer_id)
        .await?;
    Ok(Json(PullRequestResponse::from(&pull_request)))
}

pub async fn merge_pull_request<R, C>(
    State(engine): EngineState<R, C>,
    ApiPath(pull_request_id): ApiPath<PullRequestId>,
) -> Result<Json<PullRequestResponse>, ApiError>
where
    R: ReviewRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let pull_request = engine.lifecycle.merge_pull_request(pull_request_id).await?;
    Ok(Json(PullRequestResponse::from(&pull_request)))
}

pub async fn reviewer_pull_requests<R, C>(
    State(engine): EngineState<R, C>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<Vec<PullRequestResponse>>, ApiError>
where
    R: ReviewRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let pull_requests = engine.lifecycle.pull_requests_for_reviewer(user_id).await?;
    Ok(Json(
        pull_requests.iter().map(PullRequestResponse::from).collect(),
    ))
}

pub async fn review_stats<R, C>(
    State(engine): EngineState<R, C>,
) -> Result<Json<ReviewStatsResponse>, ApiError>
where
    R: ReviewRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let counts = engine.lifecycle.review_load_stats().await?;
    Ok(Json(counts.into_iter().collect()))
}

pub async fn deactivate_team<R, C>(
    State(engine): EngineState<R, C>,
    ApiPath(team_id): ApiPath<TeamId>,
) -> Result<Json<DeactivationResponse>, ApiError>
where
    R: ReviewRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let report = engine.deactivation.deactivate_team(team_id).await?;
    Ok(Json(DeactivationResponse::from(report)))
}
