//! Storage contract tests for the in-memory review repository.

use super::helpers::{repo, seed_pull_request, seed_team, seed_user};
use chrono::{Duration, Utc};
use reviewer_rota::review::{
    adapters::memory::InMemoryReviewRepository,
    domain::{PullRequestStatus, ReviewerSlot, ReviewerSlots, Team, TeamName, User, UserName},
    ports::{MergeOutcome, ReviewRepository, ReviewRepositoryError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_names_are_unique(repo: InMemoryReviewRepository) -> Result<(), eyre::Report> {
    seed_team(&repo, "gophers").await?;

    let duplicate = Team::new(TeamName::new("gophers")?);
    let result = repo.create_team(&duplicate).await;

    eyre::ensure!(
        matches!(result, Err(ReviewRepositoryError::DuplicateTeamName(_))),
        "expected duplicate team name, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_requires_existing_team(repo: InMemoryReviewRepository) -> Result<(), eyre::Report> {
    let orphan_team = Team::new(TeamName::new("ghosts")?);
    let user = User::new(UserName::new("casper")?, orphan_team.id());

    let result = repo.create_user(&user).await;

    eyre::ensure!(
        matches!(result, Err(ReviewRepositoryError::TeamNotFound(id)) if id == orphan_team.id()),
        "expected missing team, got {result:?}"
    );
    eyre::ensure!(repo.find_user(user.id()).await?.is_none(), "user was stored");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn active_members_follow_activity_flag(
    repo: InMemoryReviewRepository,
) -> Result<(), eyre::Report> {
    let team = seed_team(&repo, "gophers").await?;
    let alice = seed_user(&repo, "alice", &team).await?;
    let bob = seed_user(&repo, "bob", &team).await?;

    repo.deactivate_user(alice.id()).await?;
    let active = repo.active_team_members(team.id()).await?;
    let all = repo.team_members(team.id()).await?;

    eyre::ensure!(
        active.iter().map(User::id).collect::<Vec<_>>() == vec![bob.id()],
        "only bob should be active"
    );
    eyre::ensure!(all.len() == 2, "both members should be listed");

    repo.activate_user(alice.id()).await?;
    eyre::ensure!(
        repo.active_team_members(team.id()).await?.len() == 2,
        "alice should be active again"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reviewer_update_is_compare_and_swap(
    repo: InMemoryReviewRepository,
) -> Result<(), eyre::Report> {
    let team = seed_team(&repo, "gophers").await?;
    let alice = seed_user(&repo, "alice", &team).await?;
    let bob = seed_user(&repo, "bob", &team).await?;
    let carol = seed_user(&repo, "carol", &team).await?;
    let pull_request = seed_pull_request(&repo, "cas", alice.id()).await?;

    let assigned = ReviewerSlots::new(Some(bob.id()), Some(carol.id()), alice.id())?;
    let updated = repo
        .replace_reviewers(pull_request.id(), ReviewerSlots::empty(), assigned)
        .await?;
    eyre::ensure!(*updated.reviewers() == assigned, "slots were not written");

    let stale = repo
        .replace_reviewers(
            pull_request.id(),
            ReviewerSlots::empty(),
            assigned.vacate(ReviewerSlot::First),
        )
        .await;
    eyre::ensure!(
        matches!(stale, Err(ReviewRepositoryError::ReviewersChanged(_))),
        "stale expectation should conflict, got {stale:?}"
    );

    let stored = repo
        .find_pull_request(pull_request.id())
        .await?
        .ok_or_else(|| eyre::eyre!("pull request missing"))?;
    eyre::ensure!(*stored.reviewers() == assigned, "conflict mutated slots");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn merge_keeps_first_timestamp(repo: InMemoryReviewRepository) -> Result<(), eyre::Report> {
    let team = seed_team(&repo, "gophers").await?;
    let alice = seed_user(&repo, "alice", &team).await?;
    let pull_request = seed_pull_request(&repo, "merge", alice.id()).await?;
    let first_at = Utc::now();

    let first = repo.merge_pull_request(pull_request.id(), first_at).await?;
    let second = repo
        .merge_pull_request(pull_request.id(), first_at + Duration::hours(1))
        .await?;

    let MergeOutcome::Merged(merged) = first else {
        eyre::bail!("first merge should transition the pull request");
    };
    let MergeOutcome::AlreadyMerged(unchanged) = second else {
        eyre::bail!("second merge should report the existing merge");
    };
    eyre::ensure!(merged.status() == PullRequestStatus::Merged, "not merged");
    eyre::ensure!(unchanged.merged_at() == Some(first_at), "merge time moved");

    let reassign = repo
        .replace_reviewers(
            pull_request.id(),
            ReviewerSlots::empty(),
            ReviewerSlots::empty(),
        )
        .await;
    eyre::ensure!(
        matches!(reassign, Err(ReviewRepositoryError::PullRequestNotOpen(_))),
        "merged pull request accepted a reviewer write"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_listing_includes_only_open_pull_requests_of_its_authors(
    repo: InMemoryReviewRepository,
) -> Result<(), eyre::Report> {
    let gophers = seed_team(&repo, "gophers").await?;
    let crabs = seed_team(&repo, "crabs").await?;
    let alice = seed_user(&repo, "alice", &gophers).await?;
    let ferris = seed_user(&repo, "ferris", &crabs).await?;
    let open = seed_pull_request(&repo, "open", alice.id()).await?;
    let shipped = seed_pull_request(&repo, "shipped", alice.id()).await?;
    seed_pull_request(&repo, "elsewhere", ferris.id()).await?;
    repo.merge_pull_request(shipped.id(), Utc::now()).await?;

    let listed = repo.open_pull_requests_by_team(gophers.id()).await?;

    eyre::ensure!(
        listed.iter().map(|pr| pr.id()).collect::<Vec<_>>() == vec![open.id()],
        "unexpected pull requests listed for gophers"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_stats_count_every_slot(repo: InMemoryReviewRepository) -> Result<(), eyre::Report> {
    let team = seed_team(&repo, "gophers").await?;
    let alice = seed_user(&repo, "alice", &team).await?;
    let bob = seed_user(&repo, "bob", &team).await?;
    let carol = seed_user(&repo, "carol", &team).await?;
    let first = seed_pull_request(&repo, "first", alice.id()).await?;
    let second = seed_pull_request(&repo, "second", alice.id()).await?;
    repo.replace_reviewers(
        first.id(),
        ReviewerSlots::empty(),
        ReviewerSlots::new(Some(bob.id()), Some(carol.id()), alice.id())?,
    )
    .await?;
    repo.replace_reviewers(
        second.id(),
        ReviewerSlots::empty(),
        ReviewerSlots::new(Some(carol.id()), None, alice.id())?,
    )
    .await?;

    let stats = repo.review_load_stats().await?;
    let by_carol = repo.pull_requests_by_reviewer(carol.id()).await?;

    eyre::ensure!(stats.get(&bob.id()) == Some(&1), "bob count: {stats:?}");
    eyre::ensure!(stats.get(&carol.id()) == Some(&2), "carol count: {stats:?}");
    eyre::ensure!(!stats.contains_key(&alice.id()), "author counted");
    eyre::ensure!(
        by_carol.iter().map(|pr| pr.id()).collect::<Vec<_>>() == vec![first.id(), second.id()],
        "listing should be ordered by creation"
    );
    Ok(())
}
