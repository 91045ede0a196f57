//! Review engine flows over `PostgreSQL` storage.

use super::helpers::{TestDatabase, test_runtime};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use reviewer_rota::review::{
    adapters::postgres::PostgresReviewRepository,
    domain::{PullRequestStatus, User, UserId},
    ports::ReviewRepository,
    services::{CreatePullRequestRequest, CreateUserRequest, ErrorKind, ReviewEngine},
};
use rstest::rstest;
use std::collections::HashSet;
use std::sync::Arc;

type PostgresEngine = ReviewEngine<PostgresReviewRepository, DefaultClock>;

fn build_engine(repo: PostgresReviewRepository) -> (Arc<PostgresReviewRepository>, PostgresEngine) {
    let repository = Arc::new(repo);
    let engine = ReviewEngine::new(Arc::clone(&repository), Arc::new(DefaultClock));
    (repository, engine)
}

async fn staff(
    engine: &PostgresEngine,
    team: &str,
    names: &[&str],
) -> Result<Vec<User>, eyre::Report> {
    let team = engine.membership.create_team(team).await?;
    let mut members = Vec::with_capacity(names.len());
    for name in names {
        let request = CreateUserRequest::new(*name, team.id());
        members.push(engine.membership.create_user(request).await?);
    }
    Ok(members)
}

#[rstest]
fn gophers_review_and_merge(shared_test_cluster: &'static TestCluster) -> Result<(), eyre::Report> {
    let database = TestDatabase::create(shared_test_cluster, "gophers")?;
    let (_, engine) = build_engine(database.repository()?);
    test_runtime()?.block_on(async {
        let members = staff(&engine, "gophers", &["alice", "bob", "charlie"]).await?;
        let [alice, bob, charlie]: [UserId; 3] = members
            .iter()
            .map(User::id)
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| eyre::eyre!("expected three gophers"))?;

        let created = engine
            .lifecycle
            .create_pull_request(CreatePullRequestRequest::new("fix bug", alice))
            .await?;
        let reviewers: HashSet<UserId> = created.reviewers().iter().collect();
        eyre::ensure!(
            reviewers == HashSet::from([bob, charlie]),
            "unexpected reviewers {reviewers:?}"
        );

        let merged = engine.lifecycle.merge_pull_request(created.id()).await?;
        let again = engine.lifecycle.merge_pull_request(created.id()).await?;
        eyre::ensure!(merged.status() == PullRequestStatus::Merged, "not merged");
        eyre::ensure!(again.merged_at() == merged.merged_at(), "merge time moved");

        let refused = engine.lifecycle.reassign_reviewer(created.id(), bob).await;
        eyre::ensure!(
            refused.as_ref().is_err_and(|err| err.kind() == ErrorKind::InvalidState),
            "merged pull request accepted reassignment: {refused:?}"
        );
        Ok::<(), eyre::Report>(())
    })
}

#[rstest]
fn reassignment_fills_the_vacated_slot_in_place(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let database = TestDatabase::create(shared_test_cluster, "reassign")?;
    let (repository, engine) = build_engine(database.repository()?);
    test_runtime()?.block_on(async {
        let members = staff(&engine, "gophers", &["alice", "bob", "carol", "dave"]).await?;
        let author = members
            .first()
            .map(User::id)
            .ok_or_else(|| eyre::eyre!("team has no members"))?;
        let created = engine
            .lifecycle
            .create_pull_request(CreatePullRequestRequest::new("swap", author))
            .await?;
        let (Some(first), Some(second)) =
            (created.reviewers().first(), created.reviewers().second())
        else {
            eyre::bail!("expected two reviewers, got {:?}", created.reviewers());
        };

        let replacement = engine.lifecycle.replace_reviewer(created.id(), first).await?;
        let stored = repository
            .find_pull_request(created.id())
            .await?
            .ok_or_else(|| eyre::eyre!("pull request missing"))?;
        eyre::ensure!(
            stored.reviewers().first() == Some(replacement.replacement),
            "slot 1 not refilled: {:?}",
            stored.reviewers()
        );
        eyre::ensure!(stored.reviewers().second() == Some(second), "slot 2 moved");
        eyre::ensure!(
            ![author, first, second].contains(&replacement.replacement),
            "replacement already involved"
        );
        Ok::<(), eyre::Report>(())
    })
}

#[rstest]
fn team_deactivation_vacates_reviewer_slots(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let database = TestDatabase::create(shared_test_cluster, "deactivate")?;
    let (repository, engine) = build_engine(database.repository()?);
    test_runtime()?.block_on(async {
        let members = staff(&engine, "gophers", &["alice", "bob", "charlie"]).await?;
        let author = members
            .first()
            .ok_or_else(|| eyre::eyre!("team has no members"))?;
        let created = engine
            .lifecycle
            .create_pull_request(CreatePullRequestRequest::new("fix bug", author.id()))
            .await?;

        let report = engine.deactivation.deactivate_team(author.team_id()).await?;

        eyre::ensure!(report.deactivated.len() == 3, "report: {report:?}");
        eyre::ensure!(report.reassigned.is_empty(), "report: {report:?}");
        eyre::ensure!(report.failures.len() == 2, "report: {report:?}");
        eyre::ensure!(
            report
                .failures
                .iter()
                .all(|failure| failure.error.kind() == ErrorKind::NoAvailableReviewer),
            "report: {report:?}"
        );
        let stored = repository
            .find_pull_request(created.id())
            .await?
            .ok_or_else(|| eyre::eyre!("pull request missing"))?;
        eyre::ensure!(stored.reviewers().is_empty(), "slots: {:?}", stored.reviewers());
        eyre::ensure!(
            repository.active_team_members(author.team_id()).await?.is_empty(),
            "team still has active members"
        );
        Ok::<(), eyre::Report>(())
    })
}
