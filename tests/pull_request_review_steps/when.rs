//! When steps for pull request review BDD scenarios.

use super::world::{ReviewWorld, run_async};
use reviewer_rota::review::{domain::ReviewerSlot, services::CreatePullRequestRequest};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#""{author}" opens a pull request titled "{title}""#)]
fn open_pull_request(
    world: &mut ReviewWorld,
    author: String,
    title: String,
) -> Result<(), eyre::Report> {
    let author_id = world.user(&author)?.id();
    let created = run_async(
        world
            .engine
            .lifecycle
            .create_pull_request(CreatePullRequestRequest::new(title, author_id)),
    )
    .wrap_err("open pull request")?;
    world.opened = Some(created.clone());
    world.current = Some(created);
    Ok(())
}

fn reassign(world: &mut ReviewWorld, slot: ReviewerSlot) -> Result<(), eyre::Report> {
    let current = world.current()?;
    let id = current.id();
    let reviewers = current.reviewers();
    let reviewer = match slot {
        ReviewerSlot::First => reviewers.first(),
        ReviewerSlot::Second => reviewers.second(),
    }
    .ok_or_else(|| eyre::eyre!("reviewer slot {slot:?} is empty"))?;

    let result = run_async(world.engine.lifecycle.reassign_reviewer(id, reviewer));
    let refreshed =
        run_async(world.engine.lifecycle.find_pull_request(id)).wrap_err("reload pull request")?;
    world.current = Some(refreshed);
    world.last_reassignment = Some(result);
    Ok(())
}

#[when("the first reviewer is reassigned")]
fn reassign_first(world: &mut ReviewWorld) -> Result<(), eyre::Report> {
    reassign(world, ReviewerSlot::First)
}

#[when("the second reviewer is reassigned")]
fn reassign_second(world: &mut ReviewWorld) -> Result<(), eyre::Report> {
    reassign(world, ReviewerSlot::Second)
}

fn merge(world: &mut ReviewWorld) -> Result<(), eyre::Report> {
    let id = world.current()?.id();
    let merged = run_async(world.engine.lifecycle.merge_pull_request(id))
        .wrap_err("merge pull request")?;
    world.merges.push(merged.clone());
    world.current = Some(merged);
    Ok(())
}

#[when("the pull request is merged")]
fn merge_once(world: &mut ReviewWorld) -> Result<(), eyre::Report> {
    merge(world)
}

#[when("the pull request is merged again")]
fn merge_again(world: &mut ReviewWorld) -> Result<(), eyre::Report> {
    merge(world)
}

#[when(r#"the team "{team}" is deactivated"#)]
fn deactivate_team(world: &mut ReviewWorld, team: String) -> Result<(), eyre::Report> {
    let team_id = world.team(&team)?.id();
    let report = run_async(world.engine.deactivation.deactivate_team(team_id))
        .wrap_err("deactivate team")?;
    let id = world.current()?.id();
    let refreshed =
        run_async(world.engine.lifecycle.find_pull_request(id)).wrap_err("reload pull request")?;
    world.current = Some(refreshed);
    world.report = Some(report);
    Ok(())
}
