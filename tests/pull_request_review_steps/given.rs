//! Given steps for pull request review BDD scenarios.

use super::world::{ReviewWorld, run_async};
use reviewer_rota::review::services::{CreatePullRequestRequest, CreateUserRequest};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a team "{team}" with members "{members}""#)]
fn team_with_members(
    world: &mut ReviewWorld,
    team: String,
    members: String,
) -> Result<(), eyre::Report> {
    let created = run_async(world.engine.membership.create_team(team.clone()))
        .wrap_err("create team for scenario")?;
    for name in members.split(',').map(str::trim) {
        let request = CreateUserRequest::new(name, created.id());
        let user = run_async(world.engine.membership.create_user(request))
            .wrap_err_with(|| format!("create member {name}"))?;
        world.users.insert(name.to_owned(), user);
    }
    world.teams.insert(team, created);
    Ok(())
}

#[given(r#""{author}" has opened a pull request titled "{title}""#)]
fn pull_request_opened(
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
    .wrap_err("open pull request in scenario setup")?;
    world.opened = Some(created.clone());
    world.current = Some(created);
    Ok(())
}
