//! When steps for agent directory BDD scenarios.

use super::world::{DirectoryWorld, build_request, endpoint_for, run_async};
use agora::directory::{domain::OwnerRef, services::{SearchAgentsRequest, UpdateAgentRequest}};
use rstest_bdd_macros::when;

#[when("both agents are registered")]
fn register_both_agents(world: &mut DirectoryWorld) -> Result<(), eyre::Report> {
    let pending: Vec<_> = world.pending_agents.drain(..).collect();
    for agent in pending {
        let request = build_request(&agent.name, &agent.description, &endpoint_for(&agent.name));
        let written = run_async(world.registry.register(world.owner, request))
            .map_err(|err| eyre::eyre!("unexpected registration failure: {err}"))?;
        world.last_registered = Some(written.record);
    }
    Ok(())
}

#[when(r#"the directory is searched for "{query}""#)]
fn search_directory(world: &mut DirectoryWorld, query: String) -> Result<(), eyre::Report> {
    let page = run_async(world.registry.search(SearchAgentsRequest::new().with_query(query)))
        .map_err(|err| eyre::eyre!("search failed: {err}"))?;
    world.last_search = Some(page);
    Ok(())
}

#[when(r#"a different owner renames it to "{name}""#)]
fn different_owner_renames(world: &mut DirectoryWorld, name: String) -> Result<(), eyre::Report> {
    let agent = world
        .last_registered
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no registered agent in scenario world"))?;
    let result = run_async(world.registry.update(
        OwnerRef::new(),
        agent.id(),
        UpdateAgentRequest::new().with_name(name),
    ));
    world.last_update_result = Some(result);
    Ok(())
}

#[when("the challenge token is published in DNS")]
fn publish_challenge_token(world: &mut DirectoryWorld) -> Result<(), eyre::Report> {
    let challenge = world
        .last_challenge
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no issued challenge in scenario world"))?;
    world.resolver.set_records(
        challenge.instructions.record_name.clone(),
        vec![challenge.token.as_str().to_owned()],
    );
    Ok(())
}

#[when("confirmation is requested")]
fn request_confirmation(world: &mut DirectoryWorld) -> Result<(), eyre::Report> {
    let agent = world
        .last_registered
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no registered agent in scenario world"))?;
    let outcome = run_async(world.verification.confirm(agent.id()))
        .map_err(|err| eyre::eyre!("confirmation failed: {err}"))?;
    world.last_confirm_outcome = Some(outcome);
    Ok(())
}

#[when("a health sweep runs")]
fn run_health_sweep(world: &mut DirectoryWorld) -> Result<(), eyre::Report> {
    let report =
        run_async(world.health.sweep()).map_err(|err| eyre::eyre!("sweep failed: {err}"))?;
    world.last_sweep = Some(report);
    Ok(())
}
