//! Then steps for agent directory BDD scenarios.

use super::world::{DirectoryWorld, run_async};
use agora::directory::services::{AgentRegistryServiceError, ConfirmOutcome};
use rstest_bdd_macros::then;

#[then("the search returns {count:usize} agents out of a total of {total:u64}")]
fn search_returns(
    world: &mut DirectoryWorld,
    count: usize,
    total: u64,
) -> Result<(), eyre::Report> {
    let page = world
        .last_search
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing search result in scenario world"))?;
    if page.records.len() != count {
        return Err(eyre::eyre!(
            "expected {count} agents on the page, found {}",
            page.records.len()
        ));
    }
    if page.total != total {
        return Err(eyre::eyre!("expected total {total}, found {}", page.total));
    }
    Ok(())
}

#[then("the update is forbidden")]
fn update_is_forbidden(world: &DirectoryWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_update_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing update result in scenario world"))?;
    if !matches!(result, Err(AgentRegistryServiceError::Forbidden(_))) {
        return Err(eyre::eyre!("expected a forbidden error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the agent is still named "{name}""#)]
fn agent_still_named(world: &mut DirectoryWorld, name: String) -> Result<(), eyre::Report> {
    let agent = world
        .last_registered
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no registered agent in scenario world"))?;
    let stored = run_async(world.registry.find_by_id(agent.id()))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("agent vanished from the store"))?;
    if stored.name().as_str() != name {
        return Err(eyre::eyre!(
            "expected name '{name}', found '{}'",
            stored.name().as_str()
        ));
    }
    Ok(())
}

#[then("the confirmation reports a failed lookup")]
fn confirmation_failed_lookup(world: &DirectoryWorld) -> Result<(), eyre::Report> {
    let outcome = world
        .last_confirm_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing confirmation outcome in scenario world"))?;
    if !matches!(outcome, ConfirmOutcome::LookupFailed { .. }) {
        return Err(eyre::eyre!("expected a failed lookup, got {outcome:?}"));
    }
    Ok(())
}

#[then("the agent record shows the domain verified")]
fn agent_shows_verified(world: &mut DirectoryWorld) -> Result<(), eyre::Report> {
    let outcome = world
        .last_confirm_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing confirmation outcome in scenario world"))?;
    if !matches!(outcome, ConfirmOutcome::Verified(_)) {
        return Err(eyre::eyre!("expected a verified outcome, got {outcome:?}"));
    }

    let agent = world
        .last_registered
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no registered agent in scenario world"))?;
    let stored = run_async(world.registry.find_by_id(agent.id()))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("agent vanished from the store"))?;
    if !stored.verification().verified() || stored.verification().verified_at().is_none() {
        return Err(eyre::eyre!("expected the stored record to be verified"));
    }
    Ok(())
}

#[then("the sweep reports {checked:u64} checked, {healthy:u64} healthy and {unhealthy:u64} unhealthy")]
fn sweep_reports(
    world: &DirectoryWorld,
    checked: u64,
    healthy: u64,
    unhealthy: u64,
) -> Result<(), eyre::Report> {
    let report = world
        .last_sweep
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing sweep report in scenario world"))?;
    if report.checked != checked || report.healthy != healthy || report.unhealthy != unhealthy {
        return Err(eyre::eyre!(
            "expected {checked}/{healthy}/{unhealthy}, found {}/{}/{}",
            report.checked,
            report.healthy,
            report.unhealthy
        ));
    }
    Ok(())
}
