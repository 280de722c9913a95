//! Then steps for project lifecycle BDD scenarios.

use super::world::ProjectLifecycleWorld;
use project_lifecycle::project::domain::LifecycleStatus;
use rstest_bdd_macros::then;

fn expected_status(status: &str) -> Result<LifecycleStatus, eyre::Report> {
    LifecycleStatus::try_from(status)
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))
}

#[then(r#"the project status is "{status}""#)]
fn project_status_is(world: &ProjectLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = expected_status(&status)?;
    let project = world.project()?;

    if project.status() != expected {
        return Err(eyre::eyre!(
            "expected project status {expected}, found {}",
            project.status()
        ));
    }
    Ok(())
}

#[then(r#"the task "{name}" status is "{status}""#)]
fn task_status_is(
    world: &ProjectLifecycleWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = expected_status(&status)?;
    let task = world.project()?.task(world.task_id(&name)?)?;

    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected task {name} status {expected}, found {}",
            task.status()
        ));
    }
    Ok(())
}

#[then(r#"the operation fails with a "{kind}" error"#)]
fn operation_fails_with(world: &ProjectLifecycleWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation result"))?;

    let Err(err) = result else {
        return Err(eyre::eyre!("expected a {kind} error, but the operation succeeded"));
    };
    let actual = err.kind().map(|found| found.to_string());
    if actual.as_deref() != Some(kind.as_str()) {
        return Err(eyre::eyre!("expected a {kind} error, got {err:?}"));
    }
    Ok(())
}
