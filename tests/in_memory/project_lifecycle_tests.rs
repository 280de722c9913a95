//! In-memory integration tests for project lifecycle operations.

use super::helpers::{TestService, april, service, started_project};
use eyre::{bail, ensure};
use project_lifecycle::project::{
    domain::{DetailsChange, LifecycleErrorKind, LifecycleStatus, ProjectId},
    services::{AddTaskRequest, CreateProjectRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_runs_from_pending_to_completed(service: TestService) -> eyre::Result<()> {
    let project = service
        .create_project(
            CreateProjectRequest::new("Orchard planting", "Twelve apple trees")
                .with_forecasted_at(april(30)),
        )
        .await?;
    ensure!(project.status() == LifecycleStatus::Pending);

    let started = service.start_project(project.id(), Some(april(2))).await?;
    ensure!(started.status() == LifecycleStatus::Active);

    let completed = service
        .complete_project(project.id(), Some(april(20)))
        .await?;
    ensure!(completed.status() == LifecycleStatus::Completed);
    ensure!(completed.started_at() == Some(april(2)));
    ensure!(completed.finished_at() == Some(april(20)));

    let stored = service.find_project(project.id()).await?;
    ensure!(stored == completed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_project_cannot_be_restarted(service: TestService) -> eyre::Result<()> {
    let project = started_project(&service, "Orchard planting").await?;
    service
        .complete_project(project.id(), Some(april(10)))
        .await?;

    let result = service.start_project(project.id(), Some(april(11))).await;

    let Err(err) = result else {
        bail!("expected restart of a completed project to fail");
    };
    ensure!(err.kind() == Some(LifecycleErrorKind::InvalidTransition));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancel_before_start_date_is_rejected(service: TestService) -> eyre::Result<()> {
    let project = started_project(&service, "Orchard planting").await?;

    let result = service
        .cancel_project(project.id(), Some(april(1) - chrono::Duration::hours(1)))
        .await;

    let Err(err) = result else {
        bail!("expected cancellation before the start date to fail");
    };
    ensure!(err.kind() == Some(LifecycleErrorKind::InvalidTimestamp));
    let stored = service.find_project(project.id()).await?;
    ensure!(stored.status() == LifecycleStatus::Active);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_waits_for_open_tasks(service: TestService) -> eyre::Result<()> {
    let project = started_project(&service, "Orchard planting").await?;
    let task = service
        .add_task(project.id(), AddTaskRequest::new("Dig holes", "Twelve of them"))
        .await?;

    let blocked = service
        .complete_project(project.id(), Some(april(10)))
        .await;
    let Err(err) = blocked else {
        bail!("expected completion with an open task to fail");
    };
    ensure!(err.kind() == Some(LifecycleErrorKind::InvariantViolation));

    service
        .complete_task(project.id(), task.id(), Some(april(9)))
        .await?;
    let completed = service
        .complete_project(project.id(), Some(april(10)))
        .await?;
    ensure!(completed.status() == LifecycleStatus::Completed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn details_can_change_after_completion(service: TestService) -> eyre::Result<()> {
    let project = started_project(&service, "Orchard planting").await?;
    service
        .complete_project(project.id(), Some(april(10)))
        .await?;

    let updated = service
        .update_project(
            project.id(),
            DetailsChange::new()
                .with_name("Orchard planting 2025")
                .with_forecasted_at(april(12)),
        )
        .await?;

    ensure!(updated.name() == "Orchard planting 2025");
    ensure!(updated.forecasted_at() == Some(april(12)));
    ensure!(updated.status() == LifecycleStatus::Completed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_project_is_not_found(service: TestService) -> eyre::Result<()> {
    let result = service.find_project(ProjectId::new()).await;

    let Err(err) = result else {
        bail!("expected lookup of an unknown project to fail");
    };
    ensure!(err.kind() == Some(LifecycleErrorKind::NotFound));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_without_date_uses_the_current_time(service: TestService) -> eyre::Result<()> {
    let project = service
        .create_project(CreateProjectRequest::new("Orchard planting", "Twelve apple trees"))
        .await?;
    let before = chrono::Utc::now();

    let started = service.start_project(project.id(), None).await?;

    let Some(started_at) = started.started_at() else {
        bail!("expected a start date");
    };
    ensure!(started_at >= before);
    ensure!(started_at <= chrono::Utc::now());
    Ok(())
}
