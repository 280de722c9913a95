//! `PostgreSQL` integration tests for lifecycle operations.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use project_lifecycle::project::{
    domain::{LifecycleErrorKind, LifecycleStatus},
    services::{AddTaskRequest, CreateProjectRequest, ProjectLifecycleService},
};
use rstest::rstest;

use crate::postgres::helpers::{BoxError, setup_context, test_runtime};

fn june(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0)
        .single()
        .expect("valid calendar date")
}

#[rstest]
fn lifecycle_round_trips_through_postgres(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = setup_context(shared_test_cluster, "test_service_lifecycle")?;
    let rt = test_runtime()?;
    let service = ProjectLifecycleService::new(Arc::new(ctx.repository), Arc::new(DefaultClock));

    rt.block_on(async {
        let project = service
            .create_project(CreateProjectRequest::new("Roof repair", "Replace slipped tiles"))
            .await?;
        let task = service
            .add_task(project.id(), AddTaskRequest::new("Scaffold", "East gable"))
            .await?;
        service
            .start_task(project.id(), task.id(), Some(june(2)))
            .await?;

        let blocked = service.complete_project(project.id(), Some(june(5))).await;
        assert_eq!(
            blocked.err().and_then(|err| err.kind()),
            Some(LifecycleErrorKind::InvariantViolation)
        );

        service
            .complete_task(project.id(), task.id(), Some(june(4)))
            .await?;
        let completed = service
            .complete_project(project.id(), Some(june(5)))
            .await?;

        let stored = service.find_project(project.id()).await?;
        assert_eq!(stored, completed);
        assert_eq!(stored.status(), LifecycleStatus::Completed);
        assert_eq!(stored.started_at(), Some(june(2)));
        assert_eq!(
            stored.task(task.id())?.status(),
            LifecycleStatus::Completed
        );
        Ok::<(), BoxError>(())
    })
}
