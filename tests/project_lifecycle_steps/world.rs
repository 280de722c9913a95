//! Shared world state for project lifecycle BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use mockable::DefaultClock;
use project_lifecycle::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Project, TaskId},
    services::{ProjectLifecycleError, ProjectLifecycleService},
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestProjectService = ProjectLifecycleService<InMemoryProjectRepository, DefaultClock>;

/// Scenario world for project lifecycle behaviour tests.
pub struct ProjectLifecycleWorld {
    pub service: TestProjectService,
    pub project: Option<Project>,
    pub task_ids: HashMap<String, TaskId>,
    pub last_result: Option<Result<(), ProjectLifecycleError>>,
}

impl ProjectLifecycleWorld {
    /// Creates a world with no project.
    #[must_use]
    pub fn new() -> Self {
        let service = ProjectLifecycleService::new(
            Arc::new(InMemoryProjectRepository::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            project: None,
            task_ids: HashMap::new(),
            last_result: None,
        }
    }

    /// Returns the scenario's project as last seen.
    pub fn project(&self) -> Result<&Project, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Looks up a task created earlier in the scenario by name.
    pub fn task_id(&self, name: &str) -> Result<TaskId, eyre::Report> {
        self.task_ids
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task named {name} in scenario world"))
    }

    /// Reloads the project from the repository.
    pub fn refresh(&mut self) -> Result<(), eyre::Report> {
        let id = self.project()?.id();
        let stored = run_async(self.service.find_project(id))?;
        self.project = Some(stored);
        Ok(())
    }
}

impl Default for ProjectLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ProjectLifecycleWorld {
    ProjectLifecycleWorld::default()
}

/// Parses a `YYYY-MM-DD` scenario date as midnight UTC.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, eyre::Report> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| eyre::eyre!("invalid scenario date {value}: {err}"))?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| eyre::eyre!("invalid scenario date {value}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
