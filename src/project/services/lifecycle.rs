//! Service layer for project and task lifecycle operations.
//!
//! Every mutating operation loads the aggregate, applies one domain
//! operation and saves the result. A rejected domain operation never
//! reaches the repository.

use crate::project::{
    domain::{
        DetailsChange, LifecycleErrorKind, NewProject, NewTask, Project, ProjectDomainError,
        ProjectId, Task, TaskId,
    },
    ports::{ProjectRepository, ProjectRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: String,
    started_at: Option<DateTime<Utc>>,
    forecasted_at: Option<DateTime<Utc>>,
}

impl CreateProjectRequest {
    /// Creates a request with the required project fields.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            started_at: None,
            forecasted_at: None,
        }
    }

    /// Starts the project on creation.
    #[must_use]
    pub const fn with_started_at(mut self, date: DateTime<Utc>) -> Self {
        self.started_at = Some(date);
        self
    }

    /// Sets the forecast completion date.
    #[must_use]
    pub const fn with_forecasted_at(mut self, date: DateTime<Utc>) -> Self {
        self.forecasted_at = Some(date);
        self
    }
}

/// Request payload for adding a task to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTaskRequest {
    name: String,
    description: String,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    forecasted_at: Option<DateTime<Utc>>,
}

impl AddTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            started_at: None,
            finished_at: None,
            forecasted_at: None,
        }
    }

    /// Starts the task on creation.
    #[must_use]
    pub const fn with_started_at(mut self, date: DateTime<Utc>) -> Self {
        self.started_at = Some(date);
        self
    }

    /// Completes the task on creation.
    #[must_use]
    pub const fn with_finished_at(mut self, date: DateTime<Utc>) -> Self {
        self.finished_at = Some(date);
        self
    }

    /// Sets the forecast completion date.
    #[must_use]
    pub const fn with_forecasted_at(mut self, date: DateTime<Utc>) -> Self {
        self.forecasted_at = Some(date);
        self
    }
}

/// Service-level errors for project lifecycle operations.
#[derive(Debug, Error)]
pub enum ProjectLifecycleError {
    /// A lifecycle rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
}

impl ProjectLifecycleError {
    /// Returns the failure category, or `None` for infrastructure failures.
    #[must_use]
    pub const fn kind(&self) -> Option<LifecycleErrorKind> {
        match self {
            Self::Domain(err) => Some(err.kind()),
            Self::Repository(ProjectRepositoryError::NotFound(_)) => {
                Some(LifecycleErrorKind::NotFound)
            }
            Self::Repository(ProjectRepositoryError::Persistence(_)) => None,
        }
    }
}

/// Result type for project lifecycle service operations.
pub type ProjectLifecycleResult<T> = Result<T, ProjectLifecycleError>;

/// Project lifecycle orchestration service.
///
/// Dates left as `None` default to the current time of the injected clock.
#[derive(Clone)]
pub struct ProjectLifecycleService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ProjectLifecycleService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates and stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::Repository`] when persistence fails.
    pub async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> ProjectLifecycleResult<Project> {
        let CreateProjectRequest {
            name,
            description,
            started_at,
            forecasted_at,
        } = request;

        let mut new_project = NewProject::new(name, description);
        if let Some(date) = started_at {
            new_project = new_project.with_started_at(date);
        }
        if let Some(date) = forecasted_at {
            new_project = new_project.with_forecasted_at(date);
        }

        let saved = self.repository.save(&Project::create(new_project)).await?;
        debug!(project_id = %saved.id(), status = %saved.status(), "created project");
        Ok(saved)
    }

    /// Retrieves a project with its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::Repository`] when the project does not
    /// exist or the lookup fails.
    pub async fn find_project(&self, id: ProjectId) -> ProjectLifecycleResult<Project> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Lists every stored project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::Repository`] when the lookup fails.
    pub async fn list_projects(&self) -> ProjectLifecycleResult<Vec<Project>> {
        Ok(self.repository.find_all().await?)
    }

    /// Starts a pending project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError`] when the project is missing, the
    /// transition is rejected, or persistence fails.
    pub async fn start_project(
        &self,
        id: ProjectId,
        date: Option<DateTime<Utc>>,
    ) -> ProjectLifecycleResult<Project> {
        let at = self.resolve(date);
        self.modify_project(id, "started project", |project| project.start(at))
            .await
    }

    /// Cancels a project and its pending tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError`] when the project is missing, the
    /// cancellation is rejected, or persistence fails.
    pub async fn cancel_project(
        &self,
        id: ProjectId,
        date: Option<DateTime<Utc>>,
    ) -> ProjectLifecycleResult<Project> {
        let at = self.resolve(date);
        self.modify_project(id, "cancelled project", |project| project.cancel(at))
            .await
    }

    /// Completes a project whose tasks are all resolved.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError`] when the project is missing, the
    /// completion is rejected, or persistence fails.
    pub async fn complete_project(
        &self,
        id: ProjectId,
        date: Option<DateTime<Utc>>,
    ) -> ProjectLifecycleResult<Project> {
        let at = self.resolve(date);
        self.modify_project(id, "completed project", |project| project.complete(at))
            .await
    }

    /// Updates the name, description or forecast date of a project.
    ///
    /// An empty change returns the stored project without saving it.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::Repository`] when the project is
    /// missing or persistence fails.
    pub async fn update_project(
        &self,
        id: ProjectId,
        change: DetailsChange,
    ) -> ProjectLifecycleResult<Project> {
        if change.is_empty() {
            return Ok(self.repository.find_by_id(id).await?);
        }
        self.modify_project(id, "updated project details", |project| {
            project.change_details(change);
            Ok(())
        })
        .await
    }

    /// Creates a task and attaches it to a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError`] when the project is missing, the task
    /// is rejected, or persistence fails.
    pub async fn add_task(
        &self,
        project_id: ProjectId,
        request: AddTaskRequest,
    ) -> ProjectLifecycleResult<Task> {
        let AddTaskRequest {
            name,
            description,
            started_at,
            finished_at,
            forecasted_at,
        } = request;

        let mut new_task = NewTask::new(name, description);
        if let Some(date) = started_at {
            new_task = new_task.with_started_at(date);
        }
        if let Some(date) = finished_at {
            new_task = new_task.with_finished_at(date);
        }
        if let Some(date) = forecasted_at {
            new_task = new_task.with_forecasted_at(date);
        }
        let task = Task::create(new_task);
        let task_id = task.id();

        let saved = self
            .modify_project(project_id, "added task", |project| project.add_task(task))
            .await?;
        Ok(saved.task(task_id)?.clone())
    }

    /// Starts a task owned by a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError`] when the project or task is missing,
    /// the transition is rejected, or persistence fails.
    pub async fn start_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        date: Option<DateTime<Utc>>,
    ) -> ProjectLifecycleResult<Task> {
        let at = self.resolve(date);
        self.modify_task(project_id, task_id, "started task", |project| {
            project.start_task(task_id, at)
        })
        .await
    }

    /// Cancels a task owned by a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError`] when the project or task is missing,
    /// the transition is rejected, or persistence fails.
    pub async fn cancel_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        date: Option<DateTime<Utc>>,
    ) -> ProjectLifecycleResult<Task> {
        let at = self.resolve(date);
        self.modify_task(project_id, task_id, "cancelled task", |project| {
            project.cancel_task(task_id, at)
        })
        .await
    }

    /// Completes a task owned by a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError`] when the project or task is missing,
    /// the transition is rejected, or persistence fails.
    pub async fn complete_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        date: Option<DateTime<Utc>>,
    ) -> ProjectLifecycleResult<Task> {
        let at = self.resolve(date);
        self.modify_task(project_id, task_id, "completed task", |project| {
            project.complete_task(task_id, at)
        })
        .await
    }

    /// Updates the name, description or forecast date of a task.
    ///
    /// An empty change returns the stored task without saving its project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError`] when the project or task is missing
    /// or persistence fails.
    pub async fn update_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        change: DetailsChange,
    ) -> ProjectLifecycleResult<Task> {
        if change.is_empty() {
            let project = self.repository.find_by_id(project_id).await?;
            return Ok(project.task(task_id)?.clone());
        }
        self.modify_task(project_id, task_id, "updated task details", |project| {
            project.change_task_details(task_id, change)
        })
        .await
    }

    fn resolve(&self, date: Option<DateTime<Utc>>) -> DateTime<Utc> {
        date.unwrap_or_else(|| self.clock.utc())
    }

    /// Loads a project, applies `operation` and saves the result.
    async fn modify_project<F>(
        &self,
        id: ProjectId,
        event: &'static str,
        operation: F,
    ) -> ProjectLifecycleResult<Project>
    where
        F: FnOnce(&mut Project) -> Result<(), ProjectDomainError> + Send,
    {
        let mut project = self.repository.find_by_id(id).await?;
        operation(&mut project)?;
        let saved = self.repository.save(&project).await?;
        debug!(project_id = %id, status = %saved.status(), "{event}");
        Ok(saved)
    }

    async fn modify_task<F>(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        event: &'static str,
        operation: F,
    ) -> ProjectLifecycleResult<Task>
    where
        F: FnOnce(&mut Project) -> Result<(), ProjectDomainError> + Send,
    {
        let saved = self.modify_project(project_id, event, operation).await?;
        Ok(saved.task(task_id)?.clone())
    }
}
