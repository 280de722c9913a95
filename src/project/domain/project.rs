//! Project aggregate root.
//!
//! A project owns its tasks outright: every change to a task goes through
//! the project so that the cross-entity rules hold after each operation.
//!
//! - A project completes only once none of its tasks are pending or active.
//! - Cancelling a project cancels its pending tasks at the same date; active
//!   tasks are left as they are.
//! - A task never starts before its project.

use super::{
    DetailsChange, EntityRef, LifecycleAction, LifecycleStatus, ProjectDomainError, ProjectId,
    Task, TaskId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameter object for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    name: String,
    description: String,
    started_at: Option<DateTime<Utc>>,
    forecasted_at: Option<DateTime<Utc>>,
}

impl NewProject {
    /// Creates a parameter object with the required descriptive fields.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            started_at: None,
            forecasted_at: None,
        }
    }

    /// Starts the project at `date` on creation.
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

/// Project aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: String,
    started_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    forecasted_at: Option<DateTime<Utc>>,
    status: LifecycleStatus,
    tasks: Vec<Task>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted cancellation timestamp.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp.
    pub finished_at: Option<DateTime<Utc>>,
    /// Persisted forecast date.
    pub forecasted_at: Option<DateTime<Utc>>,
    /// Persisted lifecycle status.
    pub status: LifecycleStatus,
    /// Owned tasks in project order.
    pub tasks: Vec<Task>,
}

impl Project {
    /// Creates a pending project, started immediately when the parameter
    /// object carries a start date.
    #[must_use]
    pub fn create(new_project: NewProject) -> Self {
        let NewProject {
            name,
            description,
            started_at,
            forecasted_at,
        } = new_project;

        let mut project = Self {
            id: ProjectId::new(),
            name,
            description,
            started_at: None,
            cancelled_at: None,
            finished_at: None,
            forecasted_at,
            status: LifecycleStatus::Pending,
            tasks: Vec::new(),
        };
        if let Some(date) = started_at {
            project.mark_started(date);
        }
        project
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            started_at: data.started_at,
            cancelled_at: data.cancelled_at,
            finished_at: data.finished_at,
            forecasted_at: data.forecasted_at,
            status: data.status,
            tasks: data.tasks,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the project description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the start timestamp, if started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns the cancellation timestamp, if cancelled.
    #[must_use]
    pub const fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    /// Returns the completion timestamp, if completed.
    #[must_use]
    pub const fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Returns the forecast completion date.
    #[must_use]
    pub const fn forecasted_at(&self) -> Option<DateTime<Utc>> {
        self.forecasted_at
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> LifecycleStatus {
        self.status
    }

    /// Returns the owned tasks in the order they were added.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up an owned task.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::TaskNotFound`] when the project owns no
    /// task with this identifier.
    pub fn task(&self, task_id: TaskId) -> Result<&Task, ProjectDomainError> {
        self.tasks
            .iter()
            .find(|task| task.id() == task_id)
            .ok_or(ProjectDomainError::TaskNotFound {
                project_id: self.id,
                task_id,
            })
    }

    /// Starts a pending project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidTransition`] unless the project is
    /// pending.
    pub fn start(&mut self, date: DateTime<Utc>) -> Result<(), ProjectDomainError> {
        self.ensure_permits(LifecycleAction::Start)?;
        self.mark_started(date);
        Ok(())
    }

    /// Cancels the project and every task that is still pending.
    ///
    /// An unstarted project may be cancelled at any date.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidTransition`] when the project is
    /// already cancelled or completed, and
    /// [`ProjectDomainError::InvalidTimestamp`] when `date` precedes the start
    /// date.
    pub fn cancel(&mut self, date: DateTime<Utc>) -> Result<(), ProjectDomainError> {
        self.ensure_permits(LifecycleAction::Cancel)?;
        self.ensure_not_before_start(LifecycleAction::Cancel, date)?;

        self.cancelled_at = Some(date);
        self.status = LifecycleStatus::Cancelled;
        for task in self
            .tasks
            .iter_mut()
            .filter(|task| task.status() == LifecycleStatus::Pending)
        {
            task.mark_cancelled(date);
        }
        Ok(())
    }

    /// Completes the project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidTransition`] when the project is
    /// already cancelled or completed,
    /// [`ProjectDomainError::InvalidTimestamp`] when `date` precedes the start
    /// date, and [`ProjectDomainError::UnresolvedTasks`] while any task is
    /// pending or active.
    pub fn complete(&mut self, date: DateTime<Utc>) -> Result<(), ProjectDomainError> {
        self.ensure_permits(LifecycleAction::Complete)?;
        self.ensure_not_before_start(LifecycleAction::Complete, date)?;

        let task_ids: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|task| task.status().is_unresolved())
            .map(Task::id)
            .collect();
        if !task_ids.is_empty() {
            return Err(ProjectDomainError::UnresolvedTasks {
                project_id: self.id,
                task_ids,
            });
        }

        self.finished_at = Some(date);
        self.status = LifecycleStatus::Completed;
        Ok(())
    }

    /// Attaches a task to the end of the project's task list.
    ///
    /// A pending project receiving a started task starts at the task's start
    /// date.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidTransition`] when the project is
    /// cancelled or completed, [`ProjectDomainError::TaskAlreadyAttached`] or
    /// [`ProjectDomainError::DuplicateTask`] when the task already has an
    /// owner, and [`ProjectDomainError::InvalidTimestamp`] when the task
    /// started before the project.
    pub fn add_task(&mut self, mut task: Task) -> Result<(), ProjectDomainError> {
        self.ensure_permits(LifecycleAction::AddTask)?;
        if let Some(project_id) = task.project_id() {
            return Err(ProjectDomainError::TaskAlreadyAttached {
                task_id: task.id(),
                project_id,
            });
        }
        if self.tasks.iter().any(|owned| owned.id() == task.id()) {
            return Err(ProjectDomainError::DuplicateTask {
                project_id: self.id,
                task_id: task.id(),
            });
        }

        let auto_start = match (self.status, task.started_at()) {
            (LifecycleStatus::Pending, Some(date)) => Some(date),
            _ => None,
        };
        if let (None, Some(date)) = (auto_start, task.started_at()) {
            self.ensure_task_not_before_start(task.id(), LifecycleAction::AddTask, date)?;
        }

        if let Some(date) = auto_start {
            self.mark_started(date);
        }
        task.attach_to(self.id);
        self.tasks.push(task);
        Ok(())
    }

    /// Starts an owned task.
    ///
    /// A pending project starts together with the task at the same date.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidTransition`] when the project is
    /// terminal or the task is not pending,
    /// [`ProjectDomainError::TaskNotFound`] for unknown tasks,
    /// and [`ProjectDomainError::InvalidTimestamp`] when `date` precedes the
    /// project's start date.
    pub fn start_task(
        &mut self,
        task_id: TaskId,
        date: DateTime<Utc>,
    ) -> Result<(), ProjectDomainError> {
        self.ensure_permits(LifecycleAction::StartTask)?;
        self.task(task_id)?.ensure_permits(LifecycleAction::Start)?;
        self.ensure_task_not_before_start(task_id, LifecycleAction::Start, date)?;

        if self.status == LifecycleStatus::Pending {
            self.mark_started(date);
        }
        self.task_mut(task_id)?.mark_started(date);
        Ok(())
    }

    /// Cancels an owned task.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::TaskNotFound`] for unknown tasks and
    /// [`ProjectDomainError::InvalidTransition`] when the task is already
    /// cancelled or completed.
    pub fn cancel_task(
        &mut self,
        task_id: TaskId,
        date: DateTime<Utc>,
    ) -> Result<(), ProjectDomainError> {
        self.task_mut(task_id)?.cancel(date)
    }

    /// Completes an owned task.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::TaskNotFound`] for unknown tasks and
    /// [`ProjectDomainError::InvalidTransition`] when the task is already
    /// cancelled or completed.
    pub fn complete_task(
        &mut self,
        task_id: TaskId,
        date: DateTime<Utc>,
    ) -> Result<(), ProjectDomainError> {
        self.task_mut(task_id)?.complete(date)
    }

    /// Applies a details change to an owned task.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::TaskNotFound`] for unknown tasks.
    pub fn change_task_details(
        &mut self,
        task_id: TaskId,
        change: DetailsChange,
    ) -> Result<(), ProjectDomainError> {
        self.task_mut(task_id)?.change_details(change);
        Ok(())
    }

    /// Renames the project.
    pub fn change_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replaces the project description.
    pub fn change_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replaces the forecast completion date.
    pub const fn change_forecasted_date(&mut self, date: DateTime<Utc>) {
        self.forecasted_at = Some(date);
    }

    /// Applies every field set in `change`.
    pub fn change_details(&mut self, change: DetailsChange) {
        let (name, description, forecasted_at) = change.into_parts();
        if let Some(value) = name {
            self.change_name(value);
        }
        if let Some(value) = description {
            self.change_description(value);
        }
        if let Some(value) = forecasted_at {
            self.change_forecasted_date(value);
        }
    }

    fn task_mut(&mut self, task_id: TaskId) -> Result<&mut Task, ProjectDomainError> {
        let project_id = self.id;
        self.tasks
            .iter_mut()
            .find(|task| task.id() == task_id)
            .ok_or(ProjectDomainError::TaskNotFound {
                project_id,
                task_id,
            })
    }

    fn ensure_permits(&self, action: LifecycleAction) -> Result<(), ProjectDomainError> {
        if self.status.permits(action) {
            return Ok(());
        }
        Err(ProjectDomainError::InvalidTransition {
            entity: EntityRef::Project(self.id),
            from: self.status,
            action,
        })
    }

    fn ensure_not_before_start(
        &self,
        action: LifecycleAction,
        date: DateTime<Utc>,
    ) -> Result<(), ProjectDomainError> {
        match self.started_at {
            Some(started_at) if date < started_at => Err(ProjectDomainError::InvalidTimestamp {
                entity: EntityRef::Project(self.id),
                action,
                date,
                started_at,
            }),
            _ => Ok(()),
        }
    }

    fn ensure_task_not_before_start(
        &self,
        task_id: TaskId,
        action: LifecycleAction,
        date: DateTime<Utc>,
    ) -> Result<(), ProjectDomainError> {
        match self.started_at {
            Some(started_at) if date < started_at => Err(ProjectDomainError::InvalidTimestamp {
                entity: EntityRef::Task(task_id),
                action,
                date,
                started_at,
            }),
            _ => Ok(()),
        }
    }

    const fn mark_started(&mut self, date: DateTime<Utc>) {
        self.started_at = Some(date);
        self.status = LifecycleStatus::Active;
    }
}
