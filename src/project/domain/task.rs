//! Task entity owned by a project.

use super::{
    DetailsChange, EntityRef, LifecycleAction, LifecycleStatus, ProjectDomainError, ProjectId,
    TaskId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    name: String,
    description: String,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    forecasted_at: Option<DateTime<Utc>>,
}

impl NewTask {
    /// Creates a parameter object with the required descriptive fields.
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

    /// Starts the task at `date` on creation.
    #[must_use]
    pub const fn with_started_at(mut self, date: DateTime<Utc>) -> Self {
        self.started_at = Some(date);
        self
    }

    /// Completes the task at `date` on creation.
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

/// Unit of work with its own lifecycle, owned by exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: Option<ProjectId>,
    name: String,
    description: String,
    started_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    forecasted_at: Option<DateTime<Utc>>,
    status: LifecycleStatus,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
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
}

impl Task {
    /// Creates a pending task.
    ///
    /// A supplied start date starts the task, and a supplied finish date
    /// then completes it, so both timestamps are only ever written by their
    /// transition.
    #[must_use]
    pub fn create(new_task: NewTask) -> Self {
        let NewTask {
            name,
            description,
            started_at,
            finished_at,
            forecasted_at,
        } = new_task;

        let mut task = Self {
            id: TaskId::new(),
            project_id: None,
            name,
            description,
            started_at: None,
            cancelled_at: None,
            finished_at: None,
            forecasted_at,
            status: LifecycleStatus::Pending,
        };
        if let Some(date) = started_at {
            task.mark_started(date);
        }
        if let Some(date) = finished_at {
            task.mark_completed(date);
        }
        task
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: Some(data.project_id),
            name: data.name,
            description: data.description,
            started_at: data.started_at,
            cancelled_at: data.cancelled_at,
            finished_at: data.finished_at,
            forecasted_at: data.forecasted_at,
            status: data.status,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project, once attached.
    #[must_use]
    pub const fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task description.
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

    /// Starts a pending task.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidTransition`] unless the task is
    /// pending.
    pub fn start(&mut self, date: DateTime<Utc>) -> Result<(), ProjectDomainError> {
        self.ensure_permits(LifecycleAction::Start)?;
        self.mark_started(date);
        Ok(())
    }

    /// Cancels a pending or active task.
    ///
    /// The date is not checked against the start date.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidTransition`] when the task is
    /// already cancelled or completed.
    pub fn cancel(&mut self, date: DateTime<Utc>) -> Result<(), ProjectDomainError> {
        self.ensure_permits(LifecycleAction::Cancel)?;
        self.mark_cancelled(date);
        Ok(())
    }

    /// Completes a pending or active task.
    ///
    /// The date is not checked against the start date.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidTransition`] when the task is
    /// already cancelled or completed.
    pub fn complete(&mut self, date: DateTime<Utc>) -> Result<(), ProjectDomainError> {
        self.ensure_permits(LifecycleAction::Complete)?;
        self.mark_completed(date);
        Ok(())
    }

    /// Renames the task.
    pub fn change_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replaces the task description.
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

    /// Checks that `action` is allowed from the current status.
    pub(super) fn ensure_permits(&self, action: LifecycleAction) -> Result<(), ProjectDomainError> {
        if self.status.permits(action) {
            return Ok(());
        }
        Err(ProjectDomainError::InvalidTransition {
            entity: EntityRef::Task(self.id),
            from: self.status,
            action,
        })
    }

    pub(super) const fn attach_to(&mut self, project_id: ProjectId) {
        self.project_id = Some(project_id);
    }

    pub(super) const fn mark_started(&mut self, date: DateTime<Utc>) {
        self.started_at = Some(date);
        self.status = LifecycleStatus::Active;
    }

    pub(super) const fn mark_cancelled(&mut self, date: DateTime<Utc>) {
        self.cancelled_at = Some(date);
        self.status = LifecycleStatus::Cancelled;
    }

    const fn mark_completed(&mut self, date: DateTime<Utc>) {
        self.finished_at = Some(date);
        self.status = LifecycleStatus::Completed;
    }
}
