//! Diesel row models for project persistence.

use super::schema::{projects, tasks};
use crate::project::{
    domain::{
        LifecycleStatus, PersistedProjectData, PersistedTaskData, Project, ProjectId, Task, TaskId,
    },
    ports::{ProjectRepositoryError, ProjectRepositoryResult},
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for project records, used for reads and upserts.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Project name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Cancellation timestamp.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub finished_at: Option<DateTime<Utc>>,
    /// Forecast completion date.
    pub forecasted_at: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: String,
}

/// Row model for task records, used for reads and upserts.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Zero-based position within the project.
    pub position: i32,
    /// Task name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Cancellation timestamp.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub finished_at: Option<DateTime<Utc>>,
    /// Forecast completion date.
    pub forecasted_at: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: String,
}

impl ProjectRow {
    /// Builds the project row for an aggregate.
    pub fn from_domain(project: &Project) -> Self {
        Self {
            id: project.id().into_inner(),
            name: project.name().to_owned(),
            description: project.description().to_owned(),
            started_at: project.started_at(),
            cancelled_at: project.cancelled_at(),
            finished_at: project.finished_at(),
            forecasted_at: project.forecasted_at(),
            status: project.status().as_str().to_owned(),
        }
    }

    /// Rebuilds the aggregate from its row and its task rows.
    ///
    /// Task rows are attached in the order given.
    pub fn into_domain(self, task_rows: Vec<TaskRow>) -> ProjectRepositoryResult<Project> {
        let project_id = ProjectId::from_uuid(self.id);
        let tasks = task_rows
            .into_iter()
            .map(|row| row.into_domain(project_id))
            .collect::<ProjectRepositoryResult<Vec<Task>>>()?;

        Ok(Project::from_persisted(PersistedProjectData {
            id: project_id,
            name: self.name,
            description: self.description,
            started_at: self.started_at,
            cancelled_at: self.cancelled_at,
            finished_at: self.finished_at,
            forecasted_at: self.forecasted_at,
            status: parse_status(&self.status)?,
            tasks,
        }))
    }
}

impl TaskRow {
    /// Builds the row for the task at `index` within its project.
    pub fn from_domain(
        project_id: ProjectId,
        index: usize,
        task: &Task,
    ) -> ProjectRepositoryResult<Self> {
        let position = i32::try_from(index).map_err(ProjectRepositoryError::persistence)?;
        Ok(Self {
            id: task.id().into_inner(),
            project_id: project_id.into_inner(),
            position,
            name: task.name().to_owned(),
            description: task.description().to_owned(),
            started_at: task.started_at(),
            cancelled_at: task.cancelled_at(),
            finished_at: task.finished_at(),
            forecasted_at: task.forecasted_at(),
            status: task.status().as_str().to_owned(),
        })
    }

    fn into_domain(self, project_id: ProjectId) -> ProjectRepositoryResult<Task> {
        Ok(Task::from_persisted(PersistedTaskData {
            id: TaskId::from_uuid(self.id),
            project_id,
            name: self.name,
            description: self.description,
            started_at: self.started_at,
            cancelled_at: self.cancelled_at,
            finished_at: self.finished_at,
            forecasted_at: self.forecasted_at,
            status: parse_status(&self.status)?,
        }))
    }
}

fn parse_status(value: &str) -> ProjectRepositoryResult<LifecycleStatus> {
    LifecycleStatus::try_from(value).map_err(ProjectRepositoryError::persistence)
}
