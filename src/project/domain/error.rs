//! Error types for project and task lifecycle rules.

use super::{EntityRef, LifecycleAction, LifecycleStatus, ProjectId, TaskId};
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Category of a lifecycle failure, independent of the layer that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleErrorKind {
    /// The current status does not permit the operation.
    InvalidTransition,
    /// A supplied date is out of order with an existing timestamp.
    InvalidTimestamp,
    /// The operation would break a cross-entity rule of the aggregate.
    InvariantViolation,
    /// The addressed project or task does not exist.
    NotFound,
}

impl fmt::Display for LifecycleErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidTransition => "invalid transition",
            Self::InvalidTimestamp => "invalid timestamp",
            Self::InvariantViolation => "invariant violation",
            Self::NotFound => "not found",
        };
        f.write_str(label)
    }
}

/// Errors raised by project and task lifecycle operations.
///
/// Every operation checks all of its preconditions before mutating, so an
/// error always leaves the entity exactly as it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The entity's status does not permit the requested action.
    #[error("cannot {action} {entity} while it is {from}")]
    InvalidTransition {
        /// Entity the action was attempted on.
        entity: EntityRef,
        /// Status at the time of the attempt.
        from: LifecycleStatus,
        /// Rejected action.
        action: LifecycleAction,
    },

    /// The supplied date precedes the relevant start date.
    #[error("cannot {action} {entity} at {date}, before the start date {started_at}")]
    InvalidTimestamp {
        /// Entity the action was attempted on.
        entity: EntityRef,
        /// Rejected action.
        action: LifecycleAction,
        /// Supplied date.
        date: DateTime<Utc>,
        /// Start date the supplied date must not precede.
        started_at: DateTime<Utc>,
    },

    /// The project still owns pending or active tasks.
    #[error("cannot complete project {project_id} with {} pending or active task(s)", task_ids.len())]
    UnresolvedTasks {
        /// Project that was being completed.
        project_id: ProjectId,
        /// Tasks still pending or active, in project order.
        task_ids: Vec<TaskId>,
    },

    /// The task already belongs to a project.
    #[error("task {task_id} is already attached to project {project_id}")]
    TaskAlreadyAttached {
        /// Task being attached.
        task_id: TaskId,
        /// Project the task already belongs to.
        project_id: ProjectId,
    },

    /// The project already owns a task with this identifier.
    #[error("project {project_id} already owns task {task_id}")]
    DuplicateTask {
        /// Owning project.
        project_id: ProjectId,
        /// Duplicated task identifier.
        task_id: TaskId,
    },

    /// The project owns no task with this identifier.
    #[error("task {task_id} not found in project {project_id}")]
    TaskNotFound {
        /// Project that was searched.
        project_id: ProjectId,
        /// Missing task identifier.
        task_id: TaskId,
    },
}

impl ProjectDomainError {
    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> LifecycleErrorKind {
        match self {
            Self::InvalidTransition { .. } => LifecycleErrorKind::InvalidTransition,
            Self::InvalidTimestamp { .. } => LifecycleErrorKind::InvalidTimestamp,
            Self::UnresolvedTasks { .. }
            | Self::TaskAlreadyAttached { .. }
            | Self::DuplicateTask { .. } => LifecycleErrorKind::InvariantViolation,
            Self::TaskNotFound { .. } => LifecycleErrorKind::NotFound,
        }
    }
}

/// Error returned while parsing lifecycle statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown lifecycle status: {0}")]
pub struct ParseLifecycleStatusError(pub String);
