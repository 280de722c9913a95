//! Domain model for project and task lifecycles.
//!
//! Projects and tasks share one four-state lifecycle. The [`Project`]
//! aggregate owns its tasks and is the only way to change them once
//! attached, which keeps the cross-entity rules inside the domain boundary.

mod details;
mod error;
mod ids;
mod project;
mod status;
mod task;

pub use details::DetailsChange;
pub use error::{LifecycleErrorKind, ParseLifecycleStatusError, ProjectDomainError};
pub use ids::{EntityRef, ProjectId, TaskId};
pub use project::{NewProject, PersistedProjectData, Project};
pub use status::{LifecycleAction, LifecycleStatus};
pub use task::{NewTask, PersistedTaskData, Task};
