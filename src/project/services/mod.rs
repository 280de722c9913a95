//! Application services for project lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    AddTaskRequest, CreateProjectRequest, ProjectLifecycleError, ProjectLifecycleResult,
    ProjectLifecycleService,
};
