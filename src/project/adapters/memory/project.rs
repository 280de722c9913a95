//! In-memory repository for project lifecycle tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};

/// Thread-safe in-memory project repository.
///
/// Projects are listed in the order they were first saved.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<InMemoryProjectState>>,
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    projects: HashMap<ProjectId, Project>,
    order: Vec<ProjectId>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Reports a poisoned lock as a persistence failure.
fn lock_error(err: &impl fmt::Display) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Project> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        state
            .projects
            .get(&id)
            .cloned()
            .ok_or(ProjectRepositoryError::NotFound(id))
    }

    async fn find_all(&self) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.projects.get(id).cloned())
            .collect())
    }

    async fn save(&self, project: &Project) -> ProjectRepositoryResult<Project> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        if state
            .projects
            .insert(project.id(), project.clone())
            .is_none()
        {
            state.order.push(project.id());
        }
        Ok(project.clone())
    }
}
