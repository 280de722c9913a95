//! Repository port for project aggregate persistence.

use crate::project::domain::{Project, ProjectId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project aggregate persistence contract.
///
/// Implementations store a project and its owned tasks as one unit: a
/// project is never visible with only part of its tasks saved.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Loads a project together with its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when no project has the
    /// given identifier.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Project>;

    /// Loads every stored project together with its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::Persistence`] when the store cannot
    /// be read.
    async fn find_all(&self) -> ProjectRepositoryResult<Vec<Project>>;

    /// Inserts or replaces a project and its task collection atomically.
    ///
    /// Returns the aggregate as persisted.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::Persistence`] when the store rejects
    /// the write.
    async fn save(&self, project: &Project) -> ProjectRepositoryResult<Project>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
