//! `PostgreSQL` repository implementation for project aggregates.

use super::{
    models::{ProjectRow, TaskRow},
    schema::{projects, tasks},
};
use crate::project::{
    domain::{Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use std::collections::HashMap;
use tracing::debug;

/// `PostgreSQL` connection pool type used by project adapters.
pub type ProjectPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed project repository.
///
/// Projects live in the `projects` table and their tasks in `tasks`, keyed
/// by owning project and ordered by position.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: ProjectPgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ProjectPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Project> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .find(id.into_inner())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?
                .ok_or(ProjectRepositoryError::NotFound(id))?;
            let task_rows = tasks::table
                .filter(tasks::project_id.eq(row.id))
                .order(tasks::position.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            row.into_domain(task_rows)
        })
        .await
    }

    async fn find_all(&self) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(|connection| {
            let rows = projects::table
                .order((projects::name.asc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            let mut tasks_by_project = load_tasks_by_project(connection)?;
            rows.into_iter()
                .map(|row| {
                    let task_rows = tasks_by_project.remove(&row.id).unwrap_or_default();
                    row.into_domain(task_rows)
                })
                .collect()
        })
        .await
    }

    async fn save(&self, project: &Project) -> ProjectRepositoryResult<Project> {
        let project_row = ProjectRow::from_domain(project);
        let task_rows = project
            .tasks()
            .iter()
            .enumerate()
            .map(|(index, task)| TaskRow::from_domain(project.id(), index, task))
            .collect::<ProjectRepositoryResult<Vec<TaskRow>>>()?;
        let saved = project.clone();

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| upsert_aggregate(tx, &project_row, &task_rows))
                .map_err(ProjectRepositoryError::persistence)?;
            debug!(
                project_id = %saved.id(),
                status = %saved.status(),
                task_count = saved.tasks().len(),
                "saved project aggregate"
            );
            Ok(saved)
        })
        .await
    }
}

/// Writes the project row and replaces its task rows inside the caller's
/// transaction.
fn upsert_aggregate(
    connection: &mut PgConnection,
    project_row: &ProjectRow,
    task_rows: &[TaskRow],
) -> Result<(), DieselError> {
    diesel::insert_into(projects::table)
        .values(project_row)
        .on_conflict(projects::id)
        .do_update()
        .set(project_row)
        .execute(connection)?;

    let owned_ids: Vec<uuid::Uuid> = task_rows.iter().map(|row| row.id).collect();
    diesel::delete(
        tasks::table
            .filter(tasks::project_id.eq(project_row.id))
            .filter(tasks::id.ne_all(owned_ids)),
    )
    .execute(connection)?;

    for row in task_rows {
        diesel::insert_into(tasks::table)
            .values(row)
            .on_conflict(tasks::id)
            .do_update()
            .set(row)
            .execute(connection)?;
    }
    Ok(())
}

fn load_tasks_by_project(
    connection: &mut PgConnection,
) -> ProjectRepositoryResult<HashMap<uuid::Uuid, Vec<TaskRow>>> {
    let rows = tasks::table
        .order((tasks::project_id.asc(), tasks::position.asc()))
        .select(TaskRow::as_select())
        .load::<TaskRow>(connection)
        .map_err(ProjectRepositoryError::persistence)?;

    let mut grouped: HashMap<uuid::Uuid, Vec<TaskRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.project_id).or_default().push(row);
    }
    Ok(grouped)
}
