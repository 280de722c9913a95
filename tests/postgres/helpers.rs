//! Shared test helpers for `PostgreSQL` integration tests.

#![expect(
    clippy::print_stderr,
    reason = "Test cleanup warnings are informational"
)]

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use pg_embedded_setup_unpriv::TestCluster;
use project_lifecycle::{
    config::PostgresSettings,
    project::adapters::postgres::{PostgresProjectRepository, ProjectPgPool},
};
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Boxed error type used by `PostgreSQL` test helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SQL creating the project and task tables.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_projects_and_tasks/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "project_lifecycle_test_template";

/// Creates a runtime for driving the async repository from sync tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or the schema script fails.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_SCHEMA_SQL)
                .map_err(|e| eyre::eyre!("schema script failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Repository, pool and scratch database for a single test.
///
/// The database is dropped after the pool releases its connections.
pub struct PostgresContext {
    /// Repository under test.
    pub repository: PostgresProjectRepository,
    /// Pool shared with the repository, for direct SQL checks.
    pub pool: ProjectPgPool,
    _guard: CleanupGuard,
}

/// Creates a database from the template and connects a repository to it.
///
/// # Errors
///
/// Returns an error if the template, the database or the pool cannot be
/// created.
pub fn setup_context(
    cluster: &'static TestCluster,
    prefix: &str,
) -> Result<PostgresContext, BoxError> {
    ensure_template(cluster)?;
    let db_name = format!("{prefix}_{}", Uuid::new_v4().simple());
    let guard = CleanupGuard::new(cluster, db_name.clone());
    cluster
        .create_database_from_template(db_name.as_str(), TEMPLATE_DB)
        .map_err(|e| Box::new(e) as BoxError)?;
    let pool = PostgresSettings::new(cluster.connection().database_url(&db_name))
        .with_max_pool_size(1)
        .build_pool()?;
    Ok(PostgresContext {
        repository: PostgresProjectRepository::new(pool.clone()),
        pool,
        _guard: guard,
    })
}

/// Drops a test database even if the test panics.
struct CleanupGuard {
    cluster: &'static TestCluster,
    db_name: String,
}

impl CleanupGuard {
    const fn new(cluster: &'static TestCluster, db_name: String) -> Self {
        Self { cluster, db_name }
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(self.db_name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.db_name);
        }
    }
}
