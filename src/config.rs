//! Settings for the `PostgreSQL` project repository.
//!
//! Settings are read from the environment:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `PROJECT_LIFECYCLE_DATABASE_URL` | connection URL | required |
//! | `PROJECT_LIFECYCLE_POOL_SIZE` | maximum pooled connections | `10` |
//! | `PROJECT_LIFECYCLE_CONNECT_TIMEOUT_SECS` | pool checkout timeout | `30` |

use crate::project::adapters::postgres::ProjectPgPool;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Environment variable holding the database URL.
pub const DATABASE_URL_VAR: &str = "PROJECT_LIFECYCLE_DATABASE_URL";
/// Environment variable holding the maximum pool size.
pub const POOL_SIZE_VAR: &str = "PROJECT_LIFECYCLE_POOL_SIZE";
/// Environment variable holding the connection timeout in seconds.
pub const CONNECT_TIMEOUT_VAR: &str = "PROJECT_LIFECYCLE_CONNECT_TIMEOUT_SECS";

const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while loading settings or building the pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A variable could not be parsed.
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
}

/// Connection settings for [`crate::project::adapters::postgres::PostgresProjectRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresSettings {
    database_url: String,
    max_pool_size: u32,
    connection_timeout: Duration,
}

impl PostgresSettings {
    /// Creates settings for `database_url` with default pool limits.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_pool_size: DEFAULT_POOL_SIZE,
            connection_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub const fn with_max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = size;
        self
    }

    /// Sets the pool checkout timeout.
    #[must_use]
    pub const fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the database URL is unset and
    /// [`ConfigError::Invalid`] when a numeric setting does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the database URL is unset and
    /// [`ConfigError::Invalid`] when a numeric setting does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup(DATABASE_URL_VAR)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL_VAR))?;

        let mut settings = Self::new(database_url);
        if let Some(raw) = lookup(POOL_SIZE_VAR) {
            settings.max_pool_size = parse_positive(POOL_SIZE_VAR, &raw)?;
        }
        if let Some(raw) = lookup(CONNECT_TIMEOUT_VAR) {
            let secs = parse_positive(CONNECT_TIMEOUT_VAR, &raw)?;
            settings.connection_timeout = Duration::from_secs(u64::from(secs));
        }
        Ok(settings)
    }

    /// Returns the database URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn max_pool_size(&self) -> u32 {
        self.max_pool_size
    }

    /// Returns the pool checkout timeout.
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    /// Builds a connection pool for these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when the pool cannot establish its
    /// initial connections.
    pub fn build_pool(&self) -> Result<ProjectPgPool, ConfigError> {
        info!(
            max_pool_size = self.max_pool_size,
            connection_timeout_secs = self.connection_timeout.as_secs(),
            "building PostgreSQL connection pool"
        );
        let manager = ConnectionManager::<PgConnection>::new(self.database_url.as_str());
        Ok(Pool::builder()
            .max_size(self.max_pool_size)
            .connection_timeout(self.connection_timeout)
            .build(manager)?)
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key,
        value: raw.to_owned(),
        reason,
    };
    let value = raw
        .trim()
        .parse::<u32>()
        .map_err(|err| invalid(err.to_string()))?;
    if value == 0 {
        return Err(invalid("must be greater than zero".to_owned()));
    }
    Ok(value)
}
