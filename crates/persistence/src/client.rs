//! MySQL connection pool wrapper

use crate::error::StoreError;
use rail_assist_config::DatabaseConfig;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

/// MySQL client wrapper shared by all stores
#[derive(Clone)]
pub struct Db {
    pool: MySqlPool,
    lock_wait_timeout: Duration,
}

impl Db {
    /// Connect to the railway database.
    ///
    /// Credentials come from the explicitly passed [`DatabaseConfig`];
    /// nothing is read from ambient globals.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connecting to MySQL"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            pool,
            lock_wait_timeout: Duration::from_secs(config.lock_wait_timeout_secs),
        })
    }

    /// Wrap an existing pool (tests, schema tooling)
    pub fn from_pool(pool: MySqlPool, lock_wait_timeout: Duration) -> Self {
        Self {
            pool,
            lock_wait_timeout,
        }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Row-lock wait timeout applied inside locking transactions
    pub fn lock_wait_timeout(&self) -> Duration {
        self.lock_wait_timeout
    }
}
