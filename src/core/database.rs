use std::sync::atomic::{AtomicU64, Ordering};

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{MySql, Transaction};

use crate::config::Settings;
use crate::utils::{ScaffoldError, ScaffoldResult};

/// Thin database accessor over a MySQL connection pool
///
/// Driver errors are caught at this layer, logged, and returned as typed
/// errors; nothing propagates implicitly. The connection is opened eagerly
/// and a failure to connect is fatal at construction.
pub struct Database {
    pool: MySqlPool,
    last_insert_id: AtomicU64,
}

impl Database {
    /// Open a connection pool from the `database.default` settings
    ///
    /// The original driver error is logged; callers see a generic message.
    pub async fn connect(settings: &Settings) -> ScaffoldResult<Self> {
        let db = &settings.database.default;

        let options = MySqlConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .database(&db.database)
            .username(&db.username)
            .password(&db.password)
            .charset(&db.charset);

        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database connection failed");
                ScaffoldError::Internal("Database connection failed".to_string())
            })?;

        Ok(Self {
            pool,
            last_insert_id: AtomicU64::new(0),
        })
    }

    /// Execute a parameterized query and return all matching rows
    pub async fn query(&self, sql: &str, params: &[&str]) -> ScaffoldResult<Vec<MySqlRow>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(*param);
        }

        query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!(error = %e, sql, "Query failed");
            ScaffoldError::Database(e)
        })
    }

    /// Execute a parameterized query and return a single row, if any
    pub async fn query_one(&self, sql: &str, params: &[&str]) -> ScaffoldResult<Option<MySqlRow>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(*param);
        }

        query.fetch_optional(&self.pool).await.map_err(|e| {
            tracing::error!(error = %e, sql, "Query failed");
            ScaffoldError::Database(e)
        })
    }

    /// Execute an insert/update/delete and return the affected row count
    pub async fn execute(&self, sql: &str, params: &[&str]) -> ScaffoldResult<u64> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(*param);
        }

        let result = query.execute(&self.pool).await.map_err(|e| {
            tracing::error!(error = %e, sql, "Execute failed");
            ScaffoldError::Database(e)
        })?;

        self.last_insert_id
            .store(result.last_insert_id(), Ordering::Relaxed);

        Ok(result.rows_affected())
    }

    /// Get the auto-increment id produced by the most recent `execute`
    pub fn last_insert_id(&self) -> u64 {
        self.last_insert_id.load(Ordering::Relaxed)
    }

    /// Begin a transaction
    ///
    /// `commit` and `rollback` on the returned transaction are direct
    /// pass-throughs to the driver.
    pub async fn begin(&self) -> ScaffoldResult<Transaction<'static, MySql>> {
        self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to begin transaction");
            ScaffoldError::Database(e)
        })
    }

    /// Check whether a table exists in the current schema
    pub async fn table_exists(&self, name: &str) -> ScaffoldResult<bool> {
        let row = self.query_one("SHOW TABLES LIKE ?", &[name]).await?;
        Ok(row.is_some())
    }
}
