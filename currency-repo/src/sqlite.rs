//! SQLite store adapter.
#![allow(clippy::collapsible_if)]

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use currency_types::{Currency, CurrencyId, CurrencyStore, RepoError};

use crate::DEFAULT_ACQUIRE_TIMEOUT;
use crate::types::{DbCurrency, encode_exchanges, map_write_error};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite store implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite store with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::with_acquire_timeout(database_url, DEFAULT_ACQUIRE_TIMEOUT).await
    }

    /// Creates a store whose connection checkouts give up after `timeout`.
    pub async fn with_acquire_timeout(
        database_url: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(timeout);
        if database_url.contains(":memory:") {
            // Each connection would otherwise open its own empty database
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema (idempotent).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_currencies.sql");
        sqlx::query(ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CurrencyStore for SqliteRepo {
    async fn find_all(&self) -> Result<Vec<Currency>, RepoError> {
        let rows: Vec<DbCurrency> =
            sqlx::query_as(r#"SELECT id, name, code, exchanges FROM currencies ORDER BY id"#)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbCurrency::into_domain).collect()
    }

    async fn find_by_id(&self, id: CurrencyId) -> Result<Option<Currency>, RepoError> {
        let row: Option<DbCurrency> =
            sqlx::query_as(r#"SELECT id, name, code, exchanges FROM currencies WHERE id = ?"#)
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbCurrency::into_domain).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Currency>, RepoError> {
        let row: Option<DbCurrency> =
            sqlx::query_as(r#"SELECT id, name, code, exchanges FROM currencies WHERE name = ?"#)
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbCurrency::into_domain).transpose()
    }

    async fn save(&self, currency: Currency) -> Result<Currency, RepoError> {
        let exchanges = encode_exchanges(currency.exchanges())?;

        match currency.id() {
            None => {
                let id: i64 = sqlx::query_scalar(
                    r#"INSERT INTO currencies (name, code, exchanges) VALUES (?, ?, ?) RETURNING id"#,
                )
                .bind(currency.name())
                .bind(currency.code())
                .bind(&exchanges)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_write_error(e, currency.name()))?;

                Ok(currency.with_id(CurrencyId::new(id)))
            }
            Some(id) => {
                let result = sqlx::query(
                    r#"UPDATE currencies SET name = ?, code = ?, exchanges = ? WHERE id = ?"#,
                )
                .bind(currency.name())
                .bind(currency.code())
                .bind(&exchanges)
                .bind(id.get())
                .execute(&self.pool)
                .await
                .map_err(|e| map_write_error(e, currency.name()))?;

                if result.rows_affected() == 0 {
                    return Err(RepoError::NotFound);
                }
                Ok(currency)
            }
        }
    }

    async fn delete_by_id(&self, id: CurrencyId) -> Result<(), RepoError> {
        sqlx::query(r#"DELETE FROM currencies WHERE id = ?"#)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}
