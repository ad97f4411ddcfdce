//! PostgreSQL store adapter.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use currency_types::{Currency, CurrencyId, CurrencyStore, RepoError};

use crate::DEFAULT_ACQUIRE_TIMEOUT;
use crate::types::{DbCurrency, encode_exchanges, map_write_error};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL store; name uniqueness is enforced by `idx_currencies_name`.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_currencies_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresRepo {
    /// Creates a new PostgreSQL store with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::with_acquire_timeout(database_url, DEFAULT_ACQUIRE_TIMEOUT).await
    }

    /// Creates a store whose connection checkouts give up after `timeout`.
    pub async fn with_acquire_timeout(
        database_url: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(timeout)
            .connect(database_url)
            .await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CurrencyStore for PostgresRepo {
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
            sqlx::query_as(r#"SELECT id, name, code, exchanges FROM currencies WHERE id = $1"#)
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbCurrency::into_domain).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Currency>, RepoError> {
        let row: Option<DbCurrency> =
            sqlx::query_as(r#"SELECT id, name, code, exchanges FROM currencies WHERE name = $1"#)
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
                    r#"INSERT INTO currencies (name, code, exchanges) VALUES ($1, $2, $3) RETURNING id"#,
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
                    r#"UPDATE currencies SET name = $1, code = $2, exchanges = $3 WHERE id = $4"#,
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
        sqlx::query(r#"DELETE FROM currencies WHERE id = $1"#)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}
