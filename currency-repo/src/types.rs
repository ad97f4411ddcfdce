//! Shared database row type for SQLite and PostgreSQL.
//!
//! `exchanges` is kept as JSON text in both databases, with decimals encoded
//! as strings so no precision is lost on the way through.

use sqlx::FromRow;

use currency_types::{Currency, CurrencyId, Exchanges, RepoError};

/// Currency row from database.
#[derive(FromRow)]
pub struct DbCurrency {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub exchanges: String,
}

impl DbCurrency {
    /// Converts the row into the domain model.
    pub fn into_domain(self) -> Result<Currency, RepoError> {
        let exchanges: Exchanges = if self.exchanges.trim().is_empty() {
            Exchanges::new()
        } else {
            serde_json::from_str(&self.exchanges).map_err(|e| RepoError::Database(e.to_string()))?
        };

        Ok(Currency::from_parts(
            CurrencyId::new(self.id),
            self.name,
            self.code,
            exchanges,
        ))
    }
}

/// Serializes an exchanges map for the `exchanges` column.
pub fn encode_exchanges(exchanges: &Exchanges) -> Result<String, RepoError> {
    serde_json::to_string(exchanges).map_err(|e| RepoError::Database(e.to_string()))
}

/// Maps a sqlx failure, turning unique-index violations into `Conflict`.
pub fn map_write_error(err: sqlx::Error, name: &str) -> RepoError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepoError::Conflict(name.to_string())
        }
        _ => RepoError::Database(err.to_string()),
    }
}
