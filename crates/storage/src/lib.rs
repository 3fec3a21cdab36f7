use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{fs, path::Path, str::FromStr};

use shared::domain::CredentialId;

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

/// A credential row as stored. `password_hash` is the bcrypt hash, never a
/// plaintext password.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub credential_id: CredentialId,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Inserts a credential row. A duplicate email surfaces as the driver's
    /// unique-violation error so callers can map it to a conflict.
    pub async fn insert_credential(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<StoredCredential> {
        let row = sqlx::query(
            "INSERT INTO credentials (email, password) VALUES (?, ?)
             RETURNING id, email, password, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        credential_from_row(&row)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<StoredCredential>> {
        let row = sqlx::query(
            "SELECT id, email, password, created_at FROM credentials WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| credential_from_row(&row)).transpose()
    }
}

fn credential_from_row(row: &SqliteRow) -> Result<StoredCredential> {
    let created_at: NaiveDateTime = row.try_get("created_at")?;
    Ok(StoredCredential {
        credential_id: CredentialId(row.try_get::<i64, _>("id")?),
        email: row.try_get("email")?,
        password_hash: row.try_get("password")?,
        created_at: created_at.and_utc(),
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return Ok(());
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();
    if path.is_empty() {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!(
                    "failed to create parent directory '{}' for database url '{database_url}'",
                    parent.display()
                )
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
