//! SQLite implementation of the `ftb-core` store port.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use ftb_core::{
    domain::{FileOpMode, FileRecord, FileToken, UserId},
    errors::Error,
    store::BotStore,
    Result,
};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS user_languages (
        user_id INTEGER PRIMARY KEY,
        language TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS file_modes (
        user_id INTEGER PRIMARY KEY,
        mode INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS files (
        file_id TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_files_user_id ON files(user_id)",
];

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

fn store_err(e: sqlx::Error) -> Error {
    Error::StoreUnavailable(format!("sqlite error: {e}"))
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(store_err)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(store_err)?;

        let store = Self { pool };
        store.init().await?;
        info!(url, "sqlite store ready");
        Ok(store)
    }

    async fn init(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(store_err)?;
        }
        Ok(())
    }
}

#[async_trait]
impl BotStore for SqliteStore {
    async fn user_language(&self, user: UserId) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT language FROM user_languages WHERE user_id = ?")
            .bind(user.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)
    }

    async fn set_user_language(&self, user: UserId, code: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_languages (user_id, language) VALUES (?, ?)
            ON CONFLICT(user_id) DO UPDATE SET language = excluded.language
            "#,
        )
        .bind(user.0)
        .bind(code)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn user_mode(&self, user: UserId) -> Result<FileOpMode> {
        let code = sqlx::query_scalar::<_, i64>("SELECT mode FROM file_modes WHERE user_id = ?")
            .bind(user.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(FileOpMode::from_code(code))
    }

    async fn set_user_mode(&self, user: UserId, mode: FileOpMode) -> Result<()> {
        let Some(code) = mode.to_code() else {
            return self.clear_user_mode(user).await;
        };

        sqlx::query(
            r#"
            INSERT INTO file_modes (user_id, mode) VALUES (?, ?)
            ON CONFLICT(user_id) DO UPDATE SET mode = excluded.mode
            "#,
        )
        .bind(user.0)
        .bind(code)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn clear_user_mode(&self, user: UserId) -> Result<()> {
        sqlx::query("DELETE FROM file_modes WHERE user_id = ?")
            .bind(user.0)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn register_file(&self, file: &FileRecord) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO files (file_id, user_id, name) VALUES (?, ?, ?)")
            .bind(file.token.as_str())
            .bind(file.owner.0)
            .bind(file.name.as_str())
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn file_exists(&self, token: &FileToken) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM files WHERE file_id = ?")
            .bind(token.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(count > 0)
    }

    async fn delete_file(&self, token: &FileToken, owner: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE file_id = ? AND user_id = ?")
            .bind(token.as_str())
            .bind(owner.0)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn files_by_user(&self, user: UserId) -> Result<Vec<FileRecord>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT file_id, name FROM files WHERE user_id = ? ORDER BY rowid",
        )
        .bind(user.0)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows
            .into_iter()
            .map(|(token, name)| FileRecord {
                token: FileToken(token),
                owner: user,
                name,
            })
            .collect())
    }
}
