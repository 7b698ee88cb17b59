//! SQLite pool and schema setup

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::config::Config;

const SCHEMA: [&str; 3] = [
    r#"CREATE TABLE IF NOT EXISTS users (
        id BLOB PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    );"#,
    r#"CREATE TABLE IF NOT EXISTS todos (
        id BLOB PRIMARY KEY NOT NULL,
        user_id BLOB NOT NULL REFERENCES users (id),
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        completed BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );"#,
    r#"CREATE INDEX IF NOT EXISTS idx_todos_user_created
        ON todos (user_id, created_at DESC);"#,
];

/// Connect to the configured database, creating the file if it doesn't exist
pub async fn connect(config: &Config) -> Result<Pool<Sqlite>, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if config.is_memory_database() {
        // Every connection to `:memory:` opens its own database, so keep exactly one alive.
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_with(options)
            .await?
    };

    tracing::info!(url = %config.database_url, "Connected to the database");

    Ok(pool)
}

/// Create the users and todos tables if they don't exist
pub async fn init_schema(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database schema ready");

    Ok(())
}

/// Check database connectivity (for health checks)
pub async fn check_health(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
