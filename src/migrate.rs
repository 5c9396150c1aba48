use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create the index tables if they do not exist yet. Idempotent.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    // Normalized words; AUTOINCREMENT requires the id to be the primary key
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS words (
            word_id INTEGER PRIMARY KEY AUTOINCREMENT,
            word TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS captions (
            caption_id INTEGER PRIMARY KEY AUTOINCREMENT,
            season_num INTEGER NOT NULL,
            episode_num INTEGER NOT NULL,
            "start" TEXT NOT NULL,
            "end" TEXT NOT NULL,
            content TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS words_to_captions (
            word_id INTEGER NOT NULL,
            caption_id INTEGER NOT NULL,
            PRIMARY KEY (word_id, caption_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS files_seen (
            file_id INTEGER PRIMARY KEY AUTOINCREMENT,
            file_name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
