//! SQLite-backed [`Store`] implementation.
//!
//! Maps each [`Store`] operation onto the `words`, `captions`,
//! `words_to_captions`, and `files_seen` tables created by
//! [`migrate::apply_schema`](crate::migrate::apply_schema).

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tokio::sync::Mutex;

use subseek_core::error::{Error, Result};
use subseek_core::models::{Caption, IndexCounts, NewCaption, TokenizedCaption};
use subseek_core::store::{FileIndexOutcome, Store};
use subseek_core::timestamp::{format_ms, parse_ms};

/// SQLite implementation of the [`Store`] trait.
///
/// Wraps a [`SqlitePool`]. Each [`index_file`](Store::index_file) runs in
/// one transaction, and index writes are serialized through an async mutex
/// so two ingestion runs never race on the same word or file name.
pub struct SqliteStore {
    pool: SqlitePool,
    write_lock: Mutex<()>,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn insert_caption_on(conn: &mut SqliteConnection, caption: &NewCaption) -> sqlx::Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO captions (season_num, episode_num, "start", "end", content)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(caption.season)
    .bind(caption.episode)
    .bind(format_ms(caption.start_ms))
    .bind(format_ms(caption.end_ms))
    .bind(&caption.text)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

async fn ensure_word_on(conn: &mut SqliteConnection, word: &str) -> sqlx::Result<i64> {
    sqlx::query("INSERT INTO words (word) VALUES (?) ON CONFLICT(word) DO NOTHING")
        .bind(word)
        .execute(&mut *conn)
        .await?;

    sqlx::query_scalar("SELECT word_id FROM words WHERE word = ?")
        .bind(word)
        .fetch_one(&mut *conn)
        .await
}

async fn link_on(conn: &mut SqliteConnection, word_id: i64, caption_id: i64) -> sqlx::Result<()> {
    sqlx::query("INSERT OR IGNORE INTO words_to_captions (word_id, caption_id) VALUES (?, ?)")
        .bind(word_id)
        .bind(caption_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn is_file_ingested_on(conn: &mut SqliteConnection, file_name: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM files_seen WHERE file_name = ?)")
        .bind(file_name)
        .fetch_one(&mut *conn)
        .await
}

async fn mark_file_ingested_on(conn: &mut SqliteConnection, file_name: &str) -> Result<()> {
    let inserted = sqlx::query("INSERT INTO files_seen (file_name) VALUES (?)")
        .bind(file_name)
        .execute(&mut *conn)
        .await;

    match inserted {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(Error::DuplicateFile(file_name.to_string()))
        }
        Err(e) => Err(Error::storage(e)),
    }
}

fn row_to_caption(row: &SqliteRow) -> Result<Caption> {
    let start: String = row.try_get("start").map_err(Error::storage)?;
    let end: String = row.try_get("end").map_err(Error::storage)?;

    Ok(Caption {
        id: row.try_get("caption_id").map_err(Error::storage)?,
        season: row.try_get("season_num").map_err(Error::storage)?,
        episode: row.try_get("episode_num").map_err(Error::storage)?,
        start_ms: parse_ms(&start).map_err(Error::storage)?,
        end_ms: parse_ms(&end).map_err(Error::storage)?,
        text: row.try_get("content").map_err(Error::storage)?,
    })
}

async fn count(pool: &SqlitePool, sql: &str) -> Result<i64> {
    sqlx::query_scalar(sql)
        .fetch_one(pool)
        .await
        .map_err(Error::storage)
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_caption(&self, caption: &NewCaption) -> Result<i64> {
        let mut conn = self.pool.acquire().await.map_err(Error::storage)?;
        insert_caption_on(&mut conn, caption)
            .await
            .map_err(Error::storage)
    }

    async fn ensure_word(&self, word: &str) -> Result<i64> {
        let _guard = self.write_lock.lock().await;
        let mut conn = self.pool.acquire().await.map_err(Error::storage)?;
        ensure_word_on(&mut conn, word).await.map_err(Error::storage)
    }

    async fn link_word_to_caption(&self, word_id: i64, caption_id: i64) -> Result<()> {
        let mut conn = self.pool.acquire().await.map_err(Error::storage)?;
        link_on(&mut conn, word_id, caption_id)
            .await
            .map_err(Error::storage)
    }

    async fn is_file_ingested(&self, file_name: &str) -> Result<bool> {
        let mut conn = self.pool.acquire().await.map_err(Error::storage)?;
        is_file_ingested_on(&mut conn, file_name)
            .await
            .map_err(Error::storage)
    }

    async fn mark_file_ingested(&self, file_name: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut conn = self.pool.acquire().await.map_err(Error::storage)?;
        mark_file_ingested_on(&mut conn, file_name).await
    }

    async fn index_file(
        &self,
        file_name: &str,
        captions: &[TokenizedCaption],
    ) -> Result<FileIndexOutcome> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await.map_err(Error::storage)?;

        if is_file_ingested_on(&mut tx, file_name)
            .await
            .map_err(Error::storage)?
        {
            return Ok(FileIndexOutcome::AlreadyIngested);
        }

        for tokenized in captions {
            let caption_id = insert_caption_on(&mut tx, &tokenized.caption)
                .await
                .map_err(Error::storage)?;
            for word in &tokenized.words {
                let word_id = ensure_word_on(&mut tx, word)
                    .await
                    .map_err(Error::storage)?;
                link_on(&mut tx, word_id, caption_id)
                    .await
                    .map_err(Error::storage)?;
            }
        }
        mark_file_ingested_on(&mut tx, file_name).await?;

        tx.commit().await.map_err(Error::storage)?;
        Ok(FileIndexOutcome::Indexed {
            captions: captions.len(),
        })
    }

    async fn word_id(&self, word: &str) -> Result<Option<i64>> {
        sqlx::query_scalar("SELECT word_id FROM words WHERE word = ?")
            .bind(word)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::storage)
    }

    async fn captions_for_word(&self, word_id: i64, limit: usize) -> Result<Vec<Caption>> {
        let rows = sqlx::query(
            r#"
            SELECT c.caption_id, c.season_num, c.episode_num, c."start", c."end", c.content
            FROM words_to_captions wc
            JOIN captions c ON c.caption_id = wc.caption_id
            WHERE wc.word_id = ?
            ORDER BY c.caption_id ASC
            LIMIT ?
            "#,
        )
        .bind(word_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::storage)?;

        rows.iter().map(row_to_caption).collect()
    }

    async fn get_caption(&self, id: i64) -> Result<Option<Caption>> {
        let row = sqlx::query(
            r#"
            SELECT caption_id, season_num, episode_num, "start", "end", content
            FROM captions
            WHERE caption_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::storage)?;

        row.as_ref().map(row_to_caption).transpose()
    }

    async fn counts(&self) -> Result<IndexCounts> {
        Ok(IndexCounts {
            words: count(&self.pool, "SELECT COUNT(*) FROM words").await?,
            captions: count(&self.pool, "SELECT COUNT(*) FROM captions").await?,
            links: count(&self.pool, "SELECT COUNT(*) FROM words_to_captions").await?,
            files: count(&self.pool, "SELECT COUNT(*) FROM files_seen").await?,
        })
    }
}
