use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension};
use std::path::Path;

use super::traits::{Storage, StorageRead, StorageTx, StorageWrite};
use crate::types::{Feedback, FeedbackId, FeedbackState, Score};

const DB_SCHEMA_VERSION: i64 = 1;

#[derive(Clone)]
pub struct SqliteStorage {
    pub path: String,
}

pub struct SqliteTx {
    conn: Connection,
}

impl StorageTx for SqliteTx {
    fn commit(self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn map_feedback_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Feedback> {
    let id: i64 = row.get(0)?;
    let raw_score: i64 = row.get(1)?;
    let score = Score::try_from(raw_score).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(1, Type::Integer, Box::new(err))
    })?;
    let created_at: String = row.get(2)?;
    let deleted_at: Option<String> = row.get(3)?;
    Ok(Feedback {
        id,
        score,
        created_at: parse_timestamp(2, &created_at)?,
        state: FeedbackState::from_deleted_at(
            deleted_at
                .as_deref()
                .map(|raw| parse_timestamp(3, raw))
                .transpose()?,
        ),
    })
}

fn db_load_feedback(conn: &Connection, id: FeedbackId) -> rusqlite::Result<Option<Feedback>> {
    conn.query_row(
        "SELECT id, score, created_at, deleted_at FROM feedback
         WHERE id = ?1 AND deleted_at IS NULL",
        params![id],
        map_feedback_row,
    )
    .optional()
}

fn db_list_feedbacks(conn: &Connection) -> rusqlite::Result<Vec<Feedback>> {
    let mut stmt = conn.prepare(
        "SELECT id, score, created_at, deleted_at FROM feedback
         WHERE deleted_at IS NULL ORDER BY id ASC",
    )?;
    let mapped = stmt
        .query_map([], map_feedback_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_insert_feedback(conn: &Connection, score: Score) -> rusqlite::Result<Feedback> {
    conn.query_row(
        "INSERT INTO feedback (score) VALUES (?1)
         RETURNING id, score, created_at, deleted_at",
        params![i64::from(score)],
        map_feedback_row,
    )
}

fn db_save_feedback_score(
    conn: &Connection,
    id: FeedbackId,
    score: Score,
) -> rusqlite::Result<Option<Feedback>> {
    conn.query_row(
        "UPDATE feedback SET score = ?2
         WHERE id = ?1 AND deleted_at IS NULL
         RETURNING id, score, created_at, deleted_at",
        params![id, i64::from(score)],
        map_feedback_row,
    )
    .optional()
}

fn db_mark_feedback_deleted(conn: &Connection, id: FeedbackId) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE feedback SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
         WHERE id = ?1 AND deleted_at IS NULL",
        params![id],
    )
}

impl StorageRead for SqliteTx {
    fn load_feedback(&self, id: FeedbackId) -> Result<Option<Feedback>> {
        Ok(db_load_feedback(&self.conn, id)?)
    }

    fn list_feedbacks(&self) -> Result<Vec<Feedback>> {
        Ok(db_list_feedbacks(&self.conn)?)
    }
}

impl StorageWrite for SqliteTx {
    fn insert_feedback(&self, score: Score) -> Result<Feedback> {
        Ok(db_insert_feedback(&self.conn, score)?)
    }

    fn save_feedback_score(&self, id: FeedbackId, score: Score) -> Result<Option<Feedback>> {
        Ok(db_save_feedback_score(&self.conn, id, score)?)
    }

    fn mark_feedback_deleted(&self, id: FeedbackId) -> Result<usize> {
        Ok(db_mark_feedback_deleted(&self.conn, id)?)
    }
}

impl Storage for SqliteStorage {
    type Tx = SqliteTx;

    fn begin_tx(&self) -> Result<Self::Tx> {
        let conn = self.open()?;
        Self::migrate(&conn)?;
        conn.execute("BEGIN IMMEDIATE", [])?;

        Ok(SqliteTx { conn })
    }
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    pub fn reset_all(&self) -> Result<()> {
        for suffix in ["", "-wal", "-shm"] {
            let path = format!("{}{}", self.path, suffix);
            if Path::new(&path).exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    pub fn init(&self) -> Result<()> {
        self.with_conn(|_conn| Ok(()))?;
        Ok(())
    }

    fn open(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;
        Ok(conn)
    }

    fn with_conn<F, T>(&self, f: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.open()?;
        Self::migrate(&conn)?;
        f(&conn)
    }

    fn migrate(conn: &Connection) -> rusqlite::Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        if version == 0 {
            log::info!(
                "SQLite schema migration: {} -> {}",
                version,
                DB_SCHEMA_VERSION
            );
            conn.execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS feedback (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                score INTEGER NOT NULL,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                deleted_at TEXT
            );
            CREATE INDEX IF NOT EXISTS feedback_active_idx
                ON feedback(id)
                WHERE deleted_at IS NULL;
            "#,
            )?;
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::ErrorCode::SchemaChanged as i32),
            Some("database schema version mismatch; please run with --reset option".to_string()),
        ))
    }
}

impl StorageRead for SqliteStorage {
    fn load_feedback(&self, id: FeedbackId) -> Result<Option<Feedback>> {
        let row = self.with_conn(|conn| db_load_feedback(conn, id))?;
        Ok(row)
    }

    fn list_feedbacks(&self) -> Result<Vec<Feedback>> {
        let rows = self.with_conn(db_list_feedbacks)?;
        Ok(rows)
    }
}
