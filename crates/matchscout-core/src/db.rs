// SQLite persistence layer for match-check history.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

/// One stored match check, as returned by [`Database::recent_lookups`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredLookup {
    pub id: i64,
    pub battle_tag: String,
    pub is_in_game: bool,
    /// The full check result as it was returned to the caller.
    pub payload: serde_json::Value,
    pub checked_at: DateTime<Utc>,
}

/// SQLite-backed lookup history with time-based retention.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS match_checks (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                battle_tag  TEXT NOT NULL,
                is_in_game  INTEGER NOT NULL,
                payload     TEXT NOT NULL,
                checked_at  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_match_checks_checked_at
                ON match_checks(checked_at);
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Store one match check and return its row id.
    ///
    /// Timestamps are stored as fixed-width RFC 3339 UTC strings so that
    /// lexical order matches chronological order.
    pub fn record_lookup(
        &self,
        battle_tag: &str,
        is_in_game: bool,
        payload: &serde_json::Value,
        checked_at: DateTime<Utc>,
    ) -> Result<i64> {
        let conn = self.conn();
        let json_str = serde_json::to_string(payload).context("failed to serialize payload")?;
        conn.execute(
            "INSERT INTO match_checks (battle_tag, is_in_game, payload, checked_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![battle_tag, is_in_game, json_str, format_ts(checked_at)],
        )
        .context("failed to record match check")?;
        Ok(conn.last_insert_rowid())
    }

    /// The `limit` most recent checks, newest first.
    pub fn recent_lookups(&self, limit: usize) -> Result<Vec<StoredLookup>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, battle_tag, is_in_game, payload, checked_at
                 FROM match_checks ORDER BY checked_at DESC, id DESC LIMIT ?1",
            )
            .context("failed to prepare recent_lookups query")?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, bool>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .context("failed to query match checks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map match check rows")?;

        rows.into_iter()
            .map(|(id, battle_tag, is_in_game, payload, checked_at)| {
                let payload = serde_json::from_str(&payload)
                    .with_context(|| format!("corrupt payload in match check {id}"))?;
                let checked_at = DateTime::parse_from_rfc3339(&checked_at)
                    .with_context(|| format!("corrupt timestamp in match check {id}"))?
                    .with_timezone(&Utc);
                Ok(StoredLookup {
                    id,
                    battle_tag,
                    is_in_game,
                    payload,
                    checked_at,
                })
            })
            .collect()
    }

    /// Delete every check recorded strictly before `cutoff`. Returns the
    /// number of rows removed.
    pub fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let conn = self.conn();
        let removed = conn
            .execute(
                "DELETE FROM match_checks WHERE checked_at < ?1",
                params![format_ts(cutoff)],
            )
            .context("failed to purge match checks")?;
        Ok(removed)
    }

    pub fn lookup_count(&self) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM match_checks", [], |row| row.get(0))
            .context("failed to count match checks")?;
        Ok(count as usize)
    }
}

fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
