// SQLite-backed cache of raw API responses, so repeated runs on the same
// day don't hammer the stats API.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

/// Keyed by request URL; values are the raw response bodies.
pub struct Cache {
    conn: Mutex<Connection>,
}

impl Cache {
    /// Open (or create) the cache at `path` and ensure the schema exists.
    /// Pass `":memory:"` for an ephemeral cache (useful for tests).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open cache at {}", path.display()))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set cache pragmas")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS responses (
                url        TEXT PRIMARY KEY,
                fetched_at TEXT NOT NULL,
                body       TEXT NOT NULL
            );",
        )
        .context("failed to create cache schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the cache in the user's cache directory.
    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "puckwatch")
            .context("could not determine a cache directory for this platform")?;
        let dir = dirs.cache_dir();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create cache directory {}", dir.display()))?;
        Self::open(dir.join("responses.db"))
    }

    /// Acquire the connection. Panics if the mutex is poisoned, which
    /// should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("cache mutex poisoned")
    }

    /// Cached body for `url`, or `None` on a miss.
    pub fn get(&self, url: &str) -> Result<Option<String>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT body FROM responses WHERE url = ?1")
            .context("failed to prepare cache lookup")?;
        let mut rows = stmt
            .query_map(params![url], |row| row.get::<_, String>(0))
            .context("failed to query cache")?;

        match rows.next() {
            Some(row) => Ok(Some(row.context("failed to read cached body")?)),
            None => Ok(None),
        }
    }

    /// Store `body` under `url`, replacing any previous entry.
    pub fn put(&self, url: &str, body: &str) -> Result<()> {
        let fetched_at = chrono::Utc::now().to_rfc3339();
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO responses (url, fetched_at, body) VALUES (?1, ?2, ?3)",
                params![url, fetched_at, body],
            )
            .context("failed to store cached response")?;
        Ok(())
    }

    /// Drop every cached response.
    pub fn clear(&self) -> Result<()> {
        self.conn()
            .execute("DELETE FROM responses", [])
            .context("failed to clear cache")?;
        Ok(())
    }
}
