use crate::error::{GhstatsError, Result};
use crate::model::{DateRange, NormalizedCommitRow, RepoSlug, SCHEMA_VERSION};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Identifies one pipeline result. The credential only contributes its
/// digest so tokens are never written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub endpoint: String,
    pub repo: RepoSlug,
    pub range: DateRange,
    pub credential_scope: String,
}

impl CacheKey {
    pub fn new(endpoint: &str, repo: &RepoSlug, range: DateRange, credential: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            repo: repo.clone(),
            range,
            credential_scope: format!("{:x}", Sha256::digest(credential.as_bytes())),
        }
    }
}

pub trait ResultCache {
    fn get_or_compute<F>(&mut self, key: &CacheKey, ttl: Duration, compute: F) -> Result<Vec<NormalizedCommitRow>>
    where
        F: FnOnce() -> Result<Vec<NormalizedCommitRow>>;
}

/// Always computes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl ResultCache for NoCache {
    fn get_or_compute<F>(&mut self, _key: &CacheKey, _ttl: Duration, compute: F) -> Result<Vec<NormalizedCommitRow>>
    where
        F: FnOnce() -> Result<Vec<NormalizedCommitRow>>,
    {
        compute()
    }
}

pub struct SqliteCache {
    conn: Connection,
    path: PathBuf,
}

impl SqliteCache {
    pub fn new<P: AsRef<Path>>(cache_path: Option<P>) -> Result<Self> {
        let cache_dir = match cache_path {
            Some(path) => path.as_ref().to_path_buf(),
            None => default_cache_dir()?,
        };
        std::fs::create_dir_all(&cache_dir)?;
        let db_path = cache_dir.join("cache.db");
        let conn = Connection::open(&db_path)?;
        let mut cache = Self { conn, path: db_path };
        cache.initialize()?;
        Ok(cache)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS results (
                endpoint TEXT NOT NULL,
                owner TEXT NOT NULL,
                name TEXT NOT NULL,
                from_date TEXT NOT NULL,
                to_date TEXT NOT NULL,
                credential_scope TEXT NOT NULL,
                fetched_at INTEGER NOT NULL,
                rows TEXT NOT NULL,
                PRIMARY KEY (endpoint, owner, name, from_date, to_date, credential_scope)
            );
            CREATE INDEX IF NOT EXISTS idx_results_fetched_at ON results(fetched_at);
            ",
        )?;
        self.check_schema_version()?;
        Ok(())
    }

    fn check_schema_version(&mut self) -> Result<()> {
        let user_version: i64 = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?;

        if user_version == 0 {
            let set_stmt = format!("PRAGMA user_version = {SCHEMA_VERSION};");
            self.conn.execute_batch(&set_stmt)?;
        } else if user_version != SCHEMA_VERSION as i64 {
            return Err(GhstatsError::Cache(format!(
                "Schema version mismatch: expected {}, found {}",
                SCHEMA_VERSION, user_version
            )));
        }

        Ok(())
    }

    /// Rows stored under `key` if they are younger than `ttl` at `now`.
    pub fn get(&self, key: &CacheKey, ttl: Duration, now: DateTime<Utc>) -> Result<Option<Vec<NormalizedCommitRow>>> {
        let found: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT fetched_at, rows FROM results
                 WHERE endpoint = ? AND owner = ? AND name = ? AND from_date = ? AND to_date = ? AND credential_scope = ?",
                params![
                    key.endpoint,
                    key.repo.owner,
                    key.repo.name,
                    key.range.from_date.to_string(),
                    key.range.to_date.to_string(),
                    key.credential_scope
                ],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((fetched_at, rows)) = found else {
            return Ok(None);
        };
        if now.timestamp() - fetched_at > ttl_secs(ttl) {
            debug!("cache entry for {} expired", key.repo);
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&rows)?))
    }

    pub fn store(&mut self, key: &CacheKey, rows: &[NormalizedCommitRow], fetched_at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO results (endpoint, owner, name, from_date, to_date, credential_scope, fetched_at, rows)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                key.endpoint,
                key.repo.owner,
                key.repo.name,
                key.range.from_date.to_string(),
                key.range.to_date.to_string(),
                key.credential_scope,
                fetched_at.timestamp(),
                serde_json::to_string(rows)?
            ],
        )?;
        Ok(())
    }

    /// Deletes entries older than `ttl`, returning how many were removed.
    pub fn purge_expired(&mut self, ttl: Duration, now: DateTime<Utc>) -> Result<usize> {
        let cutoff = now.timestamp() - ttl_secs(ttl);
        let removed = self
            .conn
            .execute("DELETE FROM results WHERE fetched_at < ?", params![cutoff])?;
        Ok(removed)
    }
}

impl ResultCache for SqliteCache {
    fn get_or_compute<F>(&mut self, key: &CacheKey, ttl: Duration, compute: F) -> Result<Vec<NormalizedCommitRow>>
    where
        F: FnOnce() -> Result<Vec<NormalizedCommitRow>>,
    {
        let now = Utc::now();
        match self.get(key, ttl, now) {
            Ok(Some(rows)) => {
                debug!("cache hit for {} ({} rows)", key.repo, rows.len());
                return Ok(rows);
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to read cache, fetching instead: {e}"),
        }

        let rows = compute()?;
        if let Err(e) = self.store(key, &rows, now) {
            warn!("Failed to store result in cache: {e}");
        }
        Ok(rows)
    }
}

fn ttl_secs(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)
}

pub fn default_cache_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join("ghstats"))
        .ok_or_else(|| GhstatsError::Cache("Could not determine a user cache directory".to_string()))
}
