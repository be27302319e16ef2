use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use thiserror::Error;
use tidemark_config::tidemark_dir;
use tidemark_core::{RevisionRecord, RevisionSummary};

const META_FILE_NAME: &str = "meta.sqlite";
const REVISIONS_DIR_NAME: &str = "revisions";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("corrupt cache entry: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no cache found at {}, run an analysis build first", .0.display())]
    Missing(PathBuf),
    #[error("archiver '{0}' is not present in the cache")]
    UnknownArchiver(String),
    #[error("revision '{revision}' is not cached for archiver '{archiver}'")]
    UnknownRevision { archiver: String, revision: String },
    #[error("invalid cache key '{0}'")]
    InvalidKey(String),
}

/// Read side of the revision cache.
pub trait RevisionCache {
    /// Archiver names in registration order.
    fn list_archivers(&self) -> Result<Vec<String>, CacheError>;
    /// Revision index in the order the archiver produced it (newest first).
    fn get_index(&self, archiver: &str) -> Result<Vec<RevisionSummary>, CacheError>;
    fn get_record(&self, archiver: &str, revision: &str) -> Result<RevisionRecord, CacheError>;
}

pub struct CacheStore {
    conn: Connection,
    cache_dir: PathBuf,
    revisions_dir: PathBuf,
}

impl CacheStore {
    /// Opens the cache, creating the directory layout and schema when absent.
    pub fn open(workspace_root: impl AsRef<Path>) -> Result<Self, CacheError> {
        let cache_dir = tidemark_dir(workspace_root);
        fs::create_dir_all(cache_dir.join(REVISIONS_DIR_NAME))?;

        let conn = Connection::open(cache_dir.join(META_FILE_NAME))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        run_migrations(&conn)?;

        Ok(Self::with_connection(conn, cache_dir))
    }

    /// Opens a cache that a previous build produced. The connection is read-only:
    /// no files are created and neither the schema nor the journal mode is touched.
    pub fn open_existing(workspace_root: impl AsRef<Path>) -> Result<Self, CacheError> {
        let cache_dir = tidemark_dir(workspace_root);
        let meta_path = cache_dir.join(META_FILE_NAME);
        if !meta_path.is_file() {
            return Err(CacheError::Missing(cache_dir));
        }

        let conn = Connection::open_with_flags(
            meta_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(Duration::from_secs(5))?;

        Ok(Self::with_connection(conn, cache_dir))
    }

    fn with_connection(conn: Connection, cache_dir: PathBuf) -> Self {
        let revisions_dir = cache_dir.join(REVISIONS_DIR_NAME);
        Self {
            conn,
            cache_dir,
            revisions_dir,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn revisions_dir(&self) -> &Path {
        &self.revisions_dir
    }

    /// Replaces the whole revision index of `archiver`, keeping the given order.
    pub fn replace_index(
        &self,
        archiver: &str,
        revisions: &[RevisionSummary],
    ) -> Result<(), CacheError> {
        validate_key(archiver)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO archivers (name, registered_at) VALUES (?1, ?2)
            ON CONFLICT(name) DO NOTHING
            "#,
            params![archiver, now_secs()],
        )?;
        tx.execute(
            "DELETE FROM revisions WHERE archiver = ?1",
            params![archiver],
        )?;
        for (ordinal, revision) in revisions.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO revisions (
                    archiver, ordinal, revision, author_name, author_email, date, message
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    archiver,
                    ordinal as i64,
                    revision.revision_id,
                    revision.author_name,
                    revision.author_email,
                    revision.commit_date,
                    revision.message,
                ],
            )?;
        }
        tx.commit()?;

        tracing::debug!(
            archiver = archiver,
            revisions = revisions.len(),
            "replaced revision index"
        );
        Ok(())
    }

    pub fn write_record(
        &self,
        archiver: &str,
        revision: &str,
        record: &RevisionRecord,
    ) -> Result<(), CacheError> {
        let path = self.record_path(archiver, revision)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(record)?)?;
        Ok(())
    }

    fn record_path(&self, archiver: &str, revision: &str) -> Result<PathBuf, CacheError> {
        validate_key(archiver)?;
        validate_key(revision)?;
        Ok(self
            .revisions_dir
            .join(archiver)
            .join(format!("{revision}.json")))
    }

    fn archiver_exists(&self, archiver: &str) -> Result<bool, CacheError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM archivers WHERE name = ?1",
                params![archiver],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl RevisionCache for CacheStore {
    fn list_archivers(&self) -> Result<Vec<String>, CacheError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM archivers ORDER BY registered_at ASC, rowid ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let names = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn get_index(&self, archiver: &str) -> Result<Vec<RevisionSummary>, CacheError> {
        if !self.archiver_exists(archiver)? {
            return Err(CacheError::UnknownArchiver(archiver.to_owned()));
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT revision, author_name, author_email, date, message
            FROM revisions
            WHERE archiver = ?1
            ORDER BY ordinal ASC
            "#,
        )?;

        let rows = stmt.query_map(params![archiver], |row| {
            Ok(RevisionSummary {
                revision_id: row.get(0)?,
                author_name: row.get(1)?,
                author_email: row.get(2)?,
                commit_date: row.get(3)?,
                message: row.get(4)?,
            })
        })?;

        let index = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(index)
    }

    fn get_record(&self, archiver: &str, revision: &str) -> Result<RevisionRecord, CacheError> {
        let path = self.record_path(archiver, revision)?;
        if !path.exists() {
            return Err(CacheError::UnknownRevision {
                archiver: archiver.to_owned(),
                revision: revision.to_owned(),
            });
        }

        let content = fs::read_to_string(path)?;
        let record = serde_json::from_str(&content)?;
        Ok(record)
    }
}

fn validate_key(key: &str) -> Result<(), CacheError> {
    let invalid = key.trim().is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\', '\0']);
    if invalid {
        return Err(CacheError::InvalidKey(key.to_owned()));
    }
    Ok(())
}

fn run_migrations(conn: &Connection) -> Result<(), CacheError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS archivers (
            name TEXT PRIMARY KEY,
            registered_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS revisions (
            archiver TEXT NOT NULL,
            ordinal INTEGER NOT NULL,
            revision TEXT NOT NULL,
            author_name TEXT NOT NULL,
            author_email TEXT NOT NULL,
            date INTEGER NOT NULL,
            message TEXT NOT NULL,
            PRIMARY KEY (archiver, ordinal)
        );
        "#,
    )?;

    Ok(())
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs() as i64)
        .unwrap_or(0)
}
