//! Saved-query store.
//!
//! Persists named report definitions in an embedded SQLite database so an
//! operator can recall prior configurations. The store is local to one
//! device profile: there is exactly one writer, no sync, and no conflict
//! resolution beyond the uniqueness constraint on `name`.
//!
//! # Design
//!
//! - One logical table `queries`, primary key `id`, unique index on `name`
//! - Spec payloads stored as JSON
//! - Versioned - auto-clears on version mismatch

use std::path::PathBuf;

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::report::QuerySpec;

/// Current store schema version. Bump this when the layout changes.
const STORE_VERSION: i32 = 1;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A saved query with this name already exists.
    #[error("a saved query named '{0}' already exists")]
    DuplicateName(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to determine data directory")]
    NoDataDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A persisted report definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub id: String,
    pub name: String,
    pub spec: QuerySpec,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Repository contract for saved queries.
///
/// The trait is the swap seam between the embedded store and a server-side
/// table; the builder surface only ever talks to this interface.
pub trait QueryRepository: Send {
    /// All saved queries, most recently updated first.
    fn list(&self) -> StoreResult<Vec<SavedQuery>>;

    /// Persist `spec` under `name`.
    ///
    /// Fails with [`StoreError::DuplicateName`] when the name is taken;
    /// nothing is written in that case.
    fn save(&self, name: &str, spec: &QuerySpec) -> StoreResult<SavedQuery>;

    /// Load one saved query by id.
    fn load(&self, id: &str) -> StoreResult<Option<SavedQuery>>;

    /// Delete one saved query. Returns true if a record was deleted.
    fn delete(&self, id: &str) -> StoreResult<bool>;
}

/// SQLite-backed saved-query store.
pub struct SqliteQueryStore {
    conn: Connection,
}

impl SqliteQueryStore {
    /// Open or create the store database at the default location.
    ///
    /// If the store version doesn't match, existing records are cleared.
    pub fn open() -> StoreResult<Self> {
        Self::open_at(Self::store_path()?)
    }

    /// Open or create the store database at `path`.
    pub fn open_at(path: PathBuf) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Default path of the store database.
    pub fn store_path() -> StoreResult<PathBuf> {
        let base = dirs::data_dir().ok_or(StoreError::NoDataDir)?;
        Ok(base.join("tabula").join("queries.db"))
    }

    /// Initialize the schema and check the store version.
    fn init(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS queries (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                spec TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS queries_name_idx ON queries(name);

            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;

        let stored_version: Option<i32> = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = 'version'", [], |row| {
                let s: String = row.get(0)?;
                Ok(s.parse().unwrap_or(0))
            })
            .optional()?;

        match stored_version {
            Some(v) if v == STORE_VERSION => {}
            Some(_) => {
                self.conn.execute("DELETE FROM queries", [])?;
                self.set_version()?;
            }
            None => {
                self.set_version()?;
            }
        }

        Ok(())
    }

    fn set_version(&self) -> StoreResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('version', ?)",
            params![STORE_VERSION.to_string()],
        )?;
        Ok(())
    }

    fn row_to_saved(row: &rusqlite::Row<'_>) -> rusqlite::Result<(SavedQuery, String)> {
        let spec_json: String = row.get(2)?;
        Ok((
            SavedQuery {
                id: row.get(0)?,
                name: row.get(1)?,
                spec: QuerySpec::default(),
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
            },
            spec_json,
        ))
    }

    fn hydrate((mut saved, spec_json): (SavedQuery, String)) -> StoreResult<SavedQuery> {
        saved.spec = serde_json::from_str(&spec_json)?;
        Ok(saved)
    }
}

fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl QueryRepository for SqliteQueryStore {
    fn list(&self) -> StoreResult<Vec<SavedQuery>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, spec, created_at, updated_at FROM queries
             ORDER BY updated_at DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map([], Self::row_to_saved)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(Self::hydrate).collect()
    }

    fn save(&self, name: &str, spec: &QuerySpec) -> StoreResult<SavedQuery> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = now_unix();
        let spec_json = serde_json::to_string(spec)?;

        let result = self.conn.execute(
            "INSERT INTO queries (id, name, spec, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            params![id, name, spec_json, now, now],
        );
        match result {
            Ok(_) => {
                tracing::debug!(%name, %id, "saved query stored");
                Ok(SavedQuery {
                    id,
                    name: name.to_string(),
                    spec: spec.clone(),
                    created_at: now,
                    updated_at: now,
                })
            }
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateName(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    fn load(&self, id: &str) -> StoreResult<Option<SavedQuery>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, spec, created_at, updated_at FROM queries WHERE id = ?",
                params![id],
                Self::row_to_saved,
            )
            .optional()?;
        row.map(Self::hydrate).transpose()
    }

    fn delete(&self, id: &str) -> StoreResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM queries WHERE id = ?", params![id])?;
        Ok(rows > 0)
    }
}
