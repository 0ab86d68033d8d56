//! Board snapshot store contracts, SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Serialize the full column list as one JSON blob.
//! - Provide a SQLite key/value store and an in-memory store.
//!
//! # Invariants
//! - `load` returns `None` only when nothing was saved yet.
//! - Decoded snapshots are validated before they reach the engine.

use crate::db::DbError;
use crate::model::board::BoardSnapshot;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key under which the board blob is stored by default.
pub const DEFAULT_SNAPSHOT_KEY: &str = "board_state";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for snapshot load/save.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "failed to encode board snapshot: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted board data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence interface for the board snapshot.
pub trait BoardStore {
    /// Reads the last saved snapshot, `None` when nothing was saved.
    fn load(&self) -> StoreResult<Option<BoardSnapshot>>;
    /// Replaces the stored snapshot.
    fn save(&self, snapshot: &BoardSnapshot) -> StoreResult<()>;
}

impl<S: BoardStore + ?Sized> BoardStore for &S {
    fn load(&self) -> StoreResult<Option<BoardSnapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &BoardSnapshot) -> StoreResult<()> {
        (**self).save(snapshot)
    }
}

/// SQLite-backed store keeping the snapshot in one `kv_store` row.
pub struct SqliteBoardStore<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteBoardStore<'conn> {
    /// Uses `DEFAULT_SNAPSHOT_KEY`. `conn` must come from `db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_key(conn, DEFAULT_SNAPSHOT_KEY)
    }

    pub fn with_key(conn: &'conn Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    /// Deletes the stored snapshot. Returns whether a row existed.
    pub fn clear(&self) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [self.key.as_str()])?;
        Ok(changed > 0)
    }
}

impl BoardStore for SqliteBoardStore<'_> {
    fn load(&self) -> StoreResult<Option<BoardSnapshot>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let snapshot = raw.as_deref().map(decode_snapshot).transpose()?;
        debug!(
            "event=board_load module=store status=ok backend=sqlite found={}",
            snapshot.is_some()
        );
        Ok(snapshot)
    }

    fn save(&self, snapshot: &BoardSnapshot) -> StoreResult<()> {
        let raw = encode_snapshot(snapshot)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![self.key.as_str(), raw.as_str()],
        )?;
        debug!(
            "event=board_save module=store status=ok backend=sqlite bytes={}",
            raw.len()
        );
        Ok(())
    }
}

/// In-memory store holding the encoded blob, for tests and ephemeral boards.
#[derive(Debug, Default)]
pub struct MemoryBoardStore {
    raw: RefCell<Option<String>>,
}

impl MemoryBoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an already-encoded blob.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
        }
    }

    /// Currently stored blob, if any.
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl BoardStore for MemoryBoardStore {
    fn load(&self) -> StoreResult<Option<BoardSnapshot>> {
        self.raw.borrow().as_deref().map(decode_snapshot).transpose()
    }

    fn save(&self, snapshot: &BoardSnapshot) -> StoreResult<()> {
        let raw = encode_snapshot(snapshot)?;
        *self.raw.borrow_mut() = Some(raw);
        Ok(())
    }
}

fn encode_snapshot(snapshot: &BoardSnapshot) -> StoreResult<String> {
    serde_json::to_string(snapshot).map_err(StoreError::Serialization)
}

fn decode_snapshot(raw: &str) -> StoreResult<BoardSnapshot> {
    let snapshot: BoardSnapshot = serde_json::from_str(raw).map_err(|err| {
        error!("event=board_load module=store status=error error_code=decode_failed error={err}");
        StoreError::InvalidData(err.to_string())
    })?;
    snapshot
        .validate()
        .map_err(|err| StoreError::InvalidData(err.to_string()))?;
    Ok(snapshot)
}
