//! Board schema steps.
//!
//! Step `n` (1-based) of `STEPS` brings a database to `PRAGMA user_version = n`.
//! Steps are append-only; shipped ones are never edited.

use crate::db::{DbError, DbResult};
use log::debug;
use rusqlite::Connection;

const STEPS: &[&str] = &[include_str!("0001_kv_store.sql")];

/// Schema version this build writes.
pub fn schema_version() -> u32 {
    STEPS.len() as u32
}

/// Brings `conn` up to `schema_version()` inside one transaction.
///
/// # Errors
/// - `SchemaTooNew` when the file is ahead of this build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    let supported = schema_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending = STEPS.iter().zip(1u32..).skip(found as usize);
    let tx = conn.transaction()?;
    for (sql, version) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        debug!("event=db_migrate module=db status=ok version={version}");
    }
    tx.commit()?;
    Ok(())
}

fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
