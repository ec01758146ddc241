//! SQLite-backed slot store.
//!
//! # Responsibility
//! - Open and configure the slot database file.
//! - Create the `slots` table and stamp `PRAGMA user_version` on first open.
//!
//! # Invariants
//! - Only connections carrying [`SLOT_SCHEMA_VERSION`] are accepted.
//! - Databases stamped with a newer version are refused, never rewritten.
//! - Writes are single-statement upserts, so a failed write leaves the
//!   previous value intact.

use super::{SlotError, SlotResult, SlotStore};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

/// Schema version stamped into `PRAGMA user_version`.
pub const SLOT_SCHEMA_VERSION: u32 = 1;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SLOTS_TABLE_SQL: &str = "
CREATE TABLE IF NOT EXISTS slots (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
);";

/// Slot store over the `slots` table.
pub struct SqliteSlotStore {
    conn: Connection,
}

impl SqliteSlotStore {
    /// Opens the database file at `path`, creating the slot table if needed.
    ///
    /// Parent directories are not created; the caller owns the data location.
    ///
    /// # Errors
    /// - `UnsupportedSchemaVersion` when the file was written by a newer build.
    pub fn open(path: impl AsRef<Path>) -> SlotResult<Self> {
        let path = path.as_ref();
        open_logged("file", || {
            let conn = Connection::open(path)?;
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
            Ok(conn)
        })
    }

    /// Opens a private in-memory database with the slot table in place.
    pub fn open_in_memory() -> SlotResult<Self> {
        open_logged("memory", || Ok(Connection::open_in_memory()?))
    }

    /// Wraps an already bootstrapped connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema stamp does not match.
    pub fn try_new(conn: Connection) -> SlotResult<Self> {
        let actual_version = schema_version(&conn)?;
        if actual_version != SLOT_SCHEMA_VERSION {
            return Err(SlotError::UninitializedConnection {
                expected_version: SLOT_SCHEMA_VERSION,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    /// Underlying connection, for diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SlotStore for SqliteSlotStore {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<()> {
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> SlotResult<()> {
        self.conn
            .execute("DELETE FROM slots WHERE key = ?1;", [key])?;
        Ok(())
    }
}

fn open_logged(
    mode: &str,
    connect: impl FnOnce() -> SlotResult<Connection>,
) -> SlotResult<SqliteSlotStore> {
    let started_at = Instant::now();
    info!("event=slot_open module=slot status=start mode={mode}");

    let result = connect().and_then(|mut conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        ensure_schema(&mut conn)?;
        SqliteSlotStore::try_new(conn)
    });

    match &result {
        Ok(_) => info!(
            "event=slot_open module=slot status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=slot_open module=slot status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}

/// Creates the slot table on a fresh database; leaves a current one alone.
fn ensure_schema(conn: &mut Connection) -> SlotResult<()> {
    let version = schema_version(conn)?;
    if version > SLOT_SCHEMA_VERSION {
        return Err(SlotError::UnsupportedSchemaVersion {
            db_version: version,
            supported: SLOT_SCHEMA_VERSION,
        });
    }
    if version == SLOT_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SLOTS_TABLE_SQL)?;
    tx.pragma_update(None, "user_version", SLOT_SCHEMA_VERSION)?;
    tx.commit()?;
    info!("event=slot_schema module=slot status=ok from={version} to={SLOT_SCHEMA_VERSION}");
    Ok(())
}

fn schema_version(conn: &Connection) -> SlotResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}
