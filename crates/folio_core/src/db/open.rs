//! Connection setup and schema upgrades.
//!
//! `PRAGMA user_version` records the applied schema step. Pending steps run
//! in one transaction, so a failed upgrade leaves the previous schema intact.

use super::{StorageError, StorageResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Schema version this build reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

/// Ordered `(version, sql)` upgrade steps; the last one is `SCHEMA_VERSION`.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("schema_v1.sql"))];

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating when missing) the store file at `path`.
pub fn open_db(path: impl AsRef<Path>) -> StorageResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory store, mainly for tests.
pub fn open_db_in_memory() -> StorageResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StorageResult<Connection> {
    let started_at = Instant::now();
    let opened = open().map_err(StorageError::from).and_then(|mut conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        upgrade_schema(&mut conn)?;
        Ok(conn)
    });

    match &opened {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} schema=v{SCHEMA_VERSION} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    opened
}

fn upgrade_schema(conn: &mut Connection) -> StorageResult<()> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if found > SCHEMA_VERSION {
        return Err(StorageError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    let pending = SCHEMA_STEPS
        .iter()
        .filter(|(version, _)| *version > found)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        info!("event=db_upgrade module=db status=ok from=v{found} to=v{version}");
    }
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{upgrade_schema, SCHEMA_STEPS, SCHEMA_VERSION};
    use rusqlite::Connection;

    #[test]
    fn steps_are_increasing_and_end_at_schema_version() {
        let versions = SCHEMA_STEPS.iter().map(|(version, _)| *version).collect::<Vec<_>>();
        assert!(versions.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(versions.last().copied(), Some(SCHEMA_VERSION));
    }

    #[test]
    fn upgrading_twice_is_a_no_op() {
        let mut conn = Connection::open_in_memory().expect("open in-memory db");
        upgrade_schema(&mut conn).expect("first upgrade");
        upgrade_schema(&mut conn).expect("second upgrade");
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("read user_version");
        assert_eq!(version, SCHEMA_VERSION);
    }
}
