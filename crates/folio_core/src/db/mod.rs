//! SQLite backing for the content store.
//!
//! `open_db`/`open_db_in_memory` hand out connections with foreign keys on
//! and the forms/submissions schema at [`SCHEMA_VERSION`]. Nothing reads or
//! writes store rows through a connection that did not come from here.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory, SCHEMA_VERSION};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure opening or upgrading the content store database.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build; it is left untouched.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "content store database error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "content store schema v{found} is newer than this build (v{supported})"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
