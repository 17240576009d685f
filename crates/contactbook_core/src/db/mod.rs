//! Contact book file handling: opening, bootstrap and schema versioning.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Files written by a newer schema are refused, never downgraded.
//! - A file SQLite cannot read as a database surfaces as
//!   `DbError::NotAContactBook`, distinct from other SQLite failures.

use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or prepare a contact book.
#[derive(Debug)]
pub enum DbError {
    /// The file exists but is not an SQLite database (truncated, foreign
    /// or overwritten by another program).
    NotAContactBook(rusqlite::Error),
    /// The file was written by a newer release of the contact book.
    UnsupportedSchemaVersion { file_version: u32, supported: u32 },
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// Short machine-readable tag for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAContactBook(_) => "not_a_contact_book",
            Self::UnsupportedSchemaVersion { .. } => "newer_schema",
            Self::Sqlite(_) => "sqlite",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAContactBook(err) => write!(f, "file is not a contact book: {err}"),
            Self::UnsupportedSchemaVersion {
                file_version,
                supported,
            } => write!(
                f,
                "contact book schema version {file_version} is newer than supported {supported}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotAContactBook(err) | Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::NotADatabase) => Self::NotAContactBook(value),
            _ => Self::Sqlite(value),
        }
    }
}
