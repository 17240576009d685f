//! Whole-directory persistence over the contact book SQLite file.
//!
//! # Responsibility
//! - Load the complete `Directory` snapshot from storage.
//! - Replace the stored snapshot with the in-memory one atomically.
//!
//! # Invariants
//! - `save` is all-or-nothing: one transaction per snapshot.
//! - `load` re-validates every row and rejects corrupt content instead of
//!   masking it.
//! - The id counter is persisted so ids are not reused across restarts.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::directory::{ContactId, Directory};
use crate::model::fields::{Birthday, Name, Phone};
use crate::model::record::Record;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const LAST_ID_KEY: &str = "last_id";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for directory snapshots.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
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
        Self::Db(DbError::from(value))
    }
}

/// Snapshot persistence for the contact directory.
pub trait ContactStore {
    fn load(&self) -> StoreResult<Directory>;
    fn save(&self, directory: &Directory) -> StoreResult<()>;
}

/// SQLite-backed directory store.
pub struct SqliteContactStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl ContactStore for SqliteContactStore<'_> {
    fn load(&self) -> StoreResult<Directory> {
        let started_at = Instant::now();
        let last_id = read_last_id(self.conn)?;
        let mut phones = read_phones(self.conn)?;

        let mut stmt = self
            .conn
            .prepare("SELECT id, name, birthday FROM contacts ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let id = to_contact_id(row.get::<_, i64>("id")?)?;
            let name_text: String = row.get("name")?;
            let name = Name::parse(name_text).map_err(|err| {
                StoreError::InvalidData(format!("contact {id} has invalid name: {err}"))
            })?;
            let birthday = match row.get::<_, Option<String>>("birthday")? {
                Some(value) => Some(Birthday::parse(&value).map_err(|err| {
                    StoreError::InvalidData(format!("contact {id} has invalid birthday: {err}"))
                })?),
                None => None,
            };

            let record_phones = phones.remove(&id).unwrap_or_default();
            let record = Record::from_parts(name, record_phones, birthday)
                .map_err(|err| StoreError::InvalidData(format!("contact {id}: {err}")))?;
            entries.push((id, record));
        }

        if let Some(orphan) = phones.keys().next() {
            return Err(StoreError::InvalidData(format!(
                "phones reference missing contact {orphan}"
            )));
        }

        let directory = Directory::restore(last_id, entries);
        info!(
            "event=directory_load module=store status=ok contacts={} last_id={} duration_ms={}",
            directory.len(),
            directory.last_id(),
            started_at.elapsed().as_millis()
        );
        Ok(directory)
    }

    fn save(&self, directory: &Directory) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = write_snapshot(self.conn, directory);
        match &result {
            Ok(()) => info!(
                "event=directory_save module=store status=ok contacts={} duration_ms={}",
                directory.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=directory_save module=store status=error contacts={} duration_ms={} error={}",
                directory.len(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

fn write_snapshot(conn: &Connection, directory: &Directory) -> StoreResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch("DELETE FROM contact_phones; DELETE FROM contacts;")?;
    {
        let mut insert_contact =
            tx.prepare("INSERT INTO contacts (id, name, birthday) VALUES (?1, ?2, ?3);")?;
        let mut insert_phone = tx.prepare(
            "INSERT INTO contact_phones (contact_id, position, phone) VALUES (?1, ?2, ?3);",
        )?;

        for (id, record) in directory.entries() {
            let db_id = to_db_id(id)?;
            insert_contact.execute(params![
                db_id,
                record.name().as_str(),
                record.birthday().map(|birthday| birthday.to_string()),
            ])?;
            for (position, phone) in record.phones().iter().enumerate() {
                insert_phone.execute(params![db_id, position as i64, phone.as_str()])?;
            }
        }
    }
    tx.execute(
        "INSERT INTO directory_meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
        params![LAST_ID_KEY, to_db_id(directory.last_id())?],
    )?;
    tx.commit()?;
    Ok(())
}

fn read_last_id(conn: &Connection) -> StoreResult<ContactId> {
    let value = conn
        .query_row(
            "SELECT value FROM directory_meta WHERE key = ?1;",
            [LAST_ID_KEY],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    value.map_or(Ok(0), to_contact_id)
}

fn read_phones(conn: &Connection) -> StoreResult<BTreeMap<ContactId, Vec<Phone>>> {
    let mut stmt = conn.prepare(
        "SELECT contact_id, phone FROM contact_phones ORDER BY contact_id ASC, position ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut phones: BTreeMap<ContactId, Vec<Phone>> = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let contact_id = to_contact_id(row.get::<_, i64>("contact_id")?)?;
        let value: String = row.get("phone")?;
        phones
            .entry(contact_id)
            .or_default()
            .push(Phone::lenient(&value));
    }
    Ok(phones)
}

fn to_contact_id(value: i64) -> StoreResult<ContactId> {
    ContactId::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("negative contact id `{value}`")))
}

fn to_db_id(value: ContactId) -> StoreResult<i64> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("contact id `{value}` exceeds storage range")))
}
