use contactbook_core::db::migrations::latest_version;
use contactbook_core::db::{open_db, open_db_in_memory, DbError};
use contactbook_core::{ContactStore, Directory, Record, SqliteContactStore, StoreError};
use rusqlite::Connection;

fn sample_directory() -> Directory {
    let mut directory = Directory::new();

    let mut maria = Record::new("Maria").unwrap();
    maria.add_phone("0123456789").unwrap();
    maria.add_phone("0505555555").unwrap();
    maria.add_phone("not-strict").unwrap();
    maria.set_birthday("1985.01.04").unwrap();
    directory.add(maria);

    directory.add(Record::new("Anton").unwrap());

    let mut ann = Record::new("Ann").unwrap();
    ann.add_phone("0671111111").unwrap();
    ann.set_birthday("2000.02.29").unwrap();
    directory.add(ann);

    directory
}

#[test]
fn save_and_reload_file_preserves_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.sqlite3");
    let original = sample_directory();

    {
        let conn = open_db(&path).unwrap();
        SqliteContactStore::try_new(&conn)
            .unwrap()
            .save(&original)
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let loaded = SqliteContactStore::try_new(&conn).unwrap().load().unwrap();

    assert_eq!(loaded, original);
    assert_eq!(loaded.len(), 3);
    assert_eq!(
        loaded.find("Maria").unwrap().render_phones(),
        "0123456789; 0505555555; not-strict"
    );
    assert_eq!(
        loaded.find("Ann").unwrap().birthday().unwrap().to_string(),
        "2000.02.29"
    );
    assert_eq!(loaded.find("Anton").unwrap().birthday(), None);
}

#[test]
fn reload_keeps_ids_monotonic_after_deletes() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteContactStore::try_new(&conn).unwrap();

    let mut directory = sample_directory();
    directory.delete("Ann").unwrap();
    store.save(&directory).unwrap();

    let mut loaded = store.load().unwrap();
    assert_eq!(loaded.last_id(), 3);
    assert_eq!(loaded.add(Record::new("Bob").unwrap()), 4);
}

#[test]
fn open_db_applies_latest_schema() {
    let conn = open_db_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn open_db_rejects_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(&format!(
            "PRAGMA user_version = {};",
            latest_version() + 1
        ))
        .unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::UnsupportedSchemaVersion { .. }));
}

#[test]
fn open_db_rejects_non_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.sqlite3");
    std::fs::write(&path, "x".repeat(1024)).unwrap();

    assert!(matches!(open_db(&path), Err(DbError::NotAContactBook(_))));
}

#[test]
fn load_rejects_orphan_phone_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "PRAGMA foreign_keys = OFF;
         INSERT INTO contacts (id, name, birthday) VALUES (1, 'Ann', NULL);
         INSERT INTO contact_phones (contact_id, position, phone) VALUES (1, 0, '1');
         INSERT INTO contact_phones (contact_id, position, phone) VALUES (2, 0, '2');",
    )
    .unwrap();
    let store = SqliteContactStore::try_new(&conn).unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)), "unexpected error: {err}");
}
