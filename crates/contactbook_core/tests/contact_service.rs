use chrono::NaiveDate;
use contactbook_core::db::open_db_in_memory;
use contactbook_core::{
    AddOutcome, ContactError, ContactService, ContactStore, Directory, FieldError,
    SqliteContactStore, StoreError, StoreResult, UpcomingBirthday,
};
use std::cell::RefCell;
use std::rc::Rc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Store that keeps the last saved snapshot and can be told to fail.
#[derive(Clone, Default)]
struct MemoryStore {
    saved: Rc<RefCell<Option<Directory>>>,
    fail_load: bool,
}

impl ContactStore for MemoryStore {
    fn load(&self) -> StoreResult<Directory> {
        if self.fail_load {
            return Err(StoreError::InvalidData("corrupt snapshot".to_string()));
        }
        Ok(self.saved.borrow().clone().unwrap_or_default())
    }

    fn save(&self, directory: &Directory) -> StoreResult<()> {
        *self.saved.borrow_mut() = Some(directory.clone());
        Ok(())
    }
}

#[test]
fn adding_phones_to_same_name_keeps_one_record() {
    let mut service = ContactService::open(MemoryStore::default()).unwrap();

    assert_eq!(
        service.add_contact("Maria", "0123456789").unwrap(),
        AddOutcome::Created(1)
    );
    assert_eq!(service.directory().len(), 1);
    assert_eq!(service.contact("Maria").unwrap().phones().len(), 1);

    assert_eq!(
        service.add_contact("Maria", "0505555555").unwrap(),
        AddOutcome::Appended(1)
    );
    assert_eq!(service.directory().len(), 1);
    assert_eq!(service.contact("Maria").unwrap().phones().len(), 2);
}

#[test]
fn duplicate_phone_is_scoped_to_one_record() {
    let mut service = ContactService::open(MemoryStore::default()).unwrap();
    service.add_contact("Maria", "0123456789").unwrap();

    assert_eq!(
        service.add_contact("Maria", "0123456789"),
        Err(ContactError::DuplicatePhone("0123456789".to_string()))
    );
    assert_eq!(
        service.add_contact("Anton", "0123456789").unwrap(),
        AddOutcome::Created(2)
    );
}

#[test]
fn edit_uses_strict_policy_even_for_leniently_added_phones() {
    let mut service = ContactService::open(MemoryStore::default()).unwrap();
    service.add_contact("Maria", "12-34").unwrap();
    service.add_contact("Maria", "0123456789").unwrap();

    for bad in ["12-34", "123456789", "01234567890", "abcdefghij"] {
        assert!(
            matches!(
                service.change_phone("Maria", "0123456789", bad),
                Err(ContactError::Validation(FieldError::InvalidPhone(_)))
            ),
            "`{bad}` should be rejected"
        );
    }

    service.change_phone("Maria", "12-34", "1111111111").unwrap();
    assert_eq!(
        service.contact("Maria").unwrap().render_phones(),
        "1111111111; 0123456789"
    );
}

#[test]
fn failed_first_phone_does_not_create_record() {
    let mut service = ContactService::open(MemoryStore::default()).unwrap();
    assert_eq!(
        service.add_contact(" ", "0123456789"),
        Err(ContactError::Validation(FieldError::EmptyName))
    );
    assert!(service.directory().is_empty());
}

#[test]
fn delete_unknown_name_reports_not_found_and_changes_nothing() {
    let mut service = ContactService::open(MemoryStore::default()).unwrap();
    service.add_contact("Maria", "0123456789").unwrap();
    let before = service.directory().clone();

    assert_eq!(
        service.delete_contact("X"),
        Err(ContactError::ContactNotFound("X".to_string()))
    );
    assert_eq!(service.directory(), &before);

    assert_eq!(service.delete_contact("Maria").unwrap(), 1);
    assert!(service.directory().is_empty());
}

#[test]
fn remove_phone_is_not_an_error_when_absent() {
    let mut service = ContactService::open(MemoryStore::default()).unwrap();
    service.add_contact("Maria", "0123456789").unwrap();

    assert_eq!(service.remove_phone("Maria", "0000000000").unwrap(), 0);
    assert_eq!(service.remove_phone("Maria", "0123456789").unwrap(), 1);
    assert_eq!(
        service.remove_phone("Nobody", "0123456789"),
        Err(ContactError::ContactNotFound("Nobody".to_string()))
    );
}

#[test]
fn birthday_is_set_replaced_and_validated() {
    let mut service = ContactService::open(MemoryStore::default()).unwrap();
    service.add_contact("Ann", "0123456789").unwrap();

    assert_eq!(service.birthday("Ann").unwrap(), None);
    service.add_birthday("Ann", "1990.01.13").unwrap();
    let replaced = service.add_birthday("Ann", "1991.02.14").unwrap();
    assert_eq!(replaced.to_string(), "1991.02.14");
    assert_eq!(service.birthday("Ann").unwrap(), Some(replaced));

    assert_eq!(
        service.add_birthday("Ann", "14.02.1991"),
        Err(ContactError::Validation(FieldError::InvalidDateFormat(
            "14.02.1991".to_string()
        )))
    );
    assert_eq!(
        service.birthday("Bob"),
        Err(ContactError::ContactNotFound("Bob".to_string()))
    );
}

#[test]
fn saturday_birthday_three_days_out_is_congratulated_on_monday() {
    let mut service = ContactService::open(MemoryStore::default()).unwrap();
    service.add_contact("Ann", "0123456789").unwrap();
    service.add_birthday("Ann", "1990.01.13").unwrap();

    assert_eq!(
        service.upcoming_birthdays(date(2024, 1, 10)),
        vec![UpcomingBirthday {
            name: "Ann".to_string(),
            congratulation_date: "2024.01.15".to_string(),
        }]
    );
}

#[test]
fn birthday_ten_days_out_is_excluded() {
    let mut service = ContactService::open(MemoryStore::default()).unwrap();
    service.add_contact("Ann", "0123456789").unwrap();
    service.add_birthday("Ann", "1990.01.20").unwrap();

    assert!(service.upcoming_birthdays(date(2024, 1, 10)).is_empty());
}

#[test]
fn earlier_birthday_is_projected_to_next_year() {
    let mut service = ContactService::open(MemoryStore::default()).unwrap();
    service.add_contact("Ann", "0123456789").unwrap();
    // This year's occurrence (2024-12-01) has passed; next one is far away.
    service.add_birthday("Ann", "1990.12.01").unwrap();
    service.add_contact("Bob", "0505555555").unwrap();
    // 2025-01-04 is a Saturday, four days after 2024-12-31.
    service.add_birthday("Bob", "1990.01.04").unwrap();

    assert_eq!(
        service.upcoming_birthdays(date(2024, 12, 31)),
        vec![UpcomingBirthday {
            name: "Bob".to_string(),
            congratulation_date: "2025.01.06".to_string(),
        }]
    );
}

#[test]
fn upcoming_birthdays_includes_every_qualifying_contact() {
    let mut service = ContactService::open(MemoryStore::default()).unwrap();
    for (name, phone, birthday) in [
        ("Ann", "0000000001", Some("1990.01.13")),
        ("Bob", "0000000002", None),
        ("Cid", "0000000003", Some("1970.01.10")),
        ("Dee", "0000000004", Some("1980.06.01")),
        ("Eve", "0000000005", Some("2001.01.17")),
    ] {
        service.add_contact(name, phone).unwrap();
        if let Some(value) = birthday {
            service.add_birthday(name, value).unwrap();
        }
    }

    let names: Vec<String> = service
        .upcoming_birthdays(date(2024, 1, 10))
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, vec!["Ann", "Cid", "Eve"]);
}

#[test]
fn mutations_write_through_to_store() {
    let store = MemoryStore::default();
    let mut service = ContactService::open(store.clone()).unwrap();
    service.add_contact("Ann", "0123456789").unwrap();
    service.add_birthday("Ann", "1990.01.13").unwrap();

    assert_eq!(store.saved.borrow().as_ref(), Some(service.directory()));

    let reopened = ContactService::open(store.clone()).unwrap();
    assert_eq!(reopened.directory(), service.directory());
}

#[test]
fn failed_load_is_returned_to_caller() {
    let result = ContactService::open(MemoryStore {
        saved: Rc::default(),
        fail_load: true,
    });
    assert!(matches!(result, Err(StoreError::InvalidData(_))));
}

#[test]
fn invalid_sqlite_rows_are_reported_and_left_in_place() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO contacts (id, name, birthday) VALUES (1, 'Ann', '13/01/1990');
         INSERT INTO contacts (id, name, birthday) VALUES (2, 'Bob', '1990.01.01');",
    )
    .unwrap();

    let result = ContactService::open(SqliteContactStore::try_new(&conn).unwrap());
    assert!(matches!(result, Err(StoreError::InvalidData(_))));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 2);
}

#[test]
fn sqlite_store_round_trips_through_service() {
    let conn = open_db_in_memory().unwrap();
    {
        let mut service =
            ContactService::open(SqliteContactStore::try_new(&conn).unwrap()).unwrap();
        service.add_contact("Maria", "0123456789").unwrap();
        service.add_contact("Maria", "0505555555").unwrap();
        service.add_contact("Anton", "0671111111").unwrap();
        service.add_birthday("Anton", "1985.01.04").unwrap();
    }

    let service = ContactService::open(SqliteContactStore::try_new(&conn).unwrap()).unwrap();
    assert_eq!(service.directory().len(), 2);
    assert_eq!(
        service.contact("Maria").unwrap().render_phones(),
        "0123456789; 0505555555"
    );
    assert_eq!(
        service.birthday("Anton").unwrap().unwrap().to_string(),
        "1985.01.04"
    );
}
