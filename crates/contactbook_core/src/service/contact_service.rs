//! Contact book use-case service.
//!
//! # Responsibility
//! - Own the in-memory `Directory` and the store it is persisted to.
//! - Expose one typed operation per user command.
//! - Write the snapshot through after every successful mutation.
//!
//! # Invariants
//! - There is exactly one writer: all mutation goes through `&mut self`.
//! - A failed operation never leaves a partially mutated record.
//! - Load failures are returned to the caller; the service never starts
//!   empty on top of a store it could not read.

use crate::model::directory::{ContactId, Directory, UpcomingBirthday};
use crate::model::fields::{validate_name, Birthday, FieldError};
use crate::model::record::{Record, RecordError};
use crate::repo::contact_store::{ContactStore, StoreResult};
use chrono::NaiveDate;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ContactResult<T> = Result<T, ContactError>;

/// Error kinds surfaced by contact use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    Validation(FieldError),
    ContactNotFound(String),
    PhoneNotFound(String),
    DuplicatePhone(String),
}

impl Display for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ContactNotFound(name) => write!(f, "contact {name} does not exist"),
            Self::PhoneNotFound(phone) => write!(f, "phone {phone} not found in contact"),
            Self::DuplicatePhone(phone) => write!(f, "phone {phone} already exists in contact"),
        }
    }
}

impl Error for ContactError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldError> for ContactError {
    fn from(value: FieldError) -> Self {
        Self::Validation(value)
    }
}

impl From<RecordError> for ContactError {
    fn from(value: RecordError) -> Self {
        match value {
            RecordError::Validation(err) => Self::Validation(err),
            RecordError::DuplicatePhone(phone) => Self::DuplicatePhone(phone),
            RecordError::PhoneNotFound(phone) => Self::PhoneNotFound(phone),
        }
    }
}

/// Result of `add_contact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new record was created with the phone as its first entry.
    Created(ContactId),
    /// The phone was appended to an existing record.
    Appended(ContactId),
}

/// Use-case facade over an owned directory and its store.
pub struct ContactService<S: ContactStore> {
    directory: Directory,
    store: S,
}

impl<S: ContactStore> ContactService<S> {
    /// Loads the directory from `store`.
    ///
    /// A failed load is returned as-is so the caller can pick another store
    /// before any write-through replaces the unreadable snapshot.
    pub fn open(store: S) -> StoreResult<Self> {
        let directory = store.load()?;
        Ok(Self { directory, store })
    }

    /// Uses `directory` as the current state of `store` without loading it.
    pub fn with_directory(store: S, directory: Directory) -> Self {
        Self { directory, store }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Creates a contact for `name` or appends `phone` to the first match.
    ///
    /// A new record is only stored when its first phone is accepted.
    pub fn add_contact(&mut self, name: &str, phone: &str) -> ContactResult<AddOutcome> {
        let outcome = match self.directory.find_id(name) {
            Some(id) => {
                self.record_mut(name)?.add_phone(phone)?;
                AddOutcome::Appended(id)
            }
            None => {
                let mut record = Record::with_name(validate_name(name)?);
                record.add_phone(phone)?;
                AddOutcome::Created(self.directory.add(record))
            }
        };
        debug!("event=contact_add module=service status=ok outcome={outcome:?}");
        self.persist();
        Ok(outcome)
    }

    pub fn change_phone(&mut self, name: &str, old: &str, new: &str) -> ContactResult<()> {
        self.record_mut(name)?.edit_phone(old, new)?;
        self.persist();
        Ok(())
    }

    /// Removes `phone` from the contact. Returns how many entries matched.
    pub fn remove_phone(&mut self, name: &str, phone: &str) -> ContactResult<usize> {
        let removed = self.record_mut(name)?.remove_phone(phone);
        if removed > 0 {
            self.persist();
        }
        Ok(removed)
    }

    pub fn contact(&self, name: &str) -> ContactResult<&Record> {
        self.directory
            .find(name)
            .ok_or_else(|| ContactError::ContactNotFound(name.to_string()))
    }

    pub fn all(&self) -> Vec<&Record> {
        self.directory.list_all()
    }

    pub fn add_birthday(&mut self, name: &str, date: &str) -> ContactResult<Birthday> {
        let birthday = self.record_mut(name)?.set_birthday(date)?;
        self.persist();
        Ok(birthday)
    }

    pub fn birthday(&self, name: &str) -> ContactResult<Option<Birthday>> {
        Ok(self.contact(name)?.birthday())
    }

    pub fn upcoming_birthdays(&self, today: NaiveDate) -> Vec<UpcomingBirthday> {
        self.directory.upcoming_birthdays(today)
    }

    /// Deletes the first contact named `name`.
    pub fn delete_contact(&mut self, name: &str) -> ContactResult<ContactId> {
        let (id, _) = self
            .directory
            .delete(name)
            .ok_or_else(|| ContactError::ContactNotFound(name.to_string()))?;
        self.persist();
        Ok(id)
    }

    /// Writes the current snapshot to the store.
    pub fn save(&self) -> StoreResult<()> {
        self.store.save(&self.directory)
    }

    fn record_mut(&mut self, name: &str) -> ContactResult<&mut Record> {
        self.directory
            .find_mut(name)
            .ok_or_else(|| ContactError::ContactNotFound(name.to_string()))
    }

    fn persist(&self) {
        // Store already logs the failure with details.
        if self.save().is_err() {
            warn!("event=write_through module=service status=error");
        }
    }
}
