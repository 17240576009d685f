//! Contact record model.
//!
//! # Responsibility
//! - Hold one contact: name, ordered phones, optional birthday.
//! - Enforce phone uniqueness and the per-path phone policies.
//!
//! # Invariants
//! - `name` is fixed at construction.
//! - No two entries in `phones` are equal.
//! - `phones` keeps insertion order; edits replace in place.

use crate::model::fields::{
    validate_birthday, validate_name, validate_phone_for_add, validate_phone_for_edit, Birthday,
    FieldError, Name, Phone,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Marker rendered instead of the phone list when a record has none.
pub const NO_PHONES: &str = "No phones";

/// Error returned by record mutations and lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    Validation(FieldError),
    DuplicatePhone(String),
    PhoneNotFound(String),
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicatePhone(phone) => write!(f, "phone {phone} already exists in contact"),
            Self::PhoneNotFound(phone) => write!(f, "phone {phone} not found in contact"),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldError> for RecordError {
    fn from(value: FieldError) -> Self {
        Self::Validation(value)
    }
}

/// One contact in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    name: Name,
    phones: Vec<Phone>,
    birthday: Option<Birthday>,
}

impl Record {
    /// Creates an empty record for `name`.
    pub fn new(name: &str) -> Result<Self, FieldError> {
        Ok(Self::with_name(validate_name(name)?))
    }

    pub fn with_name(name: Name) -> Self {
        Self {
            name,
            phones: Vec::new(),
            birthday: None,
        }
    }

    /// Rebuilds a record from already-validated parts.
    ///
    /// Used by the store on load; duplicate phones are rejected so a
    /// corrupt snapshot cannot break the uniqueness invariant.
    pub fn from_parts(
        name: Name,
        phones: Vec<Phone>,
        birthday: Option<Birthday>,
    ) -> Result<Self, RecordError> {
        let mut record = Self::with_name(name);
        for phone in phones {
            record.push_unique(phone)?;
        }
        record.birthday = birthday;
        Ok(record)
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    /// Appends a phone using the lenient add policy.
    pub fn add_phone(&mut self, value: &str) -> Result<(), RecordError> {
        self.push_unique(validate_phone_for_add(value))
    }

    /// Replaces `old` with `new` in place.
    ///
    /// Checks run in order: strict format of `new`, duplicate `new`,
    /// presence of `old`.
    pub fn edit_phone(&mut self, old: &str, new: &str) -> Result<(), RecordError> {
        let new_phone = validate_phone_for_edit(new)?;
        if self.contains(&new_phone) {
            return Err(RecordError::DuplicatePhone(new_phone.to_string()));
        }

        let old = old.trim();
        let slot = self
            .phones
            .iter_mut()
            .find(|phone| phone.as_str() == old)
            .ok_or_else(|| RecordError::PhoneNotFound(old.to_string()))?;
        *slot = new_phone;
        Ok(())
    }

    /// Removes every entry equal to `value`. Returns how many were removed.
    pub fn remove_phone(&mut self, value: &str) -> usize {
        let value = value.trim();
        let before = self.phones.len();
        self.phones.retain(|phone| phone.as_str() != value);
        before - self.phones.len()
    }

    pub fn find_phone(&self, value: &str) -> Result<&Phone, RecordError> {
        let value = value.trim();
        self.phones
            .iter()
            .find(|phone| phone.as_str() == value)
            .ok_or_else(|| RecordError::PhoneNotFound(value.to_string()))
    }

    /// Validates and replaces the birthday, returning the stored value.
    pub fn set_birthday(&mut self, value: &str) -> Result<Birthday, RecordError> {
        let birthday = validate_birthday(value)?;
        self.birthday = Some(birthday);
        Ok(birthday)
    }

    pub fn birthday(&self) -> Option<Birthday> {
        self.birthday
    }

    /// Phones joined by `; `, or [`NO_PHONES`].
    pub fn render_phones(&self) -> String {
        if self.phones.is_empty() {
            return NO_PHONES.to_string();
        }
        self.phones
            .iter()
            .map(Phone::as_str)
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn contains(&self, phone: &Phone) -> bool {
        self.phones.iter().any(|existing| existing == phone)
    }

    fn push_unique(&mut self, phone: Phone) -> Result<(), RecordError> {
        if self.contains(&phone) {
            return Err(RecordError::DuplicatePhone(phone.to_string()));
        }
        self.phones.push(phone);
        Ok(())
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Contact name: {}, phones: {}",
            self.name,
            self.render_phones()
        )?;
        if let Some(birthday) = self.birthday {
            write!(f, ", birthday: {birthday}")?;
        }
        Ok(())
    }
}
