//! Typed contact fields and their validation policies.
//!
//! # Responsibility
//! - Turn raw user text into `Name`, `Phone` and `Birthday` values.
//! - Keep the two phone policies (lenient add, strict edit) explicit.
//!
//! # Invariants
//! - A `Name` is never empty.
//! - A `Phone` built by [`Phone::strict`] is exactly 10 ASCII digits.
//! - A `Birthday` always round-trips through [`DATE_FORMAT`].

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed textual format for every birthday read or written.
pub const DATE_FORMAT: &str = "%Y.%m.%d";

/// Human-readable form of [`DATE_FORMAT`] used in messages.
pub const DATE_FORMAT_HINT: &str = "YYYY.MM.DD";

/// Required length of a phone accepted by the strict policy.
pub const PHONE_DIGITS: usize = 10;

static STRICT_PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

/// Validation failure for a single contact field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    EmptyName,
    InvalidPhone(String),
    InvalidDateFormat(String),
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "contact name cannot be empty"),
            Self::InvalidPhone(value) => write!(
                f,
                "phone `{value}` must be a number of length {PHONE_DIGITS}"
            ),
            Self::InvalidDateFormat(value) => write!(
                f,
                "birthdate `{value}` must match format {DATE_FORMAT_HINT}"
            ),
        }
    }
}

impl Error for FieldError {}

/// Contact display name and lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    /// Validates a raw name. Only emptiness is rejected.
    pub fn parse(value: impl Into<String>) -> Result<Self, FieldError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(FieldError::EmptyName);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Name {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.0
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One phone value stored on a record.
///
/// Phones created on the add path are only trimmed, so not every stored
/// value satisfies the strict policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Lenient add policy: trims surrounding whitespace, nothing else.
    pub fn lenient(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Strict edit policy: trimmed value must be exactly 10 ASCII digits.
    pub fn strict(value: &str) -> Result<Self, FieldError> {
        let trimmed = value.trim();
        if !STRICT_PHONE_RE.is_match(trimmed) {
            return Err(FieldError::InvalidPhone(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Phone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar date of birth, without time or zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// Parses `YYYY.MM.DD`; any parse failure is `InvalidDateFormat`.
    pub fn parse(value: &str) -> Result<Self, FieldError> {
        let trimmed = value.trim();
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Self)
            .map_err(|_| FieldError::InvalidDateFormat(trimmed.to_string()))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl TryFrom<String> for Birthday {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Birthday> for String {
    fn from(value: Birthday) -> Self {
        value.to_string()
    }
}

impl Display for Birthday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// Formats any date with [`DATE_FORMAT`].
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Validates a phone for the edit path.
pub fn validate_phone_for_edit(value: &str) -> Result<Phone, FieldError> {
    Phone::strict(value)
}

/// Normalizes a phone for the add path. Never fails.
pub fn validate_phone_for_add(value: &str) -> Phone {
    Phone::lenient(value)
}

/// Validates a birthdate string.
pub fn validate_birthday(value: &str) -> Result<Birthday, FieldError> {
    Birthday::parse(value)
}

/// Validates a contact name.
pub fn validate_name(value: &str) -> Result<Name, FieldError> {
    Name::parse(value)
}
