//! Contact directory and the upcoming-birthdays query.
//!
//! # Responsibility
//! - Own every `Record` under a synthetic, monotonically increasing id.
//! - Resolve contacts by name with first-match semantics.
//! - Compute congratulation dates for the next week of birthdays.
//!
//! # Invariants
//! - Ids are never reused, including after deletion.
//! - Iteration order is id order, which is insertion order.
//! - Names are not a unique key; lookups return the lowest-id match.

use crate::model::fields::format_date;
use crate::model::record::Record;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Synthetic identity of a directory entry.
pub type ContactId = u64;

/// Inclusive lookahead, in days, of the upcoming-birthdays window.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// One entry of the upcoming-birthdays result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingBirthday {
    pub name: String,
    /// Occurrence date moved past a weekend, formatted `YYYY.MM.DD`.
    pub congratulation_date: String,
}

/// Collection of contact records keyed by synthetic id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    last_id: ContactId,
    records: BTreeMap<ContactId, Record>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a directory from persisted entries.
    ///
    /// `last_id` is raised to the highest restored id so new ids stay
    /// unique even when the stored counter lags behind.
    pub fn restore(
        last_id: ContactId,
        entries: impl IntoIterator<Item = (ContactId, Record)>,
    ) -> Self {
        let records: BTreeMap<ContactId, Record> = entries.into_iter().collect();
        let highest = records.keys().next_back().copied().unwrap_or(0);
        Self {
            last_id: last_id.max(highest),
            records,
        }
    }

    /// Stores `record` under the next id and returns that id.
    pub fn add(&mut self, record: Record) -> ContactId {
        self.last_id += 1;
        self.records.insert(self.last_id, record);
        self.last_id
    }

    pub fn last_id(&self) -> ContactId {
        self.last_id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record whose name equals `name` exactly.
    pub fn find(&self, name: &str) -> Option<&Record> {
        self.find_id(name).and_then(|id| self.records.get(&id))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Record> {
        let id = self.find_id(name)?;
        self.records.get_mut(&id)
    }

    pub fn find_id(&self, name: &str) -> Option<ContactId> {
        self.records
            .iter()
            .find(|(_, record)| record.name().as_str() == name)
            .map(|(id, _)| *id)
    }

    /// Removes the first record named `name`; `None` when there is none.
    pub fn delete(&mut self, name: &str) -> Option<(ContactId, Record)> {
        let id = self.find_id(name)?;
        self.records.remove(&id).map(|record| (id, record))
    }

    pub fn list_all(&self) -> Vec<&Record> {
        self.records.values().collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = (ContactId, &Record)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    /// Contacts whose next birthday falls within [`UPCOMING_WINDOW_DAYS`]
    /// of `today`, in directory order.
    ///
    /// Every record is scanned; the result is not cut short after the
    /// first contact with a birthday.
    pub fn upcoming_birthdays(&self, today: NaiveDate) -> Vec<UpcomingBirthday> {
        self.records
            .values()
            .filter_map(|record| {
                let birthday = record.birthday()?;
                let date = congratulation_date(birthday.date(), today)?;
                Some(UpcomingBirthday {
                    name: record.name().to_string(),
                    congratulation_date: format_date(date),
                })
            })
            .collect()
    }
}

/// Congratulation date for a birth date seen from `today`, or `None` when the
/// next occurrence is more than a week away.
pub fn congratulation_date(birth_date: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let mut occurrence = occurrence_in(birth_date, today.year())?;
    if occurrence < today {
        occurrence = occurrence_in(birth_date, today.year() + 1)?;
    }

    let days_until = (occurrence - today).num_days();
    if days_until > UPCOMING_WINDOW_DAYS {
        return None;
    }

    let weekday = u64::from(occurrence.weekday().num_days_from_monday());
    if weekday >= 5 {
        occurrence = occurrence.checked_add_days(Days::new(7 - weekday))?;
    }
    Some(occurrence)
}

/// Birth date moved to `year`. Feb 29 falls back to Feb 28 in common years.
fn occurrence_in(birth_date: NaiveDate, year: i32) -> Option<NaiveDate> {
    birth_date
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
}
