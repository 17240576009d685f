//! Core domain logic for the contact book.
//! This crate is the single source of truth for contact invariants.

pub mod command;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use command::{parse_command, Command, CommandError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::directory::{congratulation_date, ContactId, Directory, UpcomingBirthday};
pub use model::fields::{
    format_date, validate_birthday, validate_name, validate_phone_for_add,
    validate_phone_for_edit, Birthday, FieldError, Name, Phone, DATE_FORMAT, DATE_FORMAT_HINT,
};
pub use model::record::{Record, RecordError, NO_PHONES};
pub use repo::contact_store::{ContactStore, SqliteContactStore, StoreError, StoreResult};
pub use service::contact_service::{AddOutcome, ContactError, ContactResult, ContactService};
